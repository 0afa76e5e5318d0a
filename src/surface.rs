//! LED strip abstraction and an in-memory implementation.

use heapless::Vec;
use palette::Srgb;

use crate::COLOR_OFF;

/// Trait for the pixel buffer behind the interpreter.
///
/// Implement this for your strip driver (WS2801, WS2812, APA102, a DMX
/// universe). Writes stage pixels in a buffer; nothing reaches the physical
/// strip until [`present`](LedSurface::present) is called. Handle any
/// hardware errors internally - these methods cannot fail.
pub trait LedSurface {
    /// Returns the number of addressable pixels.
    fn capacity(&self) -> u16;

    /// Reallocates the buffer for `pixels` pixels.
    ///
    /// An implementation with a fixed maximum may clamp; the interpreter
    /// reads back [`capacity`](LedSurface::capacity) afterwards and reports
    /// the difference. Pixel values after a resize are unspecified beyond
    /// newly added pixels starting dark.
    fn resize(&mut self, pixels: u16);

    /// Stages one pixel color.
    ///
    /// The interpreter bounds-checks every index before calling, so an
    /// implementation may ignore an out-of-range write.
    fn set_pixel(&mut self, index: u16, color: Srgb<u8>);

    /// Pushes the staged buffer to the physical strip.
    fn present(&mut self);
}

/// Unpacks a folded 24-bit `0xRRGGBB` accumulator into a color.
pub fn color_from_rgb24(value: u32) -> Srgb<u8> {
    Srgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

/// A [`LedSurface`] backed by plain memory.
///
/// Useful for host-side tests and for simulators; `N` is the largest
/// capacity a resize can reach. Presents are counted instead of sent
/// anywhere.
#[derive(Debug)]
pub struct MemorySurface<const N: usize> {
    pixels: Vec<Srgb<u8>, N>,
    presented: u32,
}

impl<const N: usize> MemorySurface<N> {
    /// Creates an empty surface with zero capacity.
    pub fn new() -> Self {
        Self {
            pixels: Vec::new(),
            presented: 0,
        }
    }

    /// Returns the staged color of one pixel, or `None` past the capacity.
    pub fn pixel(&self, index: u16) -> Option<Srgb<u8>> {
        self.pixels.get(usize::from(index)).copied()
    }

    /// Number of times the buffer has been presented.
    pub fn presented_frames(&self) -> u32 {
        self.presented
    }
}

impl<const N: usize> Default for MemorySurface<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LedSurface for MemorySurface<N> {
    fn capacity(&self) -> u16 {
        self.pixels.len() as u16
    }

    fn resize(&mut self, pixels: u16) {
        let target = usize::from(pixels).min(N);
        self.pixels.truncate(target);
        for _ in self.pixels.len()..target {
            let _ = self.pixels.push(COLOR_OFF);
        }
    }

    fn set_pixel(&mut self, index: u16, color: Srgb<u8>) {
        if let Some(pixel) = self.pixels.get_mut(usize::from(index)) {
            *pixel = color;
        }
    }

    fn present(&mut self) {
        self.presented = self.presented.wrapping_add(1);
    }
}
