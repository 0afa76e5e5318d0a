#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Interpreter`**: Decodes and executes strip commands one serial byte at a time
//! - **`CommandKind`**: The closed set of one-letter commands the protocol knows
//! - **`FeedOutcome`**: What a fed byte did (pending, committed a command, aborted with an error)
//! - **`ErrorCode`**: Frame-local protocol, validation and state errors
//! - **`ParityCoverage`**: Whether color-carrying frames must be checksummed too
//! - **`LedSurface`**: Trait to implement for your strip driver
//! - **`Transport`**: Trait to implement for your serial link
//! - **`TimeSource`**: Trait to implement for your monotonic clock
//! - **`MemorySurface`**: A memory-backed surface for tests and simulators
//!
//! The library uses `Srgb<u8>` for pixel colors, matching the protocol's
//! 24-bit wire format one byte per channel. When implementing `LedSurface`
//! for your hardware, convert to your device's native format (e.g. GRB
//! ordering, gamma-corrected tables).

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod classify;
pub mod command;
pub mod diag;
pub mod hex;
pub mod interpreter;
pub mod parity;
pub mod surface;
pub mod time;
pub mod transport;

pub use classify::{CharClass, classify};
pub use command::CommandKind;
pub use diag::ErrorCode;
pub use interpreter::{FeedOutcome, Interpreter, LATCH_INTERVAL_MS, ParityCoverage, Stage};
pub use parity::{PARITY_SEED, ParityAccumulator};
pub use surface::{LedSurface, MemorySurface, color_from_rgb24};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use transport::Transport;

/// The color every dark pixel starts out as.
pub const COLOR_OFF: Srgb<u8> = Srgb::new(0, 0, 0);

/// The line the Version command reports.
pub const VERSION_LINE: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));
