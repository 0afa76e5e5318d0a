//! Serial transport abstraction.

/// Trait for the byte stream the interpreter talks back over.
///
/// Implement this for your UART, USB CDC endpoint or TCP socket. Handle any
/// hardware errors internally - these methods cannot fail. Dropping output
/// on a saturated link is acceptable; the protocol never depends on reading
/// back what it wrote.
pub trait Transport {
    /// Writes a single raw byte, used for echoing input.
    fn write_byte(&mut self, byte: u8);

    /// Writes a line of text followed by the frame terminator.
    fn write_line(&mut self, line: &str);

    /// Drains any buffered output.
    fn flush(&mut self);
}
