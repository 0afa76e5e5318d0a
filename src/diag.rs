//! Error codes and the diagnostic line format.
//!
//! Every message the interpreter emits goes through this module. Error lines
//! follow the grammar `<code>[,p=<value>][,s=<byte>]` with both values in
//! lowercase hex, `s` always two digits. Outside quiet mode a blank line is
//! written first so a report stands out from echoed input.

use core::fmt;
use core::fmt::Write as _;

use heapless::String;

use crate::command::TERMINATOR;
use crate::transport::Transport;

/// Everything that can go wrong while interpreting a frame.
///
/// The variant name doubles as the wire code, so renaming one is a protocol
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// A byte arrived outside a frame that opens no command.
    NoCommand,
    /// A letter arrived outside a frame that is not an opcode.
    UnknownCommandLetter,
    /// The frame terminator arrived before the frame was complete.
    UnexpectedReturn,
    /// A byte arrived mid-frame that fits no field of the open command.
    UnknownByte,
    /// A length field exceeds what the strip can address.
    LengthOverflow,
    /// More payload digits arrived than the frame declared.
    PayloadOverflow,
    /// The parity digit does not match the running checksum.
    ParityMismatch,
    /// The command requires a successful init first.
    NotInitialized,
    /// Init could not bring up a strip with at least one pixel.
    InitializationImpossible,
    /// A latch arrived inside the minimum latch interval.
    LatchTooSoon,
}

impl ErrorCode {
    /// The code exactly as it appears on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Self::NoCommand => "NoCommand",
            Self::UnknownCommandLetter => "UnknownCommandLetter",
            Self::UnexpectedReturn => "UnexpectedReturn",
            Self::UnknownByte => "UnknownByte",
            Self::LengthOverflow => "LengthOverflow",
            Self::PayloadOverflow => "PayloadOverflow",
            Self::ParityMismatch => "ParityMismatch",
            Self::NotInitialized => "NotInitialized",
            Self::InitializationImpossible => "InitializationImpossible",
            Self::LatchTooSoon => "LatchTooSoon",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorCode {}

// Longest code plus ",p=<u32>" and ",s=<byte>" fits well within this.
type Line = String<48>;

/// Echoes one input byte back, unless quiet mode is on.
pub fn echo<T: Transport>(transport: &mut T, quiet: bool, byte: u8) {
    if quiet {
        return;
    }
    transport.write_byte(byte);
    transport.flush();
}

/// Reports one error.
///
/// `param` carries context that varies by code (expected parity digit,
/// offending length, declared payload size); `offending` is the input byte
/// that triggered the report.
pub fn report<T: Transport>(
    transport: &mut T,
    quiet: bool,
    code: ErrorCode,
    param: Option<u32>,
    offending: Option<u8>,
) {
    if !quiet {
        transport.write_byte(TERMINATOR);
    }
    let mut line = Line::new();
    let _ = write!(line, "{code}");
    if let Some(param) = param {
        let _ = write!(line, ",p={param:x}");
    }
    if let Some(byte) = offending {
        let _ = write!(line, ",s={byte:02x}");
    }
    transport.write_line(&line);
    transport.flush();
}

/// Reports the outcome of an init, quiet mode or not.
///
/// `actual` is what the surface ended up with, `requested` what the frame
/// asked for; a mismatch appends a ` should be` clause.
pub fn init_report<T: Transport>(transport: &mut T, actual: u16, requested: u16) {
    let mut line = Line::new();
    let _ = write!(line, "Init {actual:x}");
    if actual != requested {
        let _ = write!(line, " should be {requested:x}");
    }
    transport.write_line(&line);
    transport.flush();
}

/// Confirms a completed raw frame part.
pub fn done_report<T: Transport>(transport: &mut T, part_index: u8) {
    let mut line = Line::new();
    let _ = write!(line, "Done {part_index:x}");
    transport.write_line(&line);
    transport.flush();
}

/// Reports the firmware name and version.
pub fn version_report<T: Transport>(transport: &mut T) {
    transport.write_line(crate::VERSION_LINE);
    transport.flush();
}
