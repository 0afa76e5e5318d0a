//! Wire protocol vocabulary: opcodes, field widths and command shapes.

/// Opcode byte for [`CommandKind::Version`].
pub const OPCODE_VERSION: u8 = b'V';
/// Opcode byte for [`CommandKind::Init`].
pub const OPCODE_INIT: u8 = b'I';
/// Opcode byte for [`CommandKind::Quiet`].
pub const OPCODE_QUIET: u8 = b'Q';
/// Opcode byte for [`CommandKind::Pixel`].
pub const OPCODE_PIXEL: u8 = b'P';
/// Opcode byte for [`CommandKind::Shade`].
pub const OPCODE_SHADE: u8 = b'S';
/// Opcode byte for [`CommandKind::RawFrame`].
pub const OPCODE_RAW_FRAME: u8 = b'W';
/// Opcode byte for [`CommandKind::Latch`].
pub const OPCODE_LATCH: u8 = b'L';

/// Byte that terminates every command frame.
pub const TERMINATOR: u8 = b'\n';

/// Number of hex digits in a length field.
pub const LENGTH_DIGITS: u8 = 4;
/// Number of hex digits in one RGB color value.
pub const COLOR_DIGITS: u8 = 6;

/// The commands the interpreter understands.
///
/// Opcodes are case-sensitive single ASCII letters. Every frame ends with a
/// `\n` terminator; what sits between opcode and terminator depends on the
/// command shape (see the shape queries below).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// `V` - report the firmware name and version.
    Version,
    /// `I` - declare the strip capacity and arm the session.
    Init,
    /// `Q` - enable or disable serial echo and error spacing.
    Quiet,
    /// `P` - set a single pixel to an RGB color.
    Pixel,
    /// `S` - set the first N pixels to one RGB color.
    Shade,
    /// `W` - write a contiguous part of a full frame.
    RawFrame,
    /// `L` - present the staged buffer on the strip.
    Latch,
}

impl CommandKind {
    /// Maps an opcode byte to its command, or `None` for any other byte.
    pub fn from_opcode(byte: u8) -> Option<Self> {
        match byte {
            OPCODE_VERSION => Some(Self::Version),
            OPCODE_INIT => Some(Self::Init),
            OPCODE_QUIET => Some(Self::Quiet),
            OPCODE_PIXEL => Some(Self::Pixel),
            OPCODE_SHADE => Some(Self::Shade),
            OPCODE_RAW_FRAME => Some(Self::RawFrame),
            OPCODE_LATCH => Some(Self::Latch),
            _ => None,
        }
    }

    /// Returns the opcode byte for this command.
    pub fn opcode(self) -> u8 {
        match self {
            Self::Version => OPCODE_VERSION,
            Self::Init => OPCODE_INIT,
            Self::Quiet => OPCODE_QUIET,
            Self::Pixel => OPCODE_PIXEL,
            Self::Shade => OPCODE_SHADE,
            Self::RawFrame => OPCODE_RAW_FRAME,
            Self::Latch => OPCODE_LATCH,
        }
    }

    /// Whether the frame carries a four-digit hex field after the opcode.
    ///
    /// For [`CommandKind::RawFrame`] the field packs two bytes (part index,
    /// part length) instead of a single count.
    pub fn has_length_field(self) -> bool {
        !matches!(self, Self::Version | Self::Latch)
    }

    /// Whether the frame carries payload digits after the header.
    pub fn has_payload(self) -> bool {
        matches!(self, Self::Pixel | Self::Shade | Self::RawFrame)
    }

    /// Whether the command may run before a successful init.
    pub fn allowed_before_init(self) -> bool {
        matches!(self, Self::Version | Self::Init)
    }
}
