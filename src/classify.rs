//! Classification of incoming serial bytes.

use crate::command::{CommandKind, TERMINATOR};
use crate::hex;

/// The role a byte can play in the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CharClass {
    /// One of the command opcodes.
    CommandLetter,
    /// A lowercase hex digit, `0`-`9` or `a`-`f`.
    HexDigit,
    /// The `\n` frame terminator.
    Return,
    /// Anything else, including uppercase hex and `\r`.
    Unknown,
}

/// Classifies one incoming byte.
///
/// Opcodes win over hex digits, but the two sets never overlap: opcodes are
/// uppercase letters while hex letters are accepted in lowercase only.
pub fn classify(byte: u8) -> CharClass {
    if CommandKind::from_opcode(byte).is_some() {
        CharClass::CommandLetter
    } else if byte == TERMINATOR {
        CharClass::Return
    } else if hex::digit_value(byte).is_some() {
        CharClass::HexDigit
    } else {
        CharClass::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_classify_as_command_letters() {
        for opcode in [b'V', b'I', b'Q', b'P', b'S', b'W', b'L'] {
            assert_eq!(classify(opcode), CharClass::CommandLetter);
        }
    }

    #[test]
    fn lowercase_hex_classifies_as_digit() {
        for byte in *b"0123456789abcdef" {
            assert_eq!(classify(byte), CharClass::HexDigit);
        }
    }

    #[test]
    fn uppercase_hex_is_unknown() {
        for byte in *b"ABCDEF" {
            assert_eq!(classify(byte), CharClass::Unknown);
        }
    }

    #[test]
    fn newline_is_return() {
        assert_eq!(classify(b'\n'), CharClass::Return);
    }

    #[test]
    fn carriage_return_and_noise_are_unknown() {
        assert_eq!(classify(b'\r'), CharClass::Unknown);
        assert_eq!(classify(b' '), CharClass::Unknown);
        assert_eq!(classify(b'X'), CharClass::Unknown);
        assert_eq!(classify(b'z'), CharClass::Unknown);
        assert_eq!(classify(0x00), CharClass::Unknown);
        assert_eq!(classify(0xff), CharClass::Unknown);
    }
}
