//! Hex digit decoding and accumulator folding.
//!
//! The wire protocol carries every numeric value as lowercase ASCII hex,
//! most-significant nibble first. These helpers decode one digit at a time so
//! the interpreter never needs to buffer a field before converting it.

/// Decodes a single ASCII hex digit.
///
/// Accepts `0`-`9` and lowercase `a`-`f` only; uppercase digits are not part
/// of the wire format. Returns `None` for anything else.
pub fn digit_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Shifts one decoded hex digit into a 16-bit accumulator.
///
/// Folding four digits into a zeroed accumulator yields the value with the
/// first digit in the most significant position.
pub fn shift_in_u16(acc: u16, value: u8) -> u16 {
    (acc << 4) | u16::from(value & 0x0f)
}

/// Shifts one decoded hex digit into a 24-bit RGB accumulator.
///
/// The result is masked to 24 bits, so continuous folding keeps only the six
/// most recent digits (`0xRRGGBB`).
pub fn shift_in_rgb(acc: u32, value: u8) -> u32 {
    ((acc << 4) | u32::from(value & 0x0f)) & 0x00ff_ffff
}
