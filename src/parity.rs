//! Running XOR parity over frame bytes.
//!
//! The checksum trails the byte stream by one byte: a fed byte is only folded
//! into the total when the next byte arrives. The byte occupying the parity
//! slot of a frame therefore never checksums itself, and the expected digit
//! can be read the moment that slot is reached.

/// Seed value for the parity total at the start of every frame.
pub const PARITY_SEED: u8 = 0x00;

/// Accumulates XOR parity with a one-byte lag.
#[derive(Debug, Clone)]
pub struct ParityAccumulator {
    total: u8,
    last: u8,
}

impl ParityAccumulator {
    /// Creates an accumulator seeded with [`PARITY_SEED`].
    pub fn new() -> Self {
        Self {
            total: PARITY_SEED,
            last: 0,
        }
    }

    /// Restarts the accumulator with the given seed.
    pub fn reset(&mut self, seed: u8) {
        self.total = seed;
        self.last = 0;
    }

    /// Feeds one byte.
    ///
    /// Folds the previously fed byte into the total and holds this one back
    /// until the next call.
    pub fn absorb(&mut self, byte: u8) {
        self.total ^= self.last;
        self.last = byte;
    }

    /// Condenses the running total to a single hex digit.
    ///
    /// The high and low nibbles of the total are XORed together, which is
    /// what a frame's parity digit is compared against.
    pub fn fold(&self) -> u8 {
        (self.total >> 4) ^ (self.total & 0x0f)
    }
}

impl Default for ParityAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
