//! Shared test infrastructure for hexstrip integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use hexstrip::{ParityAccumulator, TimeDuration, TimeInstant, TimeSource, Transport};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing (milliseconds since start)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance the mock clock by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let now = self.current_time.get();
        self.current_time.set(TestInstant(now.0 + duration.0));
    }

    /// Jump the mock clock to an absolute instant
    pub fn set_time(&self, instant: TestInstant) {
        self.current_time.set(instant);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

/// Mock transport that records everything the interpreter sends back
#[derive(Debug, Default)]
pub struct MockTransport {
    pub bytes: Vec<u8>,
    pub lines: Vec<String>,
    pub flushes: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently emitted line, if any
    pub fn last_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

impl Transport for MockTransport {
    fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    fn write_line(&mut self, line: &str) {
        self.lines.push(String::from(line));
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Computes the parity digit a sender must append after `prefix`
pub fn parity_digit(prefix: &[u8]) -> u8 {
    let mut parity = ParityAccumulator::new();
    for &byte in prefix {
        parity.absorb(byte);
    }
    // One more absorb stands in for the parity byte itself arriving.
    parity.absorb(0);
    let fold = parity.fold();
    match fold {
        0..=9 => b'0' + fold,
        _ => b'a' + (fold - 10),
    }
}

/// Completes `prefix` into a full frame: parity digit plus terminator
pub fn framed(prefix: &str) -> Vec<u8> {
    let mut frame = Vec::from(prefix.as_bytes());
    frame.push(parity_digit(prefix.as_bytes()));
    frame.push(b'\n');
    frame
}
