//! Byte-at-a-time command interpreter for the strip control protocol.
//!
//! Provides [`Interpreter`] which consumes raw serial bytes as they arrive,
//! assembles them into command frames, validates length fields and parity,
//! and executes completed commands against a [`LedSurface`]. Echo and
//! diagnostics go out through a [`Transport`]; a frame that goes wrong is
//! reported and dropped without disturbing the session.

use crate::classify::{CharClass, classify};
use crate::command::{COLOR_DIGITS, CommandKind, LENGTH_DIGITS};
use crate::diag::{self, ErrorCode};
use crate::hex;
use crate::parity::{PARITY_SEED, ParityAccumulator};
use crate::surface::{LedSurface, color_from_rgb24};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::transport::Transport;

/// Minimum time between two successful latches, in milliseconds.
///
/// Present pushes are rate-limited so the strip's drive electronics are
/// never re-clocked faster than their settle time.
pub const LATCH_INTERVAL_MS: u64 = 10;

/// Decoding position inside the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Between frames, waiting for an opcode letter.
    Idle,
    /// Accumulating the four hex digits of the length field.
    Length,
    /// Expecting the single parity digit covering the frame so far.
    Parity,
    /// Accumulating payload digits, then waiting for the terminator.
    ///
    /// Commands without payload pass through here accepting zero digits,
    /// so the terminator is handled the same way for every command.
    Payload,
}

/// Which frames must carry a parity digit.
///
/// Sender generations disagree on whether color-carrying frames are
/// checksummed past their length field; pick the variant your sender
/// speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParityCoverage {
    /// Only control frames (`V`, `I`, `Q`, `L`) carry a parity digit.
    /// Pixel, Shade and RawFrame go straight from length field to payload.
    ControlOnly,
    /// Every frame carries a parity digit after its header.
    Full,
}

/// What a fed byte did to the frame in progress.
///
/// Purely informational: echo, diagnostics and command side effects have
/// already happened through the transport and surface by the time
/// [`Interpreter::feed`] returns. A caller free-running on a UART can
/// ignore it; hosts and tests can watch for commits and aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedOutcome {
    /// The frame needs more bytes.
    Pending,
    /// The byte completed a frame and its command executed.
    Committed(CommandKind),
    /// The frame was dropped after reporting the error on the transport.
    Aborted(ErrorCode),
}

/// The frame currently being assembled.
struct Frame {
    command: Option<CommandKind>,
    stage: Stage,
    length: u16,
    color: u32,
    digits: u8,
    colors_done: u8,
}

impl Frame {
    const fn idle() -> Self {
        Self {
            command: None,
            stage: Stage::Idle,
            length: 0,
            color: 0,
            digits: 0,
            colors_done: 0,
        }
    }

    fn reset(&mut self) {
        *self = Self::idle();
    }

    /// High byte of the length field: which part of the frame this is.
    fn part_index(&self) -> u8 {
        (self.length >> 8) as u8
    }

    /// Low byte of the length field: how many colors the part carries.
    fn part_length(&self) -> u8 {
        self.length as u8
    }
}

/// Session state that outlives individual frames.
struct Session<I> {
    initialized: bool,
    quiet: bool,
    last_latch: Option<I>,
}

impl<I> Session<I> {
    const fn fresh() -> Self {
        Self {
            initialized: false,
            quiet: false,
            last_latch: None,
        }
    }
}

/// Internal step result; [`Resync`](Step::Resync) asks `feed` to run the
/// same byte against the freshly reset idle state.
enum Step {
    Pending,
    Committed(CommandKind),
    Aborted(ErrorCode),
    Resync(ErrorCode),
}

/// Decodes and executes strip commands one serial byte at a time.
///
/// The interpreter owns the LED surface and the reply transport and borrows
/// a monotonic clock for latch rate limiting. It buffers nothing: each byte
/// is classified, checksummed and folded into the open frame as it arrives,
/// and a completed frame dispatches before `feed` returns.
///
/// Errors are frame-local. A malformed byte aborts the open frame with a
/// diagnostic line and the next byte is interpreted fresh, so the session
/// recovers from line noise on its own.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - LED surface implementation type
/// * `T` - Transport implementation type
/// * `C` - Time source implementation type
pub struct Interpreter<'t, I: TimeInstant, S: LedSurface, T: Transport, C: TimeSource<I>> {
    surface: S,
    transport: T,
    clock: &'t C,
    coverage: ParityCoverage,
    frame: Frame,
    parity: ParityAccumulator,
    session: Session<I>,
}

impl<'t, I: TimeInstant, S: LedSurface, T: Transport, C: TimeSource<I>> Interpreter<'t, I, S, T, C> {
    /// Creates an interpreter with the default lenient parity coverage.
    pub fn new(surface: S, transport: T, clock: &'t C) -> Self {
        Self::with_parity_coverage(surface, transport, clock, ParityCoverage::ControlOnly)
    }

    /// Creates an interpreter with explicit parity coverage.
    pub fn with_parity_coverage(
        surface: S,
        transport: T,
        clock: &'t C,
        coverage: ParityCoverage,
    ) -> Self {
        Self {
            surface,
            transport,
            clock,
            coverage,
            frame: Frame::idle(),
            parity: ParityAccumulator::new(),
            session: Session::fresh(),
        }
    }

    /// Interprets one incoming byte.
    ///
    /// The byte is echoed (unless quiet), absorbed into the running parity
    /// unless it is the terminator, and stepped through the frame state
    /// machine. A byte that kills a frame mid-flight is reported as
    /// [`ErrorCode::UnknownByte`] and then reinterpreted against the idle
    /// state, since it may be the first byte of the next command.
    ///
    /// # Returns
    /// * `Pending` - The frame needs more bytes
    /// * `Committed` - This byte completed a frame and its handler ran
    /// * `Aborted` - The frame was dropped; the first error is reported
    pub fn feed(&mut self, byte: u8) -> FeedOutcome {
        let class = classify(byte);
        diag::echo(&mut self.transport, self.session.quiet, byte);
        if class != CharClass::Return {
            self.parity.absorb(byte);
        }
        match self.step(byte, class) {
            Step::Pending => FeedOutcome::Pending,
            Step::Committed(kind) => FeedOutcome::Committed(kind),
            Step::Aborted(code) => FeedOutcome::Aborted(code),
            Step::Resync(code) => {
                // The failed frame is already reported and the parity
                // reseeded. Run the byte against the idle state without
                // echoing it a second time.
                self.parity.absorb(byte);
                let _ = self.step(byte, class);
                FeedOutcome::Aborted(code)
            }
        }
    }

    /// Feeds every byte of a slice in order.
    pub fn feed_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed(byte);
        }
    }

    /// Current decoding stage.
    pub fn stage(&self) -> Stage {
        self.frame.stage
    }

    /// Whether a capacity has been successfully negotiated via Init.
    pub fn is_initialized(&self) -> bool {
        self.session.initialized
    }

    /// Whether echo and error spacing are currently suppressed.
    pub fn is_quiet(&self) -> bool {
        self.session.quiet
    }

    /// The parity coverage this interpreter was built with.
    pub fn parity_coverage(&self) -> ParityCoverage {
        self.coverage
    }

    /// Shared access to the LED surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Exclusive access to the LED surface, e.g. to pre-stage pixels from
    /// the host side before a protocol-driven latch.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Shared access to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn step(&mut self, byte: u8, class: CharClass) -> Step {
        if self.frame.stage != Stage::Idle
            && matches!(class, CharClass::CommandLetter | CharClass::Unknown)
        {
            self.abort(ErrorCode::UnknownByte, None, Some(byte));
            return Step::Resync(ErrorCode::UnknownByte);
        }
        match (self.frame.stage, self.frame.command) {
            (Stage::Idle, _) | (_, None) => self.open_frame(byte, class),
            (Stage::Length, Some(kind)) => self.on_length_digit(kind, byte),
            (Stage::Parity, Some(_)) => self.on_parity_digit(byte),
            (Stage::Payload, Some(kind)) => self.on_payload_byte(kind, byte),
        }
    }

    /// Handles a byte arriving with no command open.
    fn open_frame(&mut self, byte: u8, class: CharClass) -> Step {
        let Some(kind) = CommandKind::from_opcode(byte) else {
            // A letter that is not an opcode gets its own code; hex digits,
            // terminators and noise all just have no command to belong to.
            let code = if class == CharClass::Unknown && byte.is_ascii_alphabetic() {
                ErrorCode::UnknownCommandLetter
            } else {
                ErrorCode::NoCommand
            };
            return self.abort_with(code, None, Some(byte));
        };
        if !self.session.initialized && !kind.allowed_before_init() {
            return self.abort_with(ErrorCode::NotInitialized, None, Some(byte));
        }
        self.frame.command = Some(kind);
        self.frame.stage = if kind.has_length_field() {
            Stage::Length
        } else {
            Stage::Parity
        };
        Step::Pending
    }

    fn on_length_digit(&mut self, kind: CommandKind, byte: u8) -> Step {
        let Some(value) = hex::digit_value(byte) else {
            return self.abort_with(
                ErrorCode::UnexpectedReturn,
                Some(u32::from(self.frame.digits)),
                Some(byte),
            );
        };
        self.frame.length = hex::shift_in_u16(self.frame.length, value);
        self.frame.digits += 1;
        if self.frame.digits < LENGTH_DIGITS {
            return Step::Pending;
        }
        self.frame.digits = 0;
        if self.length_overflows(kind) {
            return self.abort_with(
                ErrorCode::LengthOverflow,
                Some(u32::from(self.frame.length)),
                Some(byte),
            );
        }
        self.frame.stage = match (kind, self.coverage) {
            (
                CommandKind::Pixel | CommandKind::Shade | CommandKind::RawFrame,
                ParityCoverage::ControlOnly,
            ) => Stage::Payload,
            _ => Stage::Parity,
        };
        Step::Pending
    }

    /// Validates a completed length field against the strip.
    ///
    /// Pixel carries an index, so the bound is strict; Shade carries a
    /// count, so equality with the capacity is fine. Init is only bounded
    /// once initialized (growing an armed strip is rejected here, a fresh
    /// init negotiates through resize instead). RawFrame packs part index
    /// and part length into one field and the whole span must fit.
    fn length_overflows(&self, kind: CommandKind) -> bool {
        let capacity = u32::from(self.surface.capacity());
        let length = u32::from(self.frame.length);
        match kind {
            CommandKind::Pixel => length >= capacity,
            CommandKind::Shade => length > capacity,
            CommandKind::Init => self.session.initialized && length > capacity,
            CommandKind::RawFrame => {
                let span = (u32::from(self.frame.part_index()) + 1)
                    * u32::from(self.frame.part_length());
                span > capacity
            }
            CommandKind::Version | CommandKind::Quiet | CommandKind::Latch => false,
        }
    }

    fn on_parity_digit(&mut self, byte: u8) -> Step {
        let Some(value) = hex::digit_value(byte) else {
            return self.abort_with(ErrorCode::UnexpectedReturn, None, Some(byte));
        };
        let expected = self.parity.fold();
        if value != expected {
            return self.abort_with(
                ErrorCode::ParityMismatch,
                Some(u32::from(expected)),
                Some(byte),
            );
        }
        self.frame.stage = Stage::Payload;
        Step::Pending
    }

    fn on_payload_byte(&mut self, kind: CommandKind, byte: u8) -> Step {
        match hex::digit_value(byte) {
            Some(value) => self.on_payload_digit(kind, value, byte),
            None => self.dispatch(kind, byte),
        }
    }

    fn on_payload_digit(&mut self, kind: CommandKind, value: u8, byte: u8) -> Step {
        match kind {
            CommandKind::Pixel | CommandKind::Shade => {
                if self.frame.digits == COLOR_DIGITS {
                    return self.payload_overflow(kind, byte);
                }
                self.frame.color = hex::shift_in_rgb(self.frame.color, value);
                self.frame.digits += 1;
                Step::Pending
            }
            CommandKind::RawFrame => {
                if self.frame.colors_done == self.frame.part_length() {
                    return self.payload_overflow(kind, byte);
                }
                self.frame.color = hex::shift_in_rgb(self.frame.color, value);
                self.frame.digits += 1;
                if self.frame.digits == COLOR_DIGITS {
                    self.stage_raw_pixel()
                } else {
                    Step::Pending
                }
            }
            CommandKind::Version | CommandKind::Init | CommandKind::Quiet | CommandKind::Latch => {
                self.payload_overflow(kind, byte)
            }
        }
    }

    /// Reports a digit beyond the declared payload; `p` names the declared
    /// size (digits for single-color frames, colors for raw frames).
    fn payload_overflow(&mut self, kind: CommandKind, byte: u8) -> Step {
        let declared = match kind {
            CommandKind::Pixel | CommandKind::Shade => u32::from(COLOR_DIGITS),
            CommandKind::RawFrame => u32::from(self.frame.part_length()),
            _ => 0,
        };
        self.abort_with(ErrorCode::PayloadOverflow, Some(declared), Some(byte))
    }

    /// Writes one completed raw-frame color to its absolute strip position.
    fn stage_raw_pixel(&mut self) -> Step {
        let index = u32::from(self.frame.part_index()) * u32::from(self.frame.part_length())
            + u32::from(self.frame.colors_done);
        if index >= u32::from(self.surface.capacity()) {
            return self.abort_with(ErrorCode::LengthOverflow, Some(index), None);
        }
        self.surface
            .set_pixel(index as u16, color_from_rgb24(self.frame.color));
        self.frame.color = 0;
        self.frame.digits = 0;
        self.frame.colors_done += 1;
        Step::Pending
    }

    /// Runs the handler for a frame completed by its terminator.
    fn dispatch(&mut self, kind: CommandKind, byte: u8) -> Step {
        match kind {
            CommandKind::Version => {
                diag::version_report(&mut self.transport);
                self.commit(kind)
            }
            CommandKind::Init => self.finish_init(),
            CommandKind::Quiet => {
                self.session.quiet = self.frame.length != 0;
                self.commit(kind)
            }
            CommandKind::Latch => self.finish_latch(),
            CommandKind::Pixel => self.finish_pixel(byte),
            CommandKind::Shade => self.finish_shade(byte),
            CommandKind::RawFrame => self.finish_raw_frame(byte),
        }
    }

    fn finish_init(&mut self) -> Step {
        let requested = self.frame.length;
        if !self.session.initialized {
            self.surface.resize(requested);
        }
        let actual = self.surface.capacity();
        if actual == 0 {
            return self.abort_with(ErrorCode::InitializationImpossible, None, None);
        }
        diag::init_report(&mut self.transport, actual, requested);
        self.session.initialized = actual == requested;
        self.commit(CommandKind::Init)
    }

    fn finish_latch(&mut self) -> Step {
        let now = self.clock.now();
        if let Some(previous) = self.session.last_latch {
            if now.duration_since(previous).as_millis() < LATCH_INTERVAL_MS {
                return self.abort_with(
                    ErrorCode::LatchTooSoon,
                    Some(LATCH_INTERVAL_MS as u32),
                    None,
                );
            }
        }
        self.surface.present();
        self.session.last_latch = Some(now);
        self.commit(CommandKind::Latch)
    }

    fn finish_pixel(&mut self, byte: u8) -> Step {
        if self.frame.digits != COLOR_DIGITS {
            return self.abort_with(
                ErrorCode::UnexpectedReturn,
                Some(u32::from(self.frame.digits)),
                Some(byte),
            );
        }
        let index = self.frame.length;
        if index >= self.surface.capacity() {
            return self.abort_with(ErrorCode::LengthOverflow, Some(u32::from(index)), Some(byte));
        }
        self.surface
            .set_pixel(index, color_from_rgb24(self.frame.color));
        self.commit(CommandKind::Pixel)
    }

    fn finish_shade(&mut self, byte: u8) -> Step {
        if self.frame.digits != COLOR_DIGITS {
            return self.abort_with(
                ErrorCode::UnexpectedReturn,
                Some(u32::from(self.frame.digits)),
                Some(byte),
            );
        }
        let color = color_from_rgb24(self.frame.color);
        for index in 0..self.frame.length {
            self.surface.set_pixel(index, color);
        }
        self.commit(CommandKind::Shade)
    }

    fn finish_raw_frame(&mut self, byte: u8) -> Step {
        if self.frame.digits != 0 || self.frame.colors_done != self.frame.part_length() {
            return self.abort_with(
                ErrorCode::UnexpectedReturn,
                Some(u32::from(self.frame.colors_done)),
                Some(byte),
            );
        }
        let part_index = self.frame.part_index();
        diag::done_report(&mut self.transport, part_index);
        self.commit(CommandKind::RawFrame)
    }

    fn abort(&mut self, code: ErrorCode, param: Option<u32>, offending: Option<u8>) {
        diag::report(
            &mut self.transport,
            self.session.quiet,
            code,
            param,
            offending,
        );
        self.reset_frame();
    }

    fn abort_with(&mut self, code: ErrorCode, param: Option<u32>, offending: Option<u8>) -> Step {
        self.abort(code, param, offending);
        Step::Aborted(code)
    }

    fn commit(&mut self, kind: CommandKind) -> Step {
        self.reset_frame();
        Step::Committed(kind)
    }

    fn reset_frame(&mut self) {
        self.frame.reset();
        self.parity.reset(PARITY_SEED);
    }
}
