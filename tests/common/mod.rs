//! Shared test infrastructure for flame-sentry integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use std::collections::VecDeque;

use flame_sentry::{
    Actuator, Frame, FrameFormat, FrameSource, PixelLayout, StopSignal, TimeDuration, TimeInstant,
    TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
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

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing (milliseconds since boot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TestInstant {
    pub fn secs(secs: u64) -> Self {
        TestInstant(secs * 1000)
    }
}

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.saturating_sub(earlier.0))
    }
}

pub fn secs(secs: u64) -> TestDuration {
    TestDuration(secs * 1000)
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

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }

    pub fn now_millis(&self) -> u64 {
        self.current_time.get().0
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Actuator
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorFault;

/// Mock actuator that records every successful output change
pub struct MockActuator {
    level: Option<bool>,
    history: heapless::Vec<bool, 64>,
    calls: u32,
    failing_calls: core::ops::Range<u32>,
}

impl MockActuator {
    pub fn new() -> Self {
        Self {
            level: None,
            history: heapless::Vec::new(),
            calls: 0,
            failing_calls: 0..0,
        }
    }

    /// Makes `count` calls to `set_output` fail, starting with call number
    /// `first` (calls are numbered from zero).
    pub fn fail_calls(&mut self, first: u32, count: u32) {
        self.failing_calls = first..first + count;
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// Current level, or None if never successfully set.
    pub fn level(&self) -> Option<bool> {
        self.level
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }

    pub fn on_count(&self) -> usize {
        self.history.iter().filter(|on| **on).count()
    }
}

impl Actuator for MockActuator {
    type Error = ActuatorFault;

    fn set_output(&mut self, on: bool) -> Result<(), Self::Error> {
        let call = self.calls;
        self.calls += 1;
        if self.failing_calls.contains(&call) {
            return Err(ActuatorFault);
        }

        self.level = Some(on);
        let _ = self.history.push(on);
        Ok(())
    }
}

// ============================================================================
// Scripted Frame Source
// ============================================================================

pub const FLAME_RGB: [u8; 3] = [255, 200, 0];
pub const SKY_RGB: [u8; 3] = [40, 90, 220];

pub const FRAME_WIDTH: u32 = 40;
pub const FRAME_HEIGHT: u32 = 30;
pub const FRAME_PIXELS: usize = (FRAME_WIDTH * FRAME_HEIGHT) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFault {
    StartFailed,
    Unavailable,
    StopFailed,
}

/// One scripted capture result
#[derive(Debug, Clone, Copy)]
pub enum Capture {
    /// A well-formed frame with this many flame-colored pixels
    Flame(usize),
    /// A frame whose buffer is shorter than its dimensions claim
    Malformed,
    /// The camera returns an error
    Unavailable,
}

/// Frame source that replays a script of captures
pub struct ScriptedSource {
    script: VecDeque<Capture>,
    buffer: Vec<u8>,
    started_with: Option<FrameFormat>,
    fail_start: bool,
    fail_stop: bool,
    stop_calls: u32,
    captures: u32,
}

impl ScriptedSource {
    pub fn new(script: &[Capture]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            buffer: Vec::with_capacity(FRAME_PIXELS * 3),
            started_with: None,
            fail_start: false,
            fail_stop: false,
            stop_calls: 0,
            captures: 0,
        }
    }

    pub fn failing_start() -> Self {
        let mut source = Self::new(&[]);
        source.fail_start = true;
        source
    }

    pub fn fail_stop(&mut self) {
        self.fail_stop = true;
    }

    pub fn push(&mut self, capture: Capture) {
        self.script.push_back(capture);
    }

    pub fn started_with(&self) -> Option<FrameFormat> {
        self.started_with
    }

    pub fn stop_calls(&self) -> u32 {
        self.stop_calls
    }

    pub fn captures(&self) -> u32 {
        self.captures
    }
}

impl FrameSource for ScriptedSource {
    type Error = SourceFault;

    fn start(&mut self, format: FrameFormat) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(SourceFault::StartFailed);
        }
        self.started_with = Some(format);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.stop_calls += 1;
        if self.fail_stop {
            return Err(SourceFault::StopFailed);
        }
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame<'_>, Self::Error> {
        self.captures += 1;
        match self.script.pop_front() {
            Some(Capture::Flame(count)) => {
                self.buffer = frame_bytes(count, FRAME_PIXELS);
                Ok(Frame::new(FRAME_WIDTH, FRAME_HEIGHT, PixelLayout::Rgb, &self.buffer))
            }
            Some(Capture::Malformed) => {
                self.buffer = frame_bytes(0, FRAME_PIXELS / 2);
                Ok(Frame::new(FRAME_WIDTH, FRAME_HEIGHT, PixelLayout::Rgb, &self.buffer))
            }
            Some(Capture::Unavailable) | None => Err(SourceFault::Unavailable),
        }
    }
}

// ============================================================================
// Stop Signal
// ============================================================================

/// Stop signal that trips after a fixed number of checks
pub struct StopAfter {
    checks_left: Cell<u32>,
}

impl StopAfter {
    pub fn new(iterations: u32) -> Self {
        Self {
            checks_left: Cell::new(iterations),
        }
    }
}

impl StopSignal for StopAfter {
    fn is_stop_requested(&self) -> bool {
        let left = self.checks_left.get();
        if left == 0 {
            return true;
        }
        self.checks_left.set(left - 1);
        false
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Delay that advances a mock clock instead of sleeping
pub struct ClockDelay<'a> {
    clock: &'a MockTimeSource,
    pub total_ms: u64,
    pub calls: u32,
}

impl<'a> ClockDelay<'a> {
    pub fn new(clock: &'a MockTimeSource) -> Self {
        Self {
            clock,
            total_ms: 0,
            calls: 0,
        }
    }
}

impl embedded_hal::delay::DelayNs for ClockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        let ms = u64::from(ns) / 1_000_000;
        self.calls += 1;
        self.total_ms += ms;
        self.clock.advance(TestDuration(ms));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ms += u64::from(ms);
        self.clock.advance(TestDuration(u64::from(ms)));
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Builds an RGB buffer with `flame` flame-colored pixels followed by sky pixels
pub fn frame_bytes(flame: usize, total: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(total * 3);
    for i in 0..total {
        let px = if i < flame { FLAME_RGB } else { SKY_RGB };
        bytes.extend_from_slice(&px);
    }
    bytes
}
