//! Time and delay implementations for hosted targets (Linux SBCs and the like).

use crate::time::TimeSource;
use embedded_hal::delay::DelayNs;
use std::time::{Duration, Instant};

/// Monotonic wall clock backed by [`std::time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates the clock. It has no state; every `now` reads `Instant::now`.
    pub fn new() -> Self {
        SystemClock
    }
}

impl TimeSource<Instant> for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// [`DelayNs`] that parks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl ThreadDelay {
    /// Creates a delay that sleeps the calling thread.
    pub fn new() -> Self {
        ThreadDelay
    }
}

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
