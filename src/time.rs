//! Time abstraction traits for platform-agnostic timing.
//!
//! The alarm controller only ever asks "how long since this instant?", so the
//! traits here stay small enough to wrap a hardware tick counter, an embassy
//! `Instant`, or `std::time::Instant` on a host.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq + PartialOrd {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Creates duration from whole seconds.
    fn from_secs(secs: u64) -> Self {
        Self::from_millis(secs.saturating_mul(1000))
    }

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Must saturate to [`TimeDuration::ZERO`] when `earlier` is actually later
    /// than `self`. A clock that steps backwards then reads as "no time passed".
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

impl TimeDuration for core::time::Duration {
    const ZERO: Self = core::time::Duration::ZERO;

    fn as_millis(&self) -> u64 {
        u64::try_from(core::time::Duration::as_millis(self)).unwrap_or(u64::MAX)
    }

    fn from_millis(millis: u64) -> Self {
        core::time::Duration::from_millis(millis)
    }

    fn from_secs(secs: u64) -> Self {
        core::time::Duration::from_secs(secs)
    }

    fn saturating_sub(self, other: Self) -> Self {
        core::time::Duration::saturating_sub(self, other)
    }
}

#[cfg(feature = "std")]
impl TimeInstant for std::time::Instant {
    type Duration = core::time::Duration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        self.saturating_duration_since(earlier)
    }
}
