//! Polling loop tying the frame source, classifier, alarm controller and
//! actuator together.
//!
//! Provides [`FlameMonitor`], which owns the camera and the alarm output for
//! its whole lifetime and guarantees the output is commanded off and the
//! camera stopped when it goes away, whichever way that happens.

use crate::actuator::Actuator;
use crate::alarm::{AlarmController, AlarmState};
use crate::classifier::{ClassifyError, classify};
use crate::command::ActuatorCommand;
use crate::config::Config;
use crate::frame::FrameSource;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::DetectionResult;
use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::delay::DelayNs;

/// How many times the release path tries to switch the output off.
pub const RELEASE_ATTEMPTS: u32 = 3;

/// External request to stop the monitor.
///
/// Checked once before every iteration, so a stop is honoured within one
/// polling interval.
pub trait StopSignal {
    /// Returns true once the monitor should shut down.
    fn is_stop_requested(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn is_stop_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<S: StopSignal + ?Sized> StopSignal for &S {
    fn is_stop_requested(&self) -> bool {
        (**self).is_stop_requested()
    }
}

/// Why an iteration was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// The frame source could not deliver a frame.
    SourceUnavailable,
    /// The frame was delivered but is malformed.
    InvalidFrame(ClassifyError),
}

/// What a single [`FlameMonitor::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// The frame was classified and fed to the alarm controller.
    Evaluated {
        /// Classifier output for this frame.
        detection: DetectionResult,
        /// Command the controller emitted, if any.
        command: Option<ActuatorCommand>,
        /// Controller state after this frame.
        state: AlarmState,
    },
    /// Nothing was evaluated; the alarm state is unchanged.
    Skipped(SkipReason),
}

/// Running counters kept by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorStats {
    /// Frames classified and fed to the controller.
    pub frames_evaluated: u32,
    /// Iterations skipped because of a missing or malformed frame.
    pub frames_skipped: u32,
    /// Evaluated frames classified as flame.
    pub detections: u32,
    /// Alarms raised (`Idle -> Alarming` transitions).
    pub alarms_raised: u32,
    /// Failed attempts to set the actuator output.
    pub actuator_faults: u32,
}

/// Fatal errors while bringing the monitor up.
///
/// In both cases the actuator has been commanded off (or the attempt to do so
/// is what failed) before the error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupError<SE, AE> {
    /// The frame source failed to start.
    Source(SE),
    /// The actuator could not be forced into its safe off state.
    Actuator(AE),
}

impl<SE: core::fmt::Debug, AE: core::fmt::Debug> core::fmt::Display for StartupError<SE, AE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StartupError::Source(err) => {
                write!(f, "frame source failed to start: {:?}", err)
            }
            StartupError::Actuator(err) => {
                write!(f, "actuator failed to initialise: {:?}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<SE: core::fmt::Debug, AE: core::fmt::Debug> std::error::Error for StartupError<SE, AE> {}

/// Watches a camera for flame and drives the alarm output.
///
/// Each iteration captures one frame, classifies it, advances the
/// [`AlarmController`] with the current time and applies whatever command it
/// emits. Iterations are strictly sequential, so commands reach the actuator in
/// frame order.
///
/// The monitor owns the source and actuator. Dropping it, calling
/// [`shutdown`](Self::shutdown), or returning from [`run`](Self::run) all go
/// through the same release path: output off, then source stopped.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - Frame source implementation type
/// * `A` - Actuator implementation type
/// * `T` - Time source implementation type
/// * `D` - Delay implementation used between iterations
pub struct FlameMonitor<'t, I, S, A, T, D>
where
    I: TimeInstant,
    S: FrameSource,
    A: Actuator,
    T: TimeSource<I>,
    D: DelayNs,
{
    config: Config<I::Duration>,
    source: S,
    actuator: A,
    time_source: &'t T,
    delay: D,
    alarm: AlarmController<I>,
    output_on: bool,
    output_synced: bool,
    stats: MonitorStats,
    released: bool,
}

impl<'t, I, S, A, T, D> FlameMonitor<'t, I, S, A, T, D>
where
    I: TimeInstant,
    S: FrameSource,
    A: Actuator,
    T: TimeSource<I>,
    D: DelayNs,
{
    /// Acquires the hardware and brings the monitor up in `Idle`.
    ///
    /// Forces the actuator off first, then starts the frame source with the
    /// configured format.
    ///
    /// # Errors
    /// * `Actuator` - The output could not be forced off
    /// * `Source` - The frame source failed to start (the output is left off)
    pub fn start(
        config: Config<I::Duration>,
        mut source: S,
        mut actuator: A,
        time_source: &'t T,
        delay: D,
    ) -> Result<Self, StartupError<S::Error, A::Error>> {
        if let Err(err) = actuator.set_output(false) {
            error!("actuator on channel {} failed to initialise", config.actuator_channel().0);
            return Err(StartupError::Actuator(err));
        }

        if let Err(err) = source.start(config.frame_format()) {
            error!("frame source failed to start");
            return Err(StartupError::Source(err));
        }

        info!(
            "flame monitor started: channel {}, {}x{}, threshold {}, poll {} ms",
            config.actuator_channel().0,
            config.frame_size().width,
            config.frame_size().height,
            config.pixel_threshold(),
            config.poll_interval().as_millis(),
        );

        Ok(Self {
            alarm: AlarmController::from_config(&config),
            config,
            source,
            actuator,
            time_source,
            delay,
            output_on: false,
            output_synced: true,
            stats: MonitorStats::default(),
            released: false,
        })
    }

    /// Runs one iteration without sleeping.
    ///
    /// A capture failure or malformed frame skips the iteration and leaves the
    /// alarm state untouched. A pending actuator fault from an earlier
    /// iteration is retried first.
    pub fn step(&mut self) -> StepOutcome {
        if !self.output_synced {
            self.drive_output(self.output_on);
        }

        let frame = match self.source.capture_frame() {
            Ok(frame) => frame,
            Err(_) => {
                self.stats.frames_skipped = self.stats.frames_skipped.saturating_add(1);
                warn!("frame source unavailable, skipping iteration");
                return StepOutcome::Skipped(SkipReason::SourceUnavailable);
            }
        };

        let detection = match classify(
            &frame,
            &self.config.color_range(),
            self.config.pixel_threshold(),
        ) {
            Ok(detection) => detection,
            Err(err) => {
                self.stats.frames_skipped = self.stats.frames_skipped.saturating_add(1);
                warn!("skipping malformed frame: {:?}", err);
                return StepOutcome::Skipped(SkipReason::InvalidFrame(err));
            }
        };

        let now = self.time_source.now();
        let previous = self.alarm.state();
        let command = self.alarm.advance(detection.flame, now);
        if previous == AlarmState::Cooldown && self.alarm.state() != AlarmState::Cooldown {
            info!("cooldown over, watching again");
        }

        self.stats.frames_evaluated = self.stats.frames_evaluated.saturating_add(1);
        if detection.flame {
            self.stats.detections = self.stats.detections.saturating_add(1);
            debug!("flame pixels: {}", detection.matching_pixels);
        }

        if let Some(command) = command {
            match command {
                ActuatorCommand::On => {
                    self.stats.alarms_raised = self.stats.alarms_raised.saturating_add(1);
                    info!(
                        "flame detected ({} pixels), alarm raised",
                        detection.matching_pixels
                    );
                }
                ActuatorCommand::Off => {
                    info!("alarm hold elapsed, entering cooldown");
                }
            }
            self.output_on = command.level();
            self.drive_output(self.output_on);
        }

        StepOutcome::Evaluated {
            detection,
            command,
            state: self.alarm.state(),
        }
    }

    /// Polls until `stop` is raised, then shuts down.
    ///
    /// The stop signal is checked before every iteration, and each iteration is
    /// followed by one polling-interval sleep.
    ///
    /// # Errors
    /// Returns the last actuator error if the output could not be switched off
    /// during shutdown (see [`shutdown`](Self::shutdown)).
    pub fn run<X: StopSignal + ?Sized>(mut self, stop: &X) -> Result<MonitorStats, A::Error> {
        let interval_ms = u32::try_from(self.config.poll_interval().as_millis()).unwrap_or(u32::MAX);

        while !stop.is_stop_requested() {
            self.step();
            self.delay.delay_ms(interval_ms);
        }

        info!("stop requested");
        self.shutdown()
    }

    /// Commands the output off, stops the source and returns the final counters.
    ///
    /// The off command is attempted up to [`RELEASE_ATTEMPTS`] times. The source
    /// is stopped either way.
    ///
    /// # Errors
    /// Returns the last actuator error if every off attempt failed. The output
    /// may still be energised in that case.
    pub fn shutdown(mut self) -> Result<MonitorStats, A::Error> {
        self.release()?;
        Ok(self.stats)
    }

    fn release(&mut self) -> Result<(), A::Error> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        self.output_on = false;
        let switched_off = self.force_off();

        if self.source.stop().is_err() {
            warn!("frame source failed to stop cleanly");
        }

        info!(
            "flame monitor stopped: {} frames evaluated, {} skipped, {} alarms",
            self.stats.frames_evaluated,
            self.stats.frames_skipped,
            self.stats.alarms_raised,
        );

        switched_off
    }

    fn force_off(&mut self) -> Result<(), A::Error> {
        let mut attempt = 1;
        loop {
            match self.actuator.set_output(false) {
                Ok(()) => {
                    self.output_synced = true;
                    return Ok(());
                }
                Err(err) => {
                    self.output_synced = false;
                    self.stats.actuator_faults = self.stats.actuator_faults.saturating_add(1);
                    if attempt >= RELEASE_ATTEMPTS {
                        error!(
                            "actuator still not off after {} attempts, output may be energised",
                            RELEASE_ATTEMPTS
                        );
                        return Err(err);
                    }
                    warn!("actuator failed to switch off (attempt {}), retrying", attempt);
                    attempt += 1;
                }
            }
        }
    }

    fn drive_output(&mut self, on: bool) {
        match self.actuator.set_output(on) {
            Ok(()) => self.output_synced = true,
            Err(_) => {
                self.output_synced = false;
                self.stats.actuator_faults = self.stats.actuator_faults.saturating_add(1);
                error!("actuator failed to switch {}", if on { "on" } else { "off" });
            }
        }
    }

    /// Returns the current alarm state.
    pub fn state(&self) -> AlarmState {
        self.alarm.state()
    }

    /// Returns the alarm controller.
    pub fn alarm(&self) -> &AlarmController<I> {
        &self.alarm
    }

    /// Returns the counters gathered so far.
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Returns the configuration the monitor was started with.
    pub fn config(&self) -> &Config<I::Duration> {
        &self.config
    }

    /// Returns the logical output level the monitor wants the actuator at.
    pub fn output_on(&self) -> bool {
        self.output_on
    }

    /// Returns the actuator.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Returns the frame source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<I, S, A, T, D> Drop for FlameMonitor<'_, I, S, A, T, D>
where
    I: TimeInstant,
    S: FrameSource,
    A: Actuator,
    T: TimeSource<I>,
    D: DelayNs,
{
    fn drop(&mut self) {
        // Failures are logged inside release.
        let _ = self.release();
    }
}
