//! Alarm state machine with hold and cooldown timing.
//!
//! Provides [`AlarmController`], which turns a stream of per-frame detection
//! flags into actuator commands. It owns no hardware and never sleeps; all
//! timing is evaluated against the instant passed to [`AlarmController::advance`].

use crate::command::ActuatorCommand;
use crate::config::Config;
use crate::time::{TimeDuration, TimeInstant};

/// The current state of an alarm controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// Watching. The actuator is off and a detection raises the alarm.
    Idle,
    /// Actuator on. Detections are ignored until the hold time has elapsed.
    Alarming,
    /// Actuator off. Detections are ignored until the cooldown has elapsed.
    Cooldown,
}

#[derive(Debug, Clone, Copy)]
enum Phase<I> {
    Idle,
    Alarming { since: I },
    Cooldown { since: I },
}

/// Debounces flame detections into alarm on/off commands.
///
/// - `Idle` + detection: switch to `Alarming`, emit [`ActuatorCommand::On`].
/// - `Alarming`: once `hold` has elapsed, switch to `Cooldown`, emit
///   [`ActuatorCommand::Off`]. Detections never re-trigger.
/// - `Cooldown`: once `cooldown` has elapsed, return to `Idle`. A detection in
///   the same call as the expiry raises a fresh alarm straight away.
///
/// Exactly one `On` is emitted per `Idle -> Alarming` transition and exactly one
/// `Off` per `Alarming -> Cooldown` transition.
///
/// # Type Parameters
/// * `I` - Time instant type
#[derive(Debug, Clone)]
pub struct AlarmController<I: TimeInstant> {
    hold: I::Duration,
    cooldown: I::Duration,
    phase: Phase<I>,
    alarms_raised: u32,
}

impl<I: TimeInstant> AlarmController<I> {
    /// Creates an idle controller with independent hold and cooldown durations.
    pub fn new(hold: I::Duration, cooldown: I::Duration) -> Self {
        Self {
            hold,
            cooldown,
            phase: Phase::Idle,
            alarms_raised: 0,
        }
    }

    /// Creates an idle controller using the durations from `config`.
    pub fn from_config(config: &Config<I::Duration>) -> Self {
        Self::new(config.hold(), config.cooldown())
    }

    /// Advances the state machine by one observation.
    ///
    /// `now` should never go backwards. If it does, the elapsed time is read as
    /// zero rather than negative, so the current phase simply lasts longer.
    ///
    /// # Returns
    /// * `Some(On)` - An alarm was just raised
    /// * `Some(Off)` - The hold time just ran out
    /// * `None` - Leave the actuator as it is
    pub fn advance(&mut self, detected: bool, now: I) -> Option<ActuatorCommand> {
        match self.phase {
            Phase::Idle => self.idle(detected, now),
            Phase::Alarming { since } => {
                if now.duration_since(since) >= self.hold {
                    self.phase = Phase::Cooldown { since: now };
                    Some(ActuatorCommand::Off)
                } else {
                    None
                }
            }
            Phase::Cooldown { since } => {
                if now.duration_since(since) >= self.cooldown {
                    self.phase = Phase::Idle;
                    self.idle(detected, now)
                } else {
                    None
                }
            }
        }
    }

    fn idle(&mut self, detected: bool, now: I) -> Option<ActuatorCommand> {
        if !detected {
            return None;
        }

        self.phase = Phase::Alarming { since: now };
        self.alarms_raised = self.alarms_raised.saturating_add(1);
        Some(ActuatorCommand::On)
    }

    /// Returns the current state.
    pub fn state(&self) -> AlarmState {
        match self.phase {
            Phase::Idle => AlarmState::Idle,
            Phase::Alarming { .. } => AlarmState::Alarming,
            Phase::Cooldown { .. } => AlarmState::Cooldown,
        }
    }

    /// Returns when the current `Alarming` or `Cooldown` phase began.
    pub fn phase_started(&self) -> Option<I> {
        match self.phase {
            Phase::Idle => None,
            Phase::Alarming { since } | Phase::Cooldown { since } => Some(since),
        }
    }

    /// Returns how much of the current timed phase is left at `now`.
    ///
    /// `None` while idle; `ZERO` once the phase is due to end on the next
    /// [`advance`](Self::advance).
    pub fn remaining(&self, now: I) -> Option<I::Duration> {
        let (since, length) = match self.phase {
            Phase::Idle => return None,
            Phase::Alarming { since } => (since, self.hold),
            Phase::Cooldown { since } => (since, self.cooldown),
        };
        Some(length.saturating_sub(now.duration_since(since)))
    }

    /// Returns the hold duration.
    pub fn hold(&self) -> I::Duration {
        self.hold
    }

    /// Returns the cooldown duration.
    pub fn cooldown(&self) -> I::Duration {
        self.cooldown
    }

    /// Returns how many alarms have been raised since construction.
    pub fn alarms_raised(&self) -> u32 {
        self.alarms_raised
    }
}
