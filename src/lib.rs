#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Frame`**: A borrowed, interleaved 8-bit RGB/BGR image handed out by a `FrameSource`
//! - **`ColorRange`**: Inclusive HSV window (8-bit scale) that counts as flame-colored
//! - **`classify`**: Pure function turning a frame into a `DetectionResult`
//! - **`AlarmController`**: `Idle` / `Alarming` / `Cooldown` state machine emitting `ActuatorCommand`s
//! - **`FlameMonitor`**: The polling loop that owns the camera and the alarm output
//! - **`Config`**: Immutable settings built once through `ConfigBuilder`
//! - **`FrameSource`**: Trait to implement for your camera
//! - **`Actuator`**: Trait to implement for your siren/strobe output (or use `PinActuator`)
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`StopSignal`**: External shutdown request, checked between iterations
//!
//! The library is `no_std` by default. Enable `std` for `host::SystemClock` and
//! `host::ThreadDelay`, and `defmt` or `log` for diagnostics.

#[macro_use]
mod fmt;

pub mod actuator;
pub mod alarm;
pub mod classifier;
pub mod colors;
pub mod command;
pub mod config;
pub mod frame;
#[cfg(feature = "std")]
pub mod host;
pub mod monitor;
pub mod time;
pub mod types;

pub use actuator::{ActiveLevel, Actuator, PinActuator};
pub use alarm::{AlarmController, AlarmState};
pub use classifier::{ClassifyError, classify, match_mask};
pub use command::ActuatorCommand;
pub use config::{Config, ConfigBuilder};
pub use frame::{Frame, FrameFormat, FrameSource};
pub use monitor::{FlameMonitor, MonitorStats, SkipReason, StartupError, StepOutcome, StopSignal};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{ChannelId, ColorRange, ConfigError, DetectionResult, FrameSize, HsvBound, PixelLayout};
