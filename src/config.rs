//! Immutable monitor configuration and its validating builder.

use crate::frame::FrameFormat;
use crate::time::TimeDuration;
use crate::types::{ChannelId, ColorRange, ConfigError, FrameSize, HsvBound, PixelLayout};

/// Default actuator output channel.
pub const DEFAULT_ACTUATOR_CHANNEL: ChannelId = ChannelId(17);

/// Default time the actuator stays on once an alarm is raised.
pub const DEFAULT_HOLD_MILLIS: u64 = 10_000;

/// Default suppression window after the actuator turns off.
pub const DEFAULT_COOLDOWN_MILLIS: u64 = DEFAULT_HOLD_MILLIS + 5_000;

/// Default matching-pixel count a frame must exceed.
pub const DEFAULT_PIXEL_THRESHOLD: u32 = 500;

/// Default capture resolution.
pub const DEFAULT_FRAME_SIZE: FrameSize = FrameSize::new(640, 480);

/// Default pause between evaluations (about four per second).
pub const DEFAULT_POLL_INTERVAL_MILLIS: u64 = 250;

/// Default flame window: orange-to-yellow hues, moderately saturated and bright.
pub const DEFAULT_COLOR_RANGE: ColorRange =
    ColorRange::new(HsvBound::new(18, 50, 50), HsvBound::new(35, 255, 255));

/// Everything the monitor needs to know, fixed at startup.
///
/// Build one with [`Config::builder`] or take [`Config::default`]. There is no
/// way to change a `Config` after it is built.
///
/// # Type Parameters
/// * `D` - The duration type (e.g., `embassy_time::Duration`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config<D: TimeDuration> {
    actuator_channel: ChannelId,
    hold: D,
    cooldown: D,
    pixel_threshold: u32,
    frame_size: FrameSize,
    pixel_layout: PixelLayout,
    poll_interval: D,
    color_range: ColorRange,
}

impl<D: TimeDuration> Config<D> {
    /// Creates a builder seeded with the defaults.
    pub fn builder() -> ConfigBuilder<D> {
        ConfigBuilder::new()
    }

    /// Output channel the actuator is wired to.
    pub fn actuator_channel(&self) -> ChannelId {
        self.actuator_channel
    }

    /// How long the actuator stays on after an alarm is raised.
    pub fn hold(&self) -> D {
        self.hold
    }

    /// How long new alarms are suppressed after the actuator turns off.
    pub fn cooldown(&self) -> D {
        self.cooldown
    }

    /// Matching-pixel count a frame must strictly exceed to count as flame.
    pub fn pixel_threshold(&self) -> u32 {
        self.pixel_threshold
    }

    /// Resolution requested from the frame source.
    pub fn frame_size(&self) -> FrameSize {
        self.frame_size
    }

    /// Channel order requested from the frame source.
    pub fn pixel_layout(&self) -> PixelLayout {
        self.pixel_layout
    }

    /// Format handed to [`FrameSource::start`](crate::FrameSource::start).
    pub fn frame_format(&self) -> FrameFormat {
        FrameFormat {
            size: self.frame_size,
            layout: self.pixel_layout,
        }
    }

    /// Pause between loop iterations.
    pub fn poll_interval(&self) -> D {
        self.poll_interval
    }

    /// HSV window that counts as flame-colored.
    pub fn color_range(&self) -> ColorRange {
        self.color_range
    }
}

impl<D: TimeDuration> Default for Config<D> {
    fn default() -> Self {
        Self {
            actuator_channel: DEFAULT_ACTUATOR_CHANNEL,
            hold: D::from_millis(DEFAULT_HOLD_MILLIS),
            cooldown: D::from_millis(DEFAULT_COOLDOWN_MILLIS),
            pixel_threshold: DEFAULT_PIXEL_THRESHOLD,
            frame_size: DEFAULT_FRAME_SIZE,
            pixel_layout: PixelLayout::default(),
            poll_interval: D::from_millis(DEFAULT_POLL_INTERVAL_MILLIS),
            color_range: DEFAULT_COLOR_RANGE,
        }
    }
}

/// Builder for constructing a validated [`Config`].
///
/// Every setting starts at its default; only the ones you touch change.
#[derive(Debug)]
pub struct ConfigBuilder<D: TimeDuration> {
    config: Config<D>,
}

impl<D: TimeDuration> ConfigBuilder<D> {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the actuator output channel.
    pub fn actuator_channel(mut self, channel: ChannelId) -> Self {
        self.config.actuator_channel = channel;
        self
    }

    /// Sets the alarm hold duration.
    pub fn hold(mut self, hold: D) -> Self {
        self.config.hold = hold;
        self
    }

    /// Sets the cooldown duration. Independent of the hold duration.
    pub fn cooldown(mut self, cooldown: D) -> Self {
        self.config.cooldown = cooldown;
        self
    }

    /// Sets the matching-pixel threshold.
    pub fn pixel_threshold(mut self, threshold: u32) -> Self {
        self.config.pixel_threshold = threshold;
        self
    }

    /// Sets the requested frame resolution.
    pub fn frame_size(mut self, size: FrameSize) -> Self {
        self.config.frame_size = size;
        self
    }

    /// Sets the requested channel order.
    pub fn pixel_layout(mut self, layout: PixelLayout) -> Self {
        self.config.pixel_layout = layout;
        self
    }

    /// Sets the pause between loop iterations.
    pub fn poll_interval(mut self, interval: D) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Sets the flame HSV window.
    pub fn color_range(mut self, range: ColorRange) -> Self {
        self.config.color_range = range;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `ZeroPollInterval` - Polling interval is zero
    /// * `PollIntervalTooShort` - Polling interval is under one millisecond
    /// * `EmptyFrameSize` - Width or height is zero
    /// * `HueOutOfRange` - A hue bound is above 179
    /// * `InvertedColorRange` - A lower bound exceeds its upper bound
    /// * `ThresholdUnreachable` - The frame cannot hold more pixels than the threshold
    pub fn build(self) -> Result<Config<D>, ConfigError> {
        let config = self.config;

        if config.poll_interval == D::ZERO {
            return Err(ConfigError::ZeroPollInterval);
        }
        if config.poll_interval.as_millis() == 0 {
            return Err(ConfigError::PollIntervalTooShort);
        }

        let FrameSize { width, height } = config.frame_size;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyFrameSize);
        }

        config.color_range.validate()?;

        let pixels = u64::from(width) * u64::from(height);
        if pixels <= u64::from(config.pixel_threshold) {
            return Err(ConfigError::ThresholdUnreachable {
                threshold: config.pixel_threshold,
                pixels,
            });
        }

        Ok(config)
    }
}

impl<D: TimeDuration> Default for ConfigBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
