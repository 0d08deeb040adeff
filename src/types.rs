//! Core value types shared by the classifier, controller and monitor.

/// Largest hue on the 8-bit HSV scale (degrees halved).
pub const HUE_MAX: u8 = 179;

/// A point in 8-bit HSV space.
///
/// Hue is stored as degrees / 2 (`0..=179`); saturation and value span `0..=255`.
/// This is the scale most camera tooling uses for 8-bit HSV images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HsvBound {
    /// Hue, `0..=179`.
    pub hue: u8,

    /// Saturation, `0..=255`.
    pub saturation: u8,

    /// Value (brightness), `0..=255`.
    pub value: u8,
}

impl HsvBound {
    /// Creates a new HSV triple.
    #[inline]
    pub const fn new(hue: u8, saturation: u8, value: u8) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }
}

/// Inclusive HSV window used to classify a pixel as flame-colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorRange {
    lower: HsvBound,
    upper: HsvBound,
}

impl ColorRange {
    /// Creates a range from its lower and upper bounds.
    ///
    /// Bounds are not checked here; [`ConfigBuilder::build`](crate::ConfigBuilder::build)
    /// rejects inverted or out-of-scale ranges.
    #[inline]
    pub const fn new(lower: HsvBound, upper: HsvBound) -> Self {
        Self { lower, upper }
    }

    /// Returns the lower bound.
    #[inline]
    pub fn lower(&self) -> HsvBound {
        self.lower
    }

    /// Returns the upper bound.
    #[inline]
    pub fn upper(&self) -> HsvBound {
        self.upper
    }

    /// Returns true if every component of `pixel` lies within the bounds.
    #[inline]
    pub fn contains(&self, pixel: HsvBound) -> bool {
        (self.lower.hue..=self.upper.hue).contains(&pixel.hue)
            && (self.lower.saturation..=self.upper.saturation).contains(&pixel.saturation)
            && (self.lower.value..=self.upper.value).contains(&pixel.value)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.lower.hue > HUE_MAX || self.upper.hue > HUE_MAX {
            return Err(ConfigError::HueOutOfRange);
        }

        if self.lower.hue > self.upper.hue
            || self.lower.saturation > self.upper.saturation
            || self.lower.value > self.upper.value
        {
            return Err(ConfigError::InvertedColorRange);
        }

        Ok(())
    }
}

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// Creates a new frame size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels, or None if the product does not fit in `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        let width = usize::try_from(self.width).ok()?;
        let height = usize::try_from(self.height).ok()?;
        width.checked_mul(height)
    }
}

/// Byte order of the three interleaved 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelLayout {
    /// Red, green, blue.
    #[default]
    Rgb,

    /// Blue, green, red (the usual camera-native order).
    Bgr,
}

/// Logical identifier of the output channel that drives the siren/strobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(pub u8);

impl From<u8> for ChannelId {
    fn from(id: u8) -> Self {
        ChannelId(id)
    }
}

impl From<ChannelId> for u8 {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

/// Result of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectionResult {
    /// True when the matching-pixel count is strictly above the threshold.
    pub flame: bool,

    /// Number of pixels inside the color range.
    pub matching_pixels: u32,

    /// Number of pixels in the frame.
    pub total_pixels: u32,
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Polling interval is zero.
    ZeroPollInterval,

    /// Polling interval is shorter than the 1 ms sleep granularity.
    PollIntervalTooShort,

    /// Frame width or height is zero.
    EmptyFrameSize,

    /// A lower bound component exceeds its upper bound.
    InvertedColorRange,

    /// A hue bound exceeds [`HUE_MAX`].
    HueOutOfRange,

    /// The frame has no more pixels than the threshold, so it can never trigger.
    ThresholdUnreachable {
        /// Configured pixel threshold.
        threshold: u32,
        /// Pixels in a frame of the configured size.
        pixels: u64,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroPollInterval => {
                write!(f, "polling interval must be non-zero")
            }
            ConfigError::PollIntervalTooShort => {
                write!(f, "polling interval must be at least 1 ms")
            }
            ConfigError::EmptyFrameSize => {
                write!(f, "frame width and height must be non-zero")
            }
            ConfigError::InvertedColorRange => {
                write!(f, "color range lower bound exceeds upper bound")
            }
            ConfigError::HueOutOfRange => {
                write!(f, "hue bounds must be within 0..={}", HUE_MAX)
            }
            ConfigError::ThresholdUnreachable { threshold, pixels } => {
                write!(
                    f,
                    "pixel threshold {} can never be exceeded by a {}-pixel frame",
                    threshold, pixels
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
