//! Borrowed video frames and the camera abstraction that produces them.

use crate::types::{FrameSize, PixelLayout};

/// Bytes per pixel: three interleaved 8-bit channels.
pub const BYTES_PER_PIXEL: usize = 3;

/// Resolution and channel order requested from a [`FrameSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameFormat {
    pub size: FrameSize,
    pub layout: PixelLayout,
}

/// A single captured frame, borrowed from the source's buffer.
///
/// Construction does not check the buffer against the dimensions; the
/// classifier does, so a source handing out a short buffer is reported as
/// an invalid frame rather than a panic.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Wraps an interleaved pixel buffer.
    #[inline]
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Declared dimensions.
    #[inline]
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    /// Channel order of [`Frame::data`].
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Raw interleaved bytes.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Buffer length implied by the dimensions, or None on overflow.
    pub fn expected_len(&self) -> Option<usize> {
        self.size().pixel_count()?.checked_mul(BYTES_PER_PIXEL)
    }
}

/// Trait for abstracting the camera.
///
/// Implement this for your capture pipeline (V4L2, libcamera, a DCMI
/// peripheral, a recorded clip, ...). The monitor owns the source for its whole
/// lifetime and calls `start` once, `capture_frame` once per iteration and
/// `stop` exactly once on shutdown.
pub trait FrameSource {
    /// Error reported by the capture backend.
    type Error: core::fmt::Debug;

    /// Opens the device and starts streaming in the requested format.
    ///
    /// A failure here aborts monitor startup.
    fn start(&mut self, format: FrameFormat) -> Result<(), Self::Error>;

    /// Stops streaming and releases the device.
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Returns the next frame.
    ///
    /// A failure here is treated as "source unavailable" for one iteration;
    /// the monitor retries on its next scheduled iteration.
    fn capture_frame(&mut self) -> Result<Frame<'_>, Self::Error>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    type Error = S::Error;

    fn start(&mut self, format: FrameFormat) -> Result<(), Self::Error> {
        (**self).start(format)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        (**self).stop()
    }

    fn capture_frame(&mut self) -> Result<Frame<'_>, Self::Error> {
        (**self).capture_frame()
    }
}
