//! Flame-color classification of a single frame.
//!
//! Pure functions only: the same bytes always produce the same result, and
//! nothing is remembered between frames.

use crate::colors::pixel_to_hsv;
use crate::frame::{BYTES_PER_PIXEL, Frame};
use crate::types::{ColorRange, DetectionResult};

/// Mask byte written for a matching pixel.
pub const MASK_MATCH: u8 = 0xFF;

/// Mask byte written for a non-matching pixel.
pub const MASK_CLEAR: u8 = 0x00;

/// Errors that can occur while classifying a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClassifyError {
    /// Buffer length does not match `width * height * 3`.
    ///
    /// `expected` is None when the dimensions overflow `usize`.
    InvalidFrame {
        expected: Option<usize>,
        actual: usize,
    },

    /// The mask buffer has fewer entries than the frame has pixels.
    MaskTooSmall { required: usize, actual: usize },
}

impl core::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ClassifyError::InvalidFrame {
                expected: Some(expected),
                actual,
            } => {
                write!(
                    f,
                    "invalid frame: expected {} bytes, got {}",
                    expected, actual
                )
            }
            ClassifyError::InvalidFrame {
                expected: None,
                actual,
            } => {
                write!(
                    f,
                    "invalid frame: dimensions overflow ({} bytes supplied)",
                    actual
                )
            }
            ClassifyError::MaskTooSmall { required, actual } => {
                write!(
                    f,
                    "mask buffer too small: need {} entries, got {}",
                    required, actual
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClassifyError {}

/// Classifies a frame as flame or not.
///
/// Counts the pixels whose 8-bit HSV value falls inside `range` and reports
/// `flame = true` only when that count is strictly greater than
/// `pixel_threshold`.
///
/// # Errors
/// * `InvalidFrame` - The buffer length is inconsistent with the dimensions
pub fn classify(
    frame: &Frame<'_>,
    range: &ColorRange,
    pixel_threshold: u32,
) -> Result<DetectionResult, ClassifyError> {
    let pixels = checked_pixels(frame)?;

    let matching = pixels
        .chunks_exact(BYTES_PER_PIXEL)
        .filter(|px| range.contains(pixel_to_hsv([px[0], px[1], px[2]], frame.layout())))
        .count();

    let matching_pixels = saturate_u32(matching);
    Ok(DetectionResult {
        flame: matching_pixels > pixel_threshold,
        matching_pixels,
        total_pixels: saturate_u32(pixels.len() / BYTES_PER_PIXEL),
    })
}

/// Writes a binary mask of matching pixels and returns how many matched.
///
/// `mask[i]` becomes [`MASK_MATCH`] when pixel `i` (row-major) is inside
/// `range`, [`MASK_CLEAR`] otherwise. Entries past the pixel count are left
/// untouched.
///
/// # Errors
/// * `InvalidFrame` - The buffer length is inconsistent with the dimensions
/// * `MaskTooSmall` - `mask` is shorter than the number of pixels
pub fn match_mask(
    frame: &Frame<'_>,
    range: &ColorRange,
    mask: &mut [u8],
) -> Result<u32, ClassifyError> {
    let pixels = checked_pixels(frame)?;
    let required = pixels.len() / BYTES_PER_PIXEL;
    if mask.len() < required {
        return Err(ClassifyError::MaskTooSmall {
            required,
            actual: mask.len(),
        });
    }

    let mut matching = 0usize;
    for (px, out) in pixels.chunks_exact(BYTES_PER_PIXEL).zip(mask.iter_mut()) {
        if range.contains(pixel_to_hsv([px[0], px[1], px[2]], frame.layout())) {
            *out = MASK_MATCH;
            matching += 1;
        } else {
            *out = MASK_CLEAR;
        }
    }

    Ok(saturate_u32(matching))
}

fn checked_pixels<'a>(frame: &Frame<'a>) -> Result<&'a [u8], ClassifyError> {
    let data = frame.data();
    match frame.expected_len() {
        Some(expected) if expected == data.len() => Ok(data),
        expected => Err(ClassifyError::InvalidFrame {
            expected,
            actual: data.len(),
        }),
    }
}

#[inline]
fn saturate_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COLOR_RANGE;
    use crate::types::PixelLayout;

    const FLAME: [u8; 3] = [255, 200, 0];
    const SKY: [u8; 3] = [40, 90, 220];

    fn frame_bytes<const N: usize>(pixels: [[u8; 3]; N]) -> [u8; 64] {
        let mut buf = [0u8; 64];
        for (i, px) in pixels.iter().enumerate() {
            buf[i * 3..i * 3 + 3].copy_from_slice(px);
        }
        buf
    }

    #[test]
    fn counts_only_pixels_inside_range() {
        let buf = frame_bytes([FLAME, SKY, FLAME, SKY]);
        let frame = Frame::new(2, 2, PixelLayout::Rgb, &buf[..12]);

        let result = classify(&frame, &DEFAULT_COLOR_RANGE, 1).unwrap();
        assert_eq!(result.matching_pixels, 2);
        assert_eq!(result.total_pixels, 4);
        assert!(result.flame);
    }

    #[test]
    fn count_equal_to_threshold_is_not_flame() {
        let buf = frame_bytes([FLAME, FLAME, SKY, SKY]);
        let frame = Frame::new(4, 1, PixelLayout::Rgb, &buf[..12]);

        let result = classify(&frame, &DEFAULT_COLOR_RANGE, 2).unwrap();
        assert_eq!(result.matching_pixels, 2);
        assert!(!result.flame);
    }

    #[test]
    fn short_buffer_is_invalid_frame() {
        let buf = frame_bytes([FLAME, FLAME]);
        let frame = Frame::new(2, 2, PixelLayout::Rgb, &buf[..6]);

        assert_eq!(
            classify(&frame, &DEFAULT_COLOR_RANGE, 0),
            Err(ClassifyError::InvalidFrame {
                expected: Some(12),
                actual: 6
            })
        );
    }

    #[test]
    fn mask_marks_matching_pixels() {
        let buf = frame_bytes([SKY, FLAME, SKY]);
        let frame = Frame::new(3, 1, PixelLayout::Rgb, &buf[..9]);
        let mut mask = [0x55u8; 4];

        let matching = match_mask(&frame, &DEFAULT_COLOR_RANGE, &mut mask).unwrap();
        assert_eq!(matching, 1);
        assert_eq!(mask, [MASK_CLEAR, MASK_MATCH, MASK_CLEAR, 0x55]);
    }

    #[test]
    fn mask_rejects_short_output() {
        let buf = frame_bytes([SKY, FLAME, SKY]);
        let frame = Frame::new(3, 1, PixelLayout::Rgb, &buf[..9]);
        let mut mask = [0u8; 2];

        assert_eq!(
            match_mask(&frame, &DEFAULT_COLOR_RANGE, &mut mask),
            Err(ClassifyError::MaskTooSmall {
                required: 3,
                actual: 2
            })
        );
    }
}
