//! Color space conversion helpers.
//!
//! Converts 8-bit camera pixels into the 8-bit HSV scale used by
//! [`ColorRange`](crate::ColorRange): hue in degrees / 2 (`0..=179`),
//! saturation and value scaled to `0..=255`. The conversion itself goes through
//! `palette`; only the final scaling is done here.

use crate::types::{HUE_MAX, HsvBound, PixelLayout};
use palette::{FromColor, Hsv, Srgb};

/// Converts an 8-bit RGB pixel to 8-bit HSV.
#[inline]
pub fn rgb_to_hsv(red: u8, green: u8, blue: u8) -> HsvBound {
    let rgb: Srgb<f32> = Srgb::new(red, green, blue).into_format();
    let hsv: Hsv = Hsv::from_color(rgb);

    let half_degrees = hsv.hue.into_positive_degrees() / 2.0;
    let hue = (half_degrees + 0.5) as u16 % (HUE_MAX as u16 + 1);

    HsvBound {
        hue: hue as u8,
        saturation: unit_to_u8(hsv.saturation),
        value: unit_to_u8(hsv.value),
    }
}

/// Converts one interleaved 3-byte pixel in the given layout to 8-bit HSV.
#[inline]
pub fn pixel_to_hsv(pixel: [u8; 3], layout: PixelLayout) -> HsvBound {
    match layout {
        PixelLayout::Rgb => rgb_to_hsv(pixel[0], pixel[1], pixel[2]),
        PixelLayout::Bgr => rgb_to_hsv(pixel[2], pixel[1], pixel[0]),
    }
}

#[inline]
fn unit_to_u8(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
