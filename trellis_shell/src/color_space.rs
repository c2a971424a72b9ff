// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion between the canvas's linear colours and 8-bit sRGB.
//!
//! Alpha is not gamma encoded; it is scaled to `0..=255` as-is.

use trellis_canvas::{Image, Rgba};

/// Encode one linear channel value as 8-bit sRGB, clamping to `[0, 1]`.
pub fn linear_to_srgb8(value: f32) -> u8 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let encoded = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    unit_to_u8(encoded)
}

/// Decode one 8-bit sRGB channel value to linear.
pub fn srgb8_to_linear(value: u8) -> f32 {
    let v = f32::from(value) / 255.0;
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear pixel as `[r, g, b, a]` sRGB bytes.
pub fn encode_pixel(colour: Rgba) -> [u8; 4] {
    [
        linear_to_srgb8(colour.r),
        linear_to_srgb8(colour.g),
        linear_to_srgb8(colour.b),
        unit_to_u8(if colour.a.is_nan() { 0.0 } else { colour.a.clamp(0.0, 1.0) }),
    ]
}

/// Decode `[r, g, b, a]` sRGB bytes into a linear pixel.
pub fn decode_pixel([r, g, b, a]: [u8; 4]) -> Rgba {
    Rgba::new(
        srgb8_to_linear(r),
        srgb8_to_linear(g),
        srgb8_to_linear(b),
        f32::from(a) / 255.0,
    )
}

/// Build a linear image from tightly packed sRGB RGBA bytes.
///
/// Returns `None` if `bytes` is not `width * height * 4` long.
pub fn image_from_srgb8(width: usize, height: usize, bytes: &[u8]) -> Option<Image> {
    if bytes.len() != width.checked_mul(height)?.checked_mul(4)? {
        return None;
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| decode_pixel([px[0], px[1], px[2], px[3]]))
        .collect();
    Image::from_pixels(width, height, pixels)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is clamped to [0, 255] before the cast."
)]
fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midtones() {
        assert_eq!(linear_to_srgb8(0.0), 0);
        assert_eq!(linear_to_srgb8(1.0), 255);
        // Linear 0.5 is brighter than half in sRGB.
        assert_eq!(linear_to_srgb8(0.5), 188);
        assert_eq!(linear_to_srgb8(0.215_861), 128);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(linear_to_srgb8(-3.0), 0);
        assert_eq!(linear_to_srgb8(7.0), 255);
        assert_eq!(linear_to_srgb8(f32::NAN), 0);
    }

    #[test]
    fn every_byte_survives_a_round_trip() {
        for byte in 0..=255_u8 {
            assert_eq!(linear_to_srgb8(srgb8_to_linear(byte)), byte);
        }
    }

    #[test]
    fn alpha_is_linear() {
        assert_eq!(encode_pixel(Rgba::new(0.0, 0.0, 0.0, 0.5))[3], 128);
        assert_eq!(decode_pixel([0, 0, 0, 51]).a, 0.2);
    }

    #[test]
    fn image_from_bytes_checks_length() {
        let image = image_from_srgb8(2, 1, &[255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
        assert_eq!(encode_pixel(image.pixel(0, 0)), [255, 0, 0, 255]);
        assert_eq!(image.pixel(1, 0), Rgba::TRANSPARENT);
        assert!(image_from_srgb8(2, 2, &[0; 8]).is_none());
    }
}
