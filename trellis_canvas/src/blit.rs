// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scaled, bilinear image blits.

use kurbo::Rect;

use crate::colour::{Rgba, apply_colour};
use crate::image::Image;
use crate::util::{Contracted, clip_to_surface, coverage};

impl Image {
    /// Composite the `src_rect` region of `src` onto the `dest` region of `self`.
    ///
    /// Both rectangles are in pixel units of their respective images and may be
    /// inverted; an axis along which `dest` runs backwards is flipped on both
    /// rectangles, which mirrors the source along that axis. `dest` is clipped to
    /// this image and `src_rect` is clipped to match by linear interpolation.
    ///
    /// Each destination pixel fully inside the clipped `dest` is sampled at its
    /// minimum corner, mapped into source space, by bilinear interpolation of the
    /// surrounding 2×2 source pixels. The stencil is clamped so it never reads past
    /// the far edges of `src`; sample positions before the start of `src` or past
    /// its end are skipped. The result is composited with [`apply_colour`].
    ///
    /// Limitations:
    /// - Destination pixels that `dest` only partly covers are left untouched.
    /// - A `src` narrower or shorter than two pixels draws nothing.
    ///
    /// Empty, inverted-to-nothing, or NaN rectangles draw nothing.
    pub fn apply_image(&mut self, dest: Rect, src: &Self, src_rect: Rect) {
        let (mut dest, mut src_rect) = (dest, src_rect);
        if dest.x1 < dest.x0 {
            core::mem::swap(&mut dest.x0, &mut dest.x1);
            core::mem::swap(&mut src_rect.x0, &mut src_rect.x1);
        }
        if dest.y1 < dest.y0 {
            core::mem::swap(&mut dest.y0, &mut dest.y1);
            core::mem::swap(&mut src_rect.y0, &mut src_rect.y1);
        }

        let Some(clipped) = clip_to_surface(dest, self.width(), self.height()) else {
            return;
        };
        if src.width() < 2 || src.height() < 2 {
            tracing::trace!(
                width = src.width(),
                height = src.height(),
                "apply_image: source smaller than 2x2 is not sampled"
            );
            return;
        }

        // Source units per destination unit; negative when mirrored.
        let scale_x = src_rect.width() / dest.width();
        let scale_y = src_rect.height() / dest.height();
        let src_start_x = (clipped.x0 - dest.x0) * scale_x + src_rect.x0;
        let src_start_y = (clipped.y0 - dest.y0) * scale_y + src_rect.y0;

        let c = Contracted::new(clipped);
        let dest_width = self.width();
        let (src_w, src_h) = (src.width(), src.height());
        let src_pixels = src.pixels();

        for y in 0..c.height() {
            let Some((src_yi, src_yt)) = sample_axis(
                scale_y * (to_f64(y) + c.top) + src_start_y,
                src_h,
            ) else {
                continue;
            };
            let row_start = (c.min_y + y) * dest_width + c.min_x;
            for x in 0..c.width() {
                let Some((src_xi, src_xt)) = sample_axis(
                    scale_x * (to_f64(x) + c.left) + src_start_x,
                    src_w,
                ) else {
                    continue;
                };

                let i00 = src_yi * src_w + src_xi;
                let i10 = i00 + 1;
                let i01 = i00 + src_w;
                let i11 = i01 + 1;
                let v0 = lerp(src_pixels[i00], src_pixels[i10], src_xt);
                let v1 = lerp(src_pixels[i01], src_pixels[i11], src_xt);
                let v = lerp(v0, v1, src_yt);

                apply_colour(&mut self.pixels_mut()[row_start + x], v);
            }
        }
    }
}

/// Split a source coordinate into the index of the first stencil pixel and the
/// interpolation weight towards the second.
///
/// Returns `None` for coordinates outside `[0, len)`, including NaN. Indices on
/// the last pixel are pulled back to `len - 2` with the weight capped at 1.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The coordinate is non-negative here, so truncation is a floor."
)]
fn sample_axis(coord: f64, len: usize) -> Option<(usize, f32)> {
    if !(coord >= 0.0) {
        return None;
    }
    let index = coord as usize;
    if index >= len {
        return None;
    }
    let index = index.min(len - 2);
    let t = coord - to_f64(index);
    Some((index, coverage(if t > 1.0 { 1.0 } else { t })))
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Pixel indices are far below 2^52."
)]
fn to_f64(i: usize) -> f64 {
    i as f64
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn gradient(width: usize, height: usize) -> Image {
        let pixels = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                Rgba::new(x as f32, y as f32, 0.0, 1.0)
            })
            .collect::<Vec<_>>();
        Image::from_pixels(width, height, pixels).unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-5 && d > -1e-5
    }

    #[test]
    fn identity_blit_copies_pixels() {
        let src = gradient(4, 4);
        let mut dest = Image::with_size(4, 4);
        let full = Rect::new(0.0, 0.0, 4.0, 4.0);
        dest.apply_image(full, &src, full);
        assert_eq!(dest, src);
    }

    #[test]
    fn offset_blit_lands_at_destination() {
        let src = gradient(3, 3);
        let mut dest = Image::with_size(8, 8);
        dest.apply_image(
            Rect::new(2.0, 4.0, 5.0, 7.0),
            &src,
            Rect::new(0.0, 0.0, 3.0, 3.0),
        );
        assert_eq!(dest.pixel(2, 4), src.pixel(0, 0));
        assert_eq!(dest.pixel(4, 6), src.pixel(2, 2));
        assert_eq!(dest.pixel(1, 4), Rgba::TRANSPARENT);
        assert_eq!(dest.pixel(5, 7), Rgba::TRANSPARENT);
    }

    #[test]
    fn upscale_interpolates_between_source_pixels() {
        let src = gradient(2, 2);
        let mut dest = Image::with_size(4, 4);
        dest.apply_image(
            Rect::new(0.0, 0.0, 4.0, 4.0),
            &src,
            Rect::new(0.0, 0.0, 2.0, 2.0),
        );
        // Column 1 samples source x = 0.5.
        assert!(close(dest.pixel(1, 0).r, 0.5), "{:?}", dest.pixel(1, 0));
        // Columns past the last source pixel hold its value rather than extrapolating.
        assert!(close(dest.pixel(3, 3).r, 1.0), "{:?}", dest.pixel(3, 3));
        assert!(close(dest.pixel(3, 3).g, 1.0), "{:?}", dest.pixel(3, 3));
    }

    #[test]
    fn mirrored_blit_flips_horizontally() {
        let src = gradient(4, 2);
        let mut dest = Image::with_size(4, 2);
        dest.apply_image(
            Rect::new(4.0, 0.0, 0.0, 2.0),
            &src,
            Rect::new(0.0, 0.0, 4.0, 2.0),
        );
        // After flipping, destination x = 0 samples source x = 4, which is past
        // the end and skipped; x = 1 samples source x = 3.
        assert_eq!(dest.pixel(0, 0), Rgba::TRANSPARENT);
        assert!(close(dest.pixel(1, 0).r, 3.0), "{:?}", dest.pixel(1, 0));
        assert!(close(dest.pixel(3, 0).r, 1.0), "{:?}", dest.pixel(3, 0));
    }

    #[test]
    fn fractional_destination_edges_are_left_untouched() {
        let mut src = Image::with_size(4, 4);
        src.fill(Rgba::WHITE);
        let mut dest = Image::with_size(6, 6);
        dest.apply_image(
            Rect::new(0.5, 0.5, 4.5, 4.5),
            &src,
            Rect::new(0.0, 0.0, 4.0, 4.0),
        );
        for i in 0..6 {
            assert_eq!(dest.pixel(i, 0), Rgba::TRANSPARENT, "top edge at {i}");
            assert_eq!(dest.pixel(0, i), Rgba::TRANSPARENT, "left edge at {i}");
            assert_eq!(dest.pixel(4, i), Rgba::TRANSPARENT, "right edge at {i}");
            assert_eq!(dest.pixel(i, 4), Rgba::TRANSPARENT, "bottom edge at {i}");
        }
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(dest.pixel(x, y), Rgba::WHITE, "interior at ({x}, {y})");
            }
        }
    }

    #[test]
    fn tiny_source_draws_nothing() {
        let mut src = Image::with_size(1, 4);
        src.fill(Rgba::WHITE);
        let mut dest = Image::with_size(4, 4);
        dest.apply_image(
            Rect::new(0.0, 0.0, 4.0, 4.0),
            &src,
            Rect::new(0.0, 0.0, 1.0, 4.0),
        );
        assert!(dest.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn degenerate_destinations_draw_nothing() {
        let src = gradient(4, 4);
        let src_rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        for dest_rect in [
            Rect::new(f64::NAN, 0.0, 4.0, 4.0),
            Rect::new(0.0, 0.0, f64::NAN, f64::NAN),
            Rect::new(2.0, 2.0, 2.0, 2.0),
            Rect::new(10.0, 10.0, 20.0, 20.0),
            Rect::new(-8.0, -8.0, -1.0, -1.0),
        ] {
            let mut dest = Image::with_size(4, 4);
            dest.apply_image(dest_rect, &src, src_rect);
            assert!(
                dest.pixels().iter().all(|p| *p == Rgba::TRANSPARENT),
                "{dest_rect:?} drew something"
            );
        }
    }
}
