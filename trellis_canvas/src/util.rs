// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Clip `rect` against `[0, width] × [0, height]`.
///
/// Returns `None` when nothing is left. The comparisons are written so that a
/// NaN coordinate fails them and is treated as empty.
pub(crate) fn clip_to_surface(rect: Rect, width: usize, height: usize) -> Option<Rect> {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Surface dimensions are far below 2^52."
    )]
    let (w, h) = (width as f64, height as f64);
    let clipped = Rect::new(
        if rect.x0 < 0.0 { 0.0 } else { rect.x0 },
        if rect.y0 < 0.0 { 0.0 } else { rect.y0 },
        if rect.x1 >= w { w } else { rect.x1 },
        if rect.y1 >= h { h } else { rect.y1 },
    );
    if !(clipped.x0 < clipped.x1) || !(clipped.y0 < clipped.y1) {
        return None;
    }
    Some(clipped)
}

/// Whole pixels fully covered by a clipped rectangle, plus the fractional
/// coverage of the partly covered pixels on each side.
///
/// `min` is the first fully covered column/row, `max` is one past the last.
/// When a span lies strictly inside a single pixel, `max == min - 1`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Contracted {
    pub(crate) min_x: usize,
    pub(crate) min_y: usize,
    pub(crate) max_x: usize,
    pub(crate) max_y: usize,
    /// Coverage of column `min_x - 1`.
    pub(crate) left: f64,
    /// Coverage of column `max_x`.
    pub(crate) right: f64,
    /// Coverage of row `min_y - 1`.
    pub(crate) top: f64,
    /// Coverage of row `max_y`.
    pub(crate) bottom: f64,
}

impl Contracted {
    /// `clipped` must already lie inside the surface with positive extents.
    pub(crate) fn new(clipped: Rect) -> Self {
        let (min_x, max_x, left, right) = contract_span(clipped.x0, clipped.x1);
        let (min_y, max_y, top, bottom) = contract_span(clipped.y0, clipped.y1);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            left,
            right,
            top,
            bottom,
        }
    }

    /// Whether the horizontal span lies strictly inside one pixel column.
    pub(crate) fn single_column(&self) -> bool {
        self.max_x < self.min_x
    }

    /// Whether the vertical span lies strictly inside one pixel row.
    pub(crate) fn single_row(&self) -> bool {
        self.max_y < self.min_y
    }

    pub(crate) fn width(&self) -> usize {
        self.max_x.saturating_sub(self.min_x)
    }

    pub(crate) fn height(&self) -> usize {
        self.max_y.saturating_sub(self.min_y)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Inputs are clipped to [0, surface size], so truncation is a floor."
)]
fn contract_span(lo: f64, hi: f64) -> (usize, usize, f64, f64) {
    let lo_floor = lo as usize;
    let hi_floor = hi as usize;
    let lo_ceil = lo_floor + usize::from((lo_floor as f64) < lo);
    (
        lo_ceil,
        hi_floor,
        lo_ceil as f64 - lo,
        hi - hi_floor as f64,
    )
}

/// Narrow a coverage fraction to the precision of a colour channel.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Coverage lies in [0, 1], which f32 represents well enough for blending."
)]
pub(crate) fn coverage(c: f64) -> f32 {
    c as f32
}
