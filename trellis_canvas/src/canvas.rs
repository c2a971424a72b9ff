// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

use crate::image::Image;

/// The render target handed to box draw callbacks.
///
/// A canvas wraps exactly one [`Image`]; draw callbacks composite into
/// `canvas.image` using the rectangles they are given.
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    /// The pixels being drawn into.
    pub image: Image,
}

impl Canvas {
    /// Create a canvas with a fully transparent image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: Image::with_size(width, height),
        }
    }

    /// The full extent of the canvas in pixel units.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Surface dimensions are far below 2^52."
    )]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.image.width() as f64,
            self.image.height() as f64,
        )
    }
}
