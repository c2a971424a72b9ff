// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pixel buffer and coverage-aware rectangle filling.

use alloc::{vec, vec::Vec};

use kurbo::Rect;

use crate::colour::{Rgba, apply_colour};
use crate::util::{Contracted, clip_to_surface, coverage};

/// An owned, resizable buffer of linear RGBA pixels in row-major order.
///
/// The buffer is exclusively owned by the image. Resizing to a different
/// pixel count reallocates it and discards its contents, so indices or slices
/// taken before a resize must not be reused afterwards.
#[derive(Clone, Default, PartialEq)]
pub struct Image {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl core::fmt::Debug for Image {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Image {
    /// Create an empty 0×0 image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully transparent image of the given size.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Rgba::TRANSPARENT; width * height],
            width,
            height,
        }
    }

    /// Wrap an existing row-major pixel buffer.
    ///
    /// Returns `None` if `pixels.len()` is not `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            pixels,
            width,
            height,
        })
    }

    /// Change the size of the image.
    ///
    /// If the pixel count is unchanged the existing buffer is kept as is and only
    /// reinterpreted with the new dimensions. Otherwise a new, fully transparent
    /// buffer replaces the old one.
    pub fn set_size(&mut self, width: usize, height: usize) {
        if width * height != self.pixels.len() {
            self.pixels = vec![Rgba::TRANSPARENT; width * height];
        }
        self.width = width;
        self.height = height;
    }

    /// Release the pixel buffer and reset the size to 0×0.
    pub fn clear(&mut self) {
        self.pixels = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// All pixels, row-major, mutably.
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// The pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Mutable access to the pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut Rgba {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        &mut self.pixels[y * self.width + x]
    }

    /// Overwrite every pixel with `colour`.
    pub fn fill(&mut self, colour: Rgba) {
        self.pixels.fill(colour);
    }

    /// Fill `rect` with `colour`, blending partly covered pixels by coverage.
    ///
    /// `rect` is in pixel units and is clipped to the image. Pixels entirely
    /// inside it are overwritten when `colour` is opaque and composited with
    /// [`apply_colour`] otherwise. Pixels on the fractional boundary receive
    /// `colour` with its alpha scaled by the covered fraction of the pixel;
    /// corners use the product of their two edge fractions. A rectangle lying
    /// strictly inside one pixel row and/or column deposits its exact area (or
    /// length times height) into the pixels it touches.
    ///
    /// Empty, inverted, or NaN rectangles draw nothing.
    pub fn apply_rectangle(&mut self, rect: Rect, colour: Rgba) {
        if !(colour.a > 0.0) {
            return;
        }
        let Some(clipped) = clip_to_surface(rect, self.width, self.height) else {
            return;
        };
        let c = Contracted::new(clipped);

        if c.single_row() {
            let vertical = clipped.height();
            let row = c.max_y;
            if c.single_column() {
                let area = clipped.width() * vertical;
                apply_colour(
                    self.pixel_mut(c.max_x, row),
                    colour.with_alpha_scaled(coverage(area)),
                );
                return;
            }
            self.apply_row(colour, vertical, c.left, c.right, row, c.min_x, c.width());
            return;
        }
        if c.single_column() {
            let horizontal = clipped.width();
            self.apply_column(
                colour,
                horizontal,
                c.top,
                c.bottom,
                c.max_x,
                c.min_y,
                c.height(),
            );
            return;
        }

        // Interior.
        for y in c.min_y..c.max_y {
            let row = &mut self.pixels[y * self.width + c.min_x..y * self.width + c.max_x];
            if colour.is_opaque() {
                row.fill(colour);
            } else {
                for pixel in row {
                    apply_colour(pixel, colour);
                }
            }
        }

        if c.top != 0.0 {
            self.apply_row(colour, c.top, c.left, c.right, c.min_y - 1, c.min_x, c.width());
        }
        if c.left != 0.0 {
            let edge = colour.with_alpha_scaled(coverage(c.left));
            for y in c.min_y..c.max_y {
                apply_colour(self.pixel_mut(c.min_x - 1, y), edge);
            }
        }
        if c.right != 0.0 {
            let edge = colour.with_alpha_scaled(coverage(c.right));
            for y in c.min_y..c.max_y {
                apply_colour(self.pixel_mut(c.max_x, y), edge);
            }
        }
        if c.bottom != 0.0 {
            self.apply_row(colour, c.bottom, c.left, c.right, c.max_y, c.min_x, c.width());
        }
    }

    /// Blend a horizontal run of `len` pixels starting at `(start_x, y)` with
    /// opacity `main`, plus the partly covered corner pixels on either side.
    fn apply_row(
        &mut self,
        colour: Rgba,
        main: f64,
        first: f64,
        last: f64,
        y: usize,
        start_x: usize,
        len: usize,
    ) {
        if first != 0.0 {
            apply_colour(
                self.pixel_mut(start_x - 1, y),
                colour.with_alpha_scaled(coverage(main * first)),
            );
        }
        let edge = colour.with_alpha_scaled(coverage(main));
        for x in start_x..start_x + len {
            apply_colour(self.pixel_mut(x, y), edge);
        }
        if last != 0.0 {
            apply_colour(
                self.pixel_mut(start_x + len, y),
                colour.with_alpha_scaled(coverage(main * last)),
            );
        }
    }

    /// Vertical counterpart of [`Self::apply_row`].
    fn apply_column(
        &mut self,
        colour: Rgba,
        main: f64,
        first: f64,
        last: f64,
        x: usize,
        start_y: usize,
        len: usize,
    ) {
        if first != 0.0 {
            apply_colour(
                self.pixel_mut(x, start_y - 1),
                colour.with_alpha_scaled(coverage(main * first)),
            );
        }
        let edge = colour.with_alpha_scaled(coverage(main));
        for y in start_y..start_y + len {
            apply_colour(self.pixel_mut(x, y), edge);
        }
        if last != 0.0 {
            apply_colour(
                self.pixel_mut(x, start_y + len),
                colour.with_alpha_scaled(coverage(main * last)),
            );
        }
    }
}
