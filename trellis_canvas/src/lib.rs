// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Canvas: an owned, linear-light pixel surface and its compositing primitives.
//!
//! Trellis Canvas is the raster half of the Trellis UI stack. Boxes in a
//! `trellis_box_tree` draw into a [`Canvas`], which wraps a single [`Image`].
//!
//! - Pixels are [`Rgba`] values with `f32` channels, stored row-major, in linear
//!   (non-gamma) colour space and non-premultiplied alpha.
//! - Geometry is expressed with [`kurbo::Rect`] in pixel units: pixel `(x, y)`
//!   covers `[x, x + 1) × [y, y + 1)`, with `y` growing downwards.
//! - Gamma encoding for presentation is left to whoever consumes the buffer.
//!
//! ## Compositing operations
//!
//! - [`apply_colour`]: "over" compositing of one colour onto another.
//! - [`Image::apply_rectangle`]: fill a rectangle with sub-pixel coverage. Pixels that
//!   are only partly covered receive the colour with its alpha scaled by the
//!   covered fraction, so the total alpha deposited equals the rectangle's area.
//! - [`Image::apply_image`]: scaled, optionally mirrored, bilinear blit of part of
//!   one image onto another.
//!
//! Degenerate geometry (NaN or infinite coordinates, empty or inverted extents)
//! never panics; it simply draws nothing.
//!
//! ```rust
//! use kurbo::Rect;
//! use trellis_canvas::{Canvas, Rgba};
//!
//! let mut canvas = Canvas::new(4, 4);
//! canvas
//!     .image
//!     .apply_rectangle(Rect::new(0.5, 0.5, 1.5, 1.5), Rgba::new(1.0, 0.0, 0.0, 1.0));
//!
//! // The four pixels around (1, 1) are each a quarter covered.
//! assert_eq!(canvas.image.pixel(0, 0).a, 0.25);
//! assert_eq!(canvas.image.pixel(1, 1).a, 0.25);
//! assert_eq!(canvas.image.pixel(2, 2).a, 0.0);
//! ```
//!
//! ## Known gaps in `apply_image`
//!
//! Partially covered pixels along the fractional edges of the destination
//! rectangle are not blended, and source images narrower or shorter than two
//! pixels are not sampled at all. Both are deliberate, documented limitations.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod blit;
mod canvas;
mod colour;
mod image;
mod util;

pub use canvas::Canvas;
pub use colour::{Rgba, apply_colour};
pub use image::Image;
