// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Widgets: leaf widgets for `trellis_box_tree`.
//!
//! Widgets here are ordinary consumers of [`BoxClass`]: each one is a static
//! class plus a state type stored on the box. Nothing in the tree or the router
//! knows about them.
//!
//! - [`ImageButton`]: a push button drawn from up, hover, down and disabled
//!   images, with an action run on release.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_box_tree::{BoxClass, Tree};
//! use trellis_canvas::{Image, Rgba};
//! use trellis_widgets::{ButtonImages, ImageButton};
//!
//! let solid = |w, h, c| Image::from_pixels(w, h, vec![c; w * h]).unwrap();
//! let images = ButtonImages {
//!     up: solid(4, 2, Rgba::BLACK),
//!     hover: solid(2, 3, Rgba::WHITE),
//!     ..ButtonImages::default()
//! };
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, &BoxClass::CONTAINER);
//! let button = ImageButton::insert(&mut tree, root, Point::new(8.0, 8.0), ImageButton::new(images));
//! assert_eq!(tree.size(button), Some(Size::new(4.0, 3.0)));
//! ```
//!
//! [`BoxClass`]: trellis_box_tree::BoxClass
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod image_button;

pub use image_button::{ActionFn, ButtonImages, IMAGE_BUTTON, ImageButton};
