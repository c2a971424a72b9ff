// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Shell: the window context around a `trellis_box_tree` root.
//!
//! A [`Window`] owns one root container and everything that drives it:
//!
//! - Event intake: [`InputEvent`]s in root-local coordinates are routed into
//!   the root through a [`RootPointer`](trellis_box_tree::RootPointer), with
//!   the held keys tracked by the window.
//! - Redraw signalling: a [`RedrawSignal`] counter that the window raises
//!   whenever the tree's modification counter moves.
//! - Rendering: a [`RenderThread`] that draws the root with [`render_frame`]
//!   and hands each frame to a [`RenderSink`]. [`Srgb8Sink`] encodes frames
//!   as 8-bit sRGB using [`color_space`].
//! - Teardown: [`Window::exit`] notifies [`ExitListener`]s, releases held
//!   buttons and the pointer, stops rendering, and destroys the tree.
//!
//! Windows are configured with a [`WindowConfig`], which can be read from RON.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kurbo::Rect;
//! use parking_lot::Mutex;
//! use trellis_shell::{InputEvent, Srgb8Sink, Window, WindowConfig};
//!
//! let config = WindowConfig::from_ron("(horizontal_resolution: 320)").unwrap();
//! let mut window = Window::new(&config, &[Rect::new(0.0, 0.0, 1280.0, 720.0)]).unwrap();
//!
//! let sink = Arc::new(Mutex::new(Srgb8Sink::new()));
//! window.start_rendering(Arc::clone(&sink)).unwrap();
//! window.handle_event(InputEvent::Exposed).unwrap();
//! while window.signal().is_pending() {
//!     std::thread::yield_now();
//! }
//! window.exit().unwrap();
//!
//! let sink = sink.lock();
//! assert!(sink.frames() >= 1);
//! assert_eq!((sink.width(), sink.height()), (320, 180));
//! ```

pub mod color_space;
mod config;
mod error;
mod render;
mod signal;
mod window;

pub use config::WindowConfig;
pub use error::{Result, ShellError};
pub use render::{RenderSink, RenderThread, Srgb8Sink, render_frame};
pub use signal::RedrawSignal;
pub use window::{ExitListener, InputEvent, WINDOW, Window, WindowState};
