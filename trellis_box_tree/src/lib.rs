// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Box Tree: a retained tree of rectangular boxes with per-type dispatch,
//! mouse-focus routing, and a clip/viewport draw traversal.
//!
//! - [`Tree`] is an arena of boxes addressed by generational [`NodeId`]s. A box
//!   has a frame (origin in its parent's space plus a size), optional instance
//!   state, and a shared [`BoxClass`] describing its behaviour.
//! - [`BoxClass`] is a table of optional function slots. An unset slot is a
//!   no-op. [`BoxClass::CONTAINER`] carries the stock routing and drawing
//!   behaviour; widgets start from [`BoxClass::LEAF`] or the container and
//!   override what they need.
//! - The router ([`hit_test`], [`update_focus`] and the `container_on_*`
//!   handlers) keeps a single chain of mouse-focused boxes from each root,
//!   delivers strictly paired enter/exit notifications, and pins focus while
//!   a button is held.
//! - [`RootPointer`] does for a root what its parent container would do for any
//!   other box.
//! - [`Tree::draw`] and [`container_draw`] walk a subtree, intersecting the clip
//!   with each child's frame and mapping it onto a target rectangle of a
//!   [`trellis_canvas::Canvas`].
//!
//! The tree is not synchronized. Callers own it from one thread at a time and
//! use [`Tree::modification_count`] to decide when to redraw.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size, Vec2};
//! use trellis_box_tree::{BoxClass, MouseButtons, MouseState, RootPointer, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, &BoxClass::CONTAINER);
//! tree.set_frame(root, Point::ZERO, Size::new(100.0, 100.0));
//! let child = tree.insert(Some(root), &BoxClass::LEAF);
//! tree.set_frame(child, Point::new(10.0, 10.0), Size::new(20.0, 20.0));
//!
//! let mut pointer = RootPointer::new(root);
//! let state = MouseState::new(Point::new(15.0, 15.0), MouseButtons::empty());
//! pointer.mouse_move(&mut tree, Vec2::ZERO, &state);
//!
//! assert!(pointer.is_inside());
//! assert_eq!(tree.mouse_focus_chain(root).as_slice(), &[root, child]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod class;
mod draw;
mod router;
mod tree;
mod types;

#[cfg(test)]
mod testing;

pub use class::{
    BoxClass, ClassFlags, ConstructFn, DestructFn, DrawFn, IsInsideFn, KeyFn, MouseButtonFn,
    MouseCrossFn, MouseMoveFn, MouseScrollFn, ResizeFn, TitleFn,
};
pub use draw::container_draw;
pub use router::{
    RootPointer, container_is_inside, container_on_key_down, container_on_key_up,
    container_on_mouse_down, container_on_mouse_enter, container_on_mouse_exit,
    container_on_mouse_move, container_on_mouse_scroll, container_on_mouse_up, hit_test,
    update_focus,
};
pub use tree::{FocusChain, Tree};
pub use types::{Button, KeyCode, KeyState, MouseButtons, MouseState, NodeId};
