// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type dispatch tables.
//!
//! Every box points at a shared, immutable [`BoxClass`]. A class is a table of
//! optional behaviour slots plus a few capability flags. Unset slots mean "do
//! nothing" except where noted on the slot.

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use kurbo::{Point, Rect, Size, Vec2};
use trellis_canvas::Canvas;

use crate::draw::container_draw;
use crate::router::{
    container_is_inside, container_on_key_down, container_on_key_up, container_on_mouse_down,
    container_on_mouse_enter, container_on_mouse_exit, container_on_mouse_move,
    container_on_mouse_scroll, container_on_mouse_up,
};
use crate::tree::Tree;
use crate::types::{Button, KeyCode, KeyState, MouseState, NodeId};

/// Builds the per-instance state for a freshly inserted box.
pub type ConstructFn = fn() -> Box<dyn Any + Send>;
/// Releases resources before a box (and then its children) is freed.
pub type DestructFn = fn(&mut Tree, NodeId);
/// Shape test in the box's local coordinates.
pub type IsInsideFn = fn(&Tree, NodeId, Point) -> bool;
/// Pointer crossed into or out of the box.
pub type MouseCrossFn = fn(&mut Tree, NodeId, &MouseState);
/// Pointer moved by the given delta.
pub type MouseMoveFn = fn(&mut Tree, NodeId, Vec2, &MouseState);
/// Button pressed or released.
pub type MouseButtonFn = fn(&mut Tree, NodeId, Button, &MouseState);
/// Wheel turned by the given amount.
pub type MouseScrollFn = fn(&mut Tree, NodeId, f64, &MouseState);
/// Key pressed or released.
pub type KeyFn = fn(&mut Tree, NodeId, KeyCode, &KeyState);
/// The frame changed; receives the previous origin and size.
pub type ResizeFn = fn(&mut Tree, NodeId, Point, Size);
/// Render `clip` (local coordinates) into `target` (canvas pixels).
pub type DrawFn = fn(&Tree, NodeId, Rect, Rect, &mut Canvas);
/// Human readable title.
pub type TitleFn = fn(&Tree, NodeId) -> Option<&str>;

bitflags::bitflags! {
    /// Capability flags carried by a [`BoxClass`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClassFlags: u8 {
        /// Instances own an ordered child list and focus indices.
        const CONTAINER          = 1 << 0;
        /// A hit anywhere within the rectangle counts as inside the box.
        const CONSUMES_MOUSE     = 1 << 1;
        /// `on_mouse_down` was left as the stock container handler, so a
        /// parent may descend through this box iteratively instead of calling
        /// it. Only honoured while the slot still holds that handler.
        const STOCK_MOUSE_DOWN   = 1 << 2;
        /// As [`Self::STOCK_MOUSE_DOWN`], for `on_mouse_scroll`.
        const STOCK_MOUSE_SCROLL = 1 << 3;
    }
}

/// Behaviour shared by every box of one type.
#[derive(Clone, Copy)]
pub struct BoxClass {
    /// Type name, used in logs.
    pub type_name: &'static str,
    /// Capability flags.
    pub flags: ClassFlags,
    /// Instance state constructor, run on insert.
    pub construct: Option<ConstructFn>,
    /// Runs on removal, before the children are destroyed.
    pub destruct: Option<DestructFn>,
    /// Shape test. When unset, leaves use [`ClassFlags::CONSUMES_MOUSE`] alone
    /// and containers use [`container_is_inside`].
    pub is_inside: Option<IsInsideFn>,
    /// Pointer entered.
    pub on_mouse_enter: Option<MouseCrossFn>,
    /// Pointer left.
    pub on_mouse_exit: Option<MouseCrossFn>,
    /// Pointer moved.
    pub on_mouse_move: Option<MouseMoveFn>,
    /// Button pressed.
    pub on_mouse_down: Option<MouseButtonFn>,
    /// Button released.
    pub on_mouse_up: Option<MouseButtonFn>,
    /// Wheel turned.
    pub on_mouse_scroll: Option<MouseScrollFn>,
    /// Key pressed.
    pub on_key_down: Option<KeyFn>,
    /// Key released.
    pub on_key_up: Option<KeyFn>,
    /// Frame changed.
    pub on_resize: Option<ResizeFn>,
    /// Render. Boxes without one are skipped by container traversal.
    pub draw: Option<DrawFn>,
    /// Title.
    pub get_title: Option<TitleFn>,
}

impl BoxClass {
    /// A plain leaf: consumes the mouse and does nothing else.
    pub const LEAF: Self = Self {
        type_name: "Box",
        flags: ClassFlags::CONSUMES_MOUSE,
        construct: None,
        destruct: None,
        is_inside: None,
        on_mouse_enter: None,
        on_mouse_exit: None,
        on_mouse_move: None,
        on_mouse_down: None,
        on_mouse_up: None,
        on_mouse_scroll: None,
        on_key_down: None,
        on_key_up: None,
        on_resize: None,
        draw: None,
        get_title: None,
    };

    /// The default container: stock routing for every input slot and the stock
    /// clipped traversal for drawing.
    pub const CONTAINER: Self = Self {
        type_name: "Container",
        flags: ClassFlags::CONTAINER
            .union(ClassFlags::CONSUMES_MOUSE)
            .union(ClassFlags::STOCK_MOUSE_DOWN)
            .union(ClassFlags::STOCK_MOUSE_SCROLL),
        construct: None,
        destruct: None,
        is_inside: Some(container_is_inside),
        on_mouse_enter: Some(container_on_mouse_enter),
        on_mouse_exit: Some(container_on_mouse_exit),
        on_mouse_move: Some(container_on_mouse_move),
        on_mouse_down: Some(container_on_mouse_down),
        on_mouse_up: Some(container_on_mouse_up),
        on_mouse_scroll: Some(container_on_mouse_scroll),
        on_key_down: Some(container_on_key_down),
        on_key_up: Some(container_on_key_up),
        on_resize: None,
        draw: Some(container_draw),
        get_title: None,
    };

    /// Whether instances own children.
    pub const fn is_container(&self) -> bool {
        self.flags.contains(ClassFlags::CONTAINER)
    }

    /// Whether any point of the rectangle counts as inside.
    pub const fn consumes_mouse(&self) -> bool {
        self.flags.contains(ClassFlags::CONSUMES_MOUSE)
    }

    /// Whether `on_mouse_down` is the stock container handler.
    ///
    /// The tag alone is not trusted: a class built with struct update syntax
    /// can carry [`ClassFlags::STOCK_MOUSE_DOWN`] next to a custom slot.
    pub fn has_stock_mouse_down(&self) -> bool {
        self.flags.contains(ClassFlags::STOCK_MOUSE_DOWN)
            && self.on_mouse_down.is_some_and(|f| {
                core::ptr::fn_addr_eq(f, container_on_mouse_down as MouseButtonFn)
            })
    }

    /// Whether `on_mouse_scroll` is the stock container handler.
    pub fn has_stock_mouse_scroll(&self) -> bool {
        self.flags.contains(ClassFlags::STOCK_MOUSE_SCROLL)
            && self.on_mouse_scroll.is_some_and(|f| {
                core::ptr::fn_addr_eq(f, container_on_mouse_scroll as MouseScrollFn)
            })
    }

    /// Rename.
    #[must_use]
    pub const fn named(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    /// Set or clear [`ClassFlags::CONSUMES_MOUSE`].
    #[must_use]
    pub const fn consuming_mouse(mut self, consumes: bool) -> Self {
        self.flags = if consumes {
            self.flags.union(ClassFlags::CONSUMES_MOUSE)
        } else {
            self.flags.difference(ClassFlags::CONSUMES_MOUSE)
        };
        self
    }

    /// Set the state constructor.
    #[must_use]
    pub const fn with_construct(mut self, f: ConstructFn) -> Self {
        self.construct = Some(f);
        self
    }

    /// Set the destructor.
    #[must_use]
    pub const fn with_destruct(mut self, f: DestructFn) -> Self {
        self.destruct = Some(f);
        self
    }

    /// Set the shape test.
    #[must_use]
    pub const fn with_is_inside(mut self, f: IsInsideFn) -> Self {
        self.is_inside = Some(f);
        self
    }

    /// Set the enter handler.
    #[must_use]
    pub const fn with_on_mouse_enter(mut self, f: MouseCrossFn) -> Self {
        self.on_mouse_enter = Some(f);
        self
    }

    /// Set the exit handler.
    #[must_use]
    pub const fn with_on_mouse_exit(mut self, f: MouseCrossFn) -> Self {
        self.on_mouse_exit = Some(f);
        self
    }

    /// Set the move handler.
    #[must_use]
    pub const fn with_on_mouse_move(mut self, f: MouseMoveFn) -> Self {
        self.on_mouse_move = Some(f);
        self
    }

    /// Set the button-down handler. Clears [`ClassFlags::STOCK_MOUSE_DOWN`].
    #[must_use]
    pub const fn with_on_mouse_down(mut self, f: MouseButtonFn) -> Self {
        self.on_mouse_down = Some(f);
        self.flags = self.flags.difference(ClassFlags::STOCK_MOUSE_DOWN);
        self
    }

    /// Set the button-up handler.
    #[must_use]
    pub const fn with_on_mouse_up(mut self, f: MouseButtonFn) -> Self {
        self.on_mouse_up = Some(f);
        self
    }

    /// Set the wheel handler. Clears [`ClassFlags::STOCK_MOUSE_SCROLL`].
    #[must_use]
    pub const fn with_on_mouse_scroll(mut self, f: MouseScrollFn) -> Self {
        self.on_mouse_scroll = Some(f);
        self.flags = self.flags.difference(ClassFlags::STOCK_MOUSE_SCROLL);
        self
    }

    /// Set the key-down handler.
    #[must_use]
    pub const fn with_on_key_down(mut self, f: KeyFn) -> Self {
        self.on_key_down = Some(f);
        self
    }

    /// Set the key-up handler.
    #[must_use]
    pub const fn with_on_key_up(mut self, f: KeyFn) -> Self {
        self.on_key_up = Some(f);
        self
    }

    /// Set the resize handler.
    #[must_use]
    pub const fn with_on_resize(mut self, f: ResizeFn) -> Self {
        self.on_resize = Some(f);
        self
    }

    /// Set the draw routine.
    #[must_use]
    pub const fn with_draw(mut self, f: DrawFn) -> Self {
        self.draw = Some(f);
        self
    }

    /// Set the title getter.
    #[must_use]
    pub const fn with_get_title(mut self, f: TitleFn) -> Self {
        self.get_title = Some(f);
        self
    }
}

impl Default for BoxClass {
    fn default() -> Self {
        Self::LEAF
    }
}

impl BoxClass {
    fn slot_names(&self) -> impl Iterator<Item = &'static str> {
        [
            ("construct", self.construct.is_some()),
            ("destruct", self.destruct.is_some()),
            ("is_inside", self.is_inside.is_some()),
            ("on_mouse_enter", self.on_mouse_enter.is_some()),
            ("on_mouse_exit", self.on_mouse_exit.is_some()),
            ("on_mouse_move", self.on_mouse_move.is_some()),
            ("on_mouse_down", self.on_mouse_down.is_some()),
            ("on_mouse_up", self.on_mouse_up.is_some()),
            ("on_mouse_scroll", self.on_mouse_scroll.is_some()),
            ("on_key_down", self.on_key_down.is_some()),
            ("on_key_up", self.on_key_up.is_some()),
            ("on_resize", self.on_resize.is_some()),
            ("draw", self.draw.is_some()),
            ("get_title", self.get_title.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
    }
}

struct Slots<'a>(&'a BoxClass);

impl fmt::Debug for Slots<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.slot_names()).finish()
    }
}

impl fmt::Debug for BoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxClass")
            .field("type_name", &self.type_name)
            .field("flags", &self.flags)
            .field("slots", &Slots(self))
            .finish()
    }
}
