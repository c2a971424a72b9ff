// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and mouse-focus routing.
//!
//! Each container remembers which child currently holds the pointer. The stock
//! container handlers keep two rules in one place, [`update_focus`]:
//!
//! - Enter and exit notifications are strictly paired on every box.
//! - While any button is held, focus never moves, so a pressed box keeps
//!   receiving motion after the pointer leaves it.
//!
//! Positions are always in the receiving box's local space; descending into a
//! child subtracts the child's origin.

use kurbo::{Point, Vec2};

use crate::class::BoxClass;
use crate::tree::Tree;
use crate::types::{Button, KeyCode, KeyState, MouseButtons, MouseState, NodeId};

/// Index of the topmost child of `children` containing `point`.
///
/// A child is a candidate when `point` lies in `[origin, origin + size)`. The
/// candidate is confirmed by its class's shape test (in the child's local
/// space) or, without one, by its `CONSUMES_MOUSE` flag.
pub fn hit_test(tree: &Tree, children: &[NodeId], point: Point) -> Option<usize> {
    children.iter().enumerate().rev().find_map(|(i, &child)| {
        let frame = tree.frame(child)?;
        let local = point - frame.origin().to_vec2();
        let in_rect = local.x >= 0.0
            && local.x < frame.width()
            && local.y >= 0.0
            && local.y < frame.height();
        (in_rect && tree.is_inside(child, local)).then_some(i)
    })
}

/// Stock container shape test.
///
/// A mouse-consuming container owns its whole rectangle, gaps included.
/// Otherwise it is exactly the union of its children's inside areas.
pub fn container_is_inside(tree: &Tree, container: NodeId, point: Point) -> bool {
    let Some(class) = tree.class(container) else {
        return false;
    };
    class.consumes_mouse() || hit_test(tree, tree.children_of(container), point).is_some()
}

/// Recompute which child of `container` is under the pointer.
///
/// If the focused child changes, the old one receives an exit and then the
/// new one an enter. When the pointer has left `container` entirely the focus
/// is cleared; exiting `container` itself is the caller's job.
///
/// Stale containers are ignored. If the old child's exit handler removes
/// `container`, nothing further happens; if it reshapes the child list, a new
/// index that fell off the end is dropped.
pub fn update_focus(tree: &mut Tree, container: NodeId, state: &MouseState) {
    let (Some(class), Some(size)) = (tree.class(container), tree.size(container)) else {
        return;
    };
    let p = state.position;
    let in_rect = p.x >= 0.0 && p.x < size.width && p.y >= 0.0 && p.y < size.height;
    let inside = in_rect
        && match class.is_inside {
            Some(is_inside) => is_inside(tree, container, p),
            None => container_is_inside(tree, container, p),
        };
    let index = if inside {
        hit_test(tree, tree.children_of(container), p)
    } else {
        None
    };

    let previous = tree.mouse_focus(container);
    if index == previous {
        return;
    }
    if let Some(old) = tree.mouse_focused_child(container) {
        mouse_exit(tree, old, state);
        if !tree.is_alive(container) {
            return;
        }
    }
    let index = index.filter(|&i| i < tree.children_of(container).len());
    tree.set_mouse_focus(container, index);
    if let Some(new) = index.map(|i| tree.children_of(container)[i]) {
        mouse_enter(tree, new, state);
    }
}

/// Stock enter: focus and enter the child under the pointer, if any.
pub fn container_on_mouse_enter(tree: &mut Tree, container: NodeId, state: &MouseState) {
    debug_assert!(
        tree.mouse_focus(container).is_none(),
        "container entered while a child already holds mouse focus"
    );
    let index = hit_test(tree, tree.children_of(container), state.position);
    tree.set_mouse_focus(container, index);
    if let Some(child) = index.map(|i| tree.children_of(container)[i]) {
        mouse_enter(tree, child, state);
    }
}

/// Stock exit: exit the focused child, if any, and clear the focus.
pub fn container_on_mouse_exit(tree: &mut Tree, container: NodeId, state: &MouseState) {
    if let Some(child) = tree.mouse_focused_child(container) {
        mouse_exit(tree, child, state);
        if tree.is_alive(container) {
            tree.set_mouse_focus(container, None);
        }
    }
}

/// Stock move: forward to the focused child, then re-evaluate focus unless a
/// button is held.
pub fn container_on_mouse_move(
    tree: &mut Tree,
    container: NodeId,
    change: Vec2,
    state: &MouseState,
) {
    if let Some(child) = tree.mouse_focused_child(container)
        && let Some(on_mouse_move) = tree.class(child).and_then(|c| c.on_mouse_move)
        && let Some(origin) = tree.origin(child)
    {
        on_mouse_move(tree, child, change, &state.relative_to(origin));
    }
    if state.buttons.is_empty() && tree.is_alive(container) {
        update_focus(tree, container, state);
    }
}

/// Stock button press: deliver to the innermost focused box. Never moves focus.
///
/// Descendants that are themselves stock containers are walked through in a
/// loop rather than called.
pub fn container_on_mouse_down(
    tree: &mut Tree,
    container: NodeId,
    button: Button,
    state: &MouseState,
) {
    let Some((child, local)) = innermost_target(tree, container, state, |class| {
        class.has_stock_mouse_down()
    }) else {
        return;
    };
    if let Some(on_mouse_down) = tree.class(child).and_then(|c| c.on_mouse_down) {
        on_mouse_down(tree, child, button, &local);
    }
}

/// Stock button release: forward to the focused child, then re-evaluate focus
/// once the last button is up.
pub fn container_on_mouse_up(
    tree: &mut Tree,
    container: NodeId,
    button: Button,
    state: &MouseState,
) {
    if let Some(child) = tree.mouse_focused_child(container)
        && let Some(on_mouse_up) = tree.class(child).and_then(|c| c.on_mouse_up)
        && let Some(origin) = tree.origin(child)
    {
        on_mouse_up(tree, child, button, &state.relative_to(origin));
    }
    if state.buttons.is_empty() && tree.is_alive(container) {
        update_focus(tree, container, state);
    }
}

/// Stock wheel: deliver to the innermost focused box. Never moves focus.
pub fn container_on_mouse_scroll(
    tree: &mut Tree,
    container: NodeId,
    amount: f64,
    state: &MouseState,
) {
    let Some((child, local)) = innermost_target(tree, container, state, |class| {
        class.has_stock_mouse_scroll()
    }) else {
        return;
    };
    if let Some(on_mouse_scroll) = tree.class(child).and_then(|c| c.on_mouse_scroll) {
        on_mouse_scroll(tree, child, amount, &local);
    }
}

/// Stock key press: forward along the keyboard focus path.
pub fn container_on_key_down(tree: &mut Tree, container: NodeId, key: KeyCode, keys: &KeyState) {
    if let Some(child) = tree.key_focused_child(container)
        && let Some(on_key_down) = tree.class(child).and_then(|c| c.on_key_down)
    {
        on_key_down(tree, child, key, keys);
    }
}

/// Stock key release: forward along the keyboard focus path.
pub fn container_on_key_up(tree: &mut Tree, container: NodeId, key: KeyCode, keys: &KeyState) {
    if let Some(child) = tree.key_focused_child(container)
        && let Some(on_key_up) = tree.class(child).and_then(|c| c.on_key_up)
    {
        on_key_up(tree, child, key, keys);
    }
}

/// Follow the mouse focus chain from `container` through every child whose
/// class passes `is_stock`, returning the first one that does not, with
/// `state` translated into its space.
fn innermost_target(
    tree: &Tree,
    container: NodeId,
    state: &MouseState,
    is_stock: fn(&BoxClass) -> bool,
) -> Option<(NodeId, MouseState)> {
    let mut local = *state;
    let mut current = container;
    loop {
        let child = tree.mouse_focused_child(current)?;
        let class = tree.class(child)?;
        local = local.relative_to(tree.origin(child)?);
        if !(is_stock(class) && class.is_container()) {
            return Some((child, local));
        }
        current = child;
    }
}

fn mouse_enter(tree: &mut Tree, child: NodeId, state: &MouseState) {
    let (Some(class), Some(origin)) = (tree.class(child), tree.origin(child)) else {
        return;
    };
    let local = state.relative_to(origin);
    tracing::trace!(?child, position = ?local.position, "mouse enter");
    if let Some(on_mouse_enter) = class.on_mouse_enter {
        on_mouse_enter(tree, child, &local);
    }
}

fn mouse_exit(tree: &mut Tree, child: NodeId, state: &MouseState) {
    let (Some(class), Some(origin)) = (tree.class(child), tree.origin(child)) else {
        return;
    };
    let local = state.relative_to(origin);
    tracing::trace!(?child, position = ?local.position, "mouse exit");
    if let Some(on_mouse_exit) = class.on_mouse_exit {
        on_mouse_exit(tree, child, &local);
    }
}

impl Tree {
    /// Whether the local point `point` is inside box `id`, by its class's shape
    /// test or, without one, its `CONSUMES_MOUSE` flag.
    pub fn is_inside(&self, id: NodeId, point: Point) -> bool {
        let Some(class) = self.class(id) else {
            return false;
        };
        match class.is_inside {
            Some(is_inside) => is_inside(self, id, point),
            None => class.consumes_mouse(),
        }
    }
}

/// Pointer bookkeeping for a root box.
///
/// A root has no parent container to enter and exit it, so this plays that
/// role: it tracks whether the pointer is over the root, delivers enter and
/// exit to the root itself, and forwards button and wheel events only while
/// the pointer is inside. The root's own frame origin is ignored; states are
/// expected in root-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootPointer {
    root: NodeId,
    inside: bool,
    last: MouseState,
}

impl RootPointer {
    /// Track the pointer for `root`. The pointer starts outside.
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            inside: false,
            last: MouseState::default(),
        }
    }

    /// The root box.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the root currently holds the pointer.
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// The most recent state seen.
    pub fn last_state(&self) -> MouseState {
        self.last
    }

    /// Pointer moved by `change` to `state`.
    pub fn mouse_move(&mut self, tree: &mut Tree, change: Vec2, state: &MouseState) {
        self.last = *state;
        let Some(class) = tree.class(self.root) else {
            return;
        };
        if self.inside
            && let Some(on_mouse_move) = class.on_mouse_move
        {
            on_mouse_move(tree, self.root, change, state);
        }
        if state.buttons.is_empty() {
            self.update(tree, state);
        }
    }

    /// Button pressed. `state.buttons` already includes `button`.
    pub fn mouse_down(&mut self, tree: &mut Tree, button: Button, state: &MouseState) {
        self.last = *state;
        if !self.inside {
            return;
        }
        if let Some(on_mouse_down) = tree.class(self.root).and_then(|c| c.on_mouse_down) {
            on_mouse_down(tree, self.root, button, state);
        }
    }

    /// Button released. `state.buttons` already excludes `button`.
    pub fn mouse_up(&mut self, tree: &mut Tree, button: Button, state: &MouseState) {
        self.last = *state;
        if self.inside
            && let Some(on_mouse_up) = tree.class(self.root).and_then(|c| c.on_mouse_up)
        {
            on_mouse_up(tree, self.root, button, state);
        }
        if state.buttons.is_empty() {
            self.update(tree, state);
        }
    }

    /// Wheel turned.
    pub fn mouse_scroll(&mut self, tree: &mut Tree, amount: f64, state: &MouseState) {
        self.last = *state;
        if !self.inside {
            return;
        }
        if let Some(on_mouse_scroll) = tree.class(self.root).and_then(|c| c.on_mouse_scroll) {
            on_mouse_scroll(tree, self.root, amount, state);
        }
    }

    /// The pointer left the window, or the window was hidden or minimised.
    ///
    /// With no button held the root gets its exit straight away. A held press
    /// keeps the root, like any drag, until the release arrives.
    pub fn leave(&mut self, tree: &mut Tree) {
        if !self.inside || !self.last.buttons.is_empty() {
            return;
        }
        self.inside = false;
        tracing::debug!(root = ?self.root, "pointer left the root");
        if let Some(on_mouse_exit) = tree.class(self.root).and_then(|c| c.on_mouse_exit) {
            let state = self.last;
            on_mouse_exit(tree, self.root, &state);
        }
    }

    /// Let go of the pointer before teardown.
    ///
    /// Every held button gets a synthetic release, lowest id first, and then
    /// the root gets an exit, so paired enter/exit listeners end balanced.
    pub fn release(&mut self, tree: &mut Tree) {
        let mut state = self.last;
        let held = state.buttons;
        self.last.buttons = MouseButtons::empty();
        if !self.inside {
            return;
        }
        let Some(class) = tree.class(self.root) else {
            self.inside = false;
            return;
        };
        for button in held.held() {
            state.buttons.remove(MouseButtons::for_button(button));
            tracing::debug!(button, "synthetic mouse up on release");
            if let Some(on_mouse_up) = class.on_mouse_up {
                on_mouse_up(tree, self.root, button, &state);
            }
        }
        self.inside = false;
        if let Some(on_mouse_exit) = class.on_mouse_exit {
            on_mouse_exit(tree, self.root, &state);
        }
    }

    fn update(&mut self, tree: &mut Tree, state: &MouseState) {
        let Some(size) = tree.size(self.root) else {
            return;
        };
        let p = state.position;
        let inside = p.x >= 0.0
            && p.x < size.width
            && p.y >= 0.0
            && p.y < size.height
            && tree.is_inside(self.root, p);
        if inside == self.inside {
            return;
        }
        self.inside = inside;
        let Some(class) = tree.class(self.root) else {
            return;
        };
        let handler = if inside {
            class.on_mouse_enter
        } else {
            class.on_mouse_exit
        };
        if let Some(handler) = handler {
            handler(tree, self.root, state);
        }
    }
}
