// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the box tree: node identifiers and input state snapshots.

use hashbrown::HashSet;
use kurbo::Point;

/// Identifier for a box in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Mouse button identifier: 1 is left, 2 is middle, 3 is right.
pub type Button = u8;

/// Platform key code, passed through untouched.
pub type KeyCode = u32;

bitflags::bitflags! {
    /// Set of mouse buttons currently held down.
    ///
    /// Button `n` occupies bit `n - 1`. Bits beyond the named ones are free for
    /// extra buttons or custom modifiers and are preserved.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u64 {
        /// Button 1.
        const LEFT   = 0b001;
        /// Button 2.
        const MIDDLE = 0b010;
        /// Button 3.
        const RIGHT  = 0b100;
    }
}

impl MouseButtons {
    /// The bit for a single button, or the empty set for button 0 and ids above 64.
    pub const fn for_button(button: Button) -> Self {
        if button == 0 || button > 64 {
            return Self::empty();
        }
        Self::from_bits_retain(1 << (button - 1))
    }

    /// The held buttons, lowest id first.
    pub fn held(self) -> impl Iterator<Item = Button> {
        (1..=64_u8).filter(move |&b| self.contains(Self::for_button(b)))
    }
}

/// Pointer state delivered with every mouse notification.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouseState {
    /// Pointer position in the receiving box's local coordinate space.
    pub position: Point,
    /// Buttons held down after the event was applied.
    pub buttons: MouseButtons,
}

impl MouseState {
    /// Create a state with the given position and held buttons.
    pub const fn new(position: Point, buttons: MouseButtons) -> Self {
        Self { position, buttons }
    }

    /// The same state expressed in the space of a child whose origin (in this
    /// state's space) is `origin`.
    #[must_use]
    pub fn relative_to(&self, origin: Point) -> Self {
        Self {
            position: self.position - origin.to_vec2(),
            buttons: self.buttons,
        }
    }
}

/// Snapshot of the whole keyboard, delivered with key notifications.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    held: HashSet<KeyCode>,
}

impl KeyState {
    /// An empty keyboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as held. Returns `false` if it already was.
    pub fn press(&mut self, key: KeyCode) -> bool {
        self.held.insert(key)
    }

    /// Record `key` as released. Returns `false` if it was not held.
    pub fn release(&mut self, key: KeyCode) -> bool {
        self.held.remove(&key)
    }

    /// Whether `key` is held.
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Whether no key is held.
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Iterate the held keys in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.held.iter().copied()
    }
}

impl FromIterator<KeyCode> for KeyState {
    fn from_iter<I: IntoIterator<Item = KeyCode>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}
