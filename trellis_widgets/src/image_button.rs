// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push button drawn from images.

use alloc::boxed::Box;
use core::any::Any;

use kurbo::{Point, Rect, Size, Vec2};
use trellis_box_tree::{BoxClass, Button, MouseState, NodeId, Tree};
use trellis_canvas::{Canvas, Image};

/// Called when a button is released with the pointer over it.
pub type ActionFn = fn(&mut Tree, NodeId);

/// The images an [`ImageButton`] chooses between.
///
/// Any image may be left empty. Without a `hover` image, `down` stands in for
/// it and is also shown while pressed with the pointer dragged off. Without a
/// `disabled` image, disabling does not change the look.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ButtonImages {
    /// Idle.
    pub up: Image,
    /// Hovered.
    pub hover: Image,
    /// Pressed with the pointer over the button.
    pub down: Image,
    /// Disabled.
    pub disabled: Image,
}

impl ButtonImages {
    /// Component-wise maximum of the image sizes.
    pub fn size(&self) -> Size {
        let (mut width, mut height) = (0, 0);
        for image in [&self.up, &self.hover, &self.down, &self.disabled] {
            width = width.max(image.width());
            height = height.max(image.height());
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "Image dimensions are far below 2^52."
        )]
        Size::new(width as f64, height as f64)
    }
}

/// State of an image button box.
#[derive(Clone, Debug, Default)]
pub struct ImageButton {
    images: ButtonImages,
    action: Option<ActionFn>,
    mouse_inside: bool,
    mouse_down: bool,
    disabled: bool,
}

/// Box class for [`ImageButton`] state.
pub static IMAGE_BUTTON: BoxClass = BoxClass::LEAF
    .named("ImageButton")
    .with_construct(construct)
    .with_on_mouse_enter(on_mouse_enter)
    .with_on_mouse_exit(on_mouse_exit)
    .with_on_mouse_move(on_mouse_move)
    .with_on_mouse_down(on_mouse_down)
    .with_on_mouse_up(on_mouse_up)
    .with_draw(draw);

impl ImageButton {
    /// A button showing `images`, with no action.
    pub fn new(images: ButtonImages) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    /// Run `action` on release.
    #[must_use]
    pub fn with_action(mut self, action: ActionFn) -> Self {
        self.action = Some(action);
        self
    }

    /// Insert `button` under `parent` at `origin`, sized to fit its largest image.
    pub fn insert(tree: &mut Tree, parent: NodeId, origin: Point, button: Self) -> NodeId {
        let size = button.images.size();
        let id = tree.insert_with_state(Some(parent), &IMAGE_BUTTON, button);
        tree.set_frame(id, origin, size);
        id
    }

    /// Enable or disable the button at `id`. Disabled buttons ignore releases.
    pub fn set_disabled(tree: &mut Tree, id: NodeId, disabled: bool) {
        if let Some(button) = tree.state_mut::<Self>(id)
            && button.disabled != disabled
        {
            button.disabled = disabled;
            tree.request_redraw();
        }
    }

    /// Replace the action of the button at `id`.
    pub fn set_action(tree: &mut Tree, id: NodeId, action: Option<ActionFn>) {
        if let Some(button) = tree.state_mut::<Self>(id) {
            button.action = action;
        }
    }

    /// The images.
    pub fn images(&self) -> &ButtonImages {
        &self.images
    }

    /// Whether the pointer is over the button.
    ///
    /// Focus stays with a pressed button while the pointer is dragged away, so
    /// this follows the pointer position while a press is held.
    pub fn is_mouse_inside(&self) -> bool {
        self.mouse_inside
    }

    /// Whether a button press started on this button and has not been released.
    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Whether the button is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The image for the current state.
    pub fn current_image(&self) -> &Image {
        let images = &self.images;
        let has_hover = !images.hover.is_empty();
        if self.disabled && !images.disabled.is_empty() {
            &images.disabled
        } else if !self.mouse_inside && (!self.mouse_down || has_hover) {
            &images.up
        } else if self.mouse_inside != self.mouse_down && has_hover {
            &images.hover
        } else {
            &images.down
        }
    }
}

fn construct() -> Box<dyn Any + Send> {
    Box::new(ImageButton::default())
}

fn update(tree: &mut Tree, id: NodeId, f: impl FnOnce(&mut ImageButton)) {
    if let Some(button) = tree.state_mut::<ImageButton>(id) {
        f(button);
        tree.request_redraw();
    }
}

fn on_mouse_enter(tree: &mut Tree, id: NodeId, _: &MouseState) {
    update(tree, id, |b| b.mouse_inside = true);
}

fn on_mouse_exit(tree: &mut Tree, id: NodeId, _: &MouseState) {
    update(tree, id, |b| b.mouse_inside = false);
}

fn on_mouse_move(tree: &mut Tree, id: NodeId, _: Vec2, state: &MouseState) {
    let Some(size) = tree.size(id) else {
        return;
    };
    let over = Rect::from_origin_size(Point::ZERO, size).contains(state.position);
    if tree
        .state::<ImageButton>(id)
        .is_some_and(|b| b.mouse_inside != over)
    {
        update(tree, id, |b| b.mouse_inside = over);
    }
}

fn on_mouse_down(tree: &mut Tree, id: NodeId, _: Button, _: &MouseState) {
    update(tree, id, |b| b.mouse_down = true);
}

fn on_mouse_up(tree: &mut Tree, id: NodeId, _: Button, _: &MouseState) {
    let mut fire = None;
    update(tree, id, |b| {
        b.mouse_down = false;
        if b.mouse_inside && !b.disabled {
            fire = b.action;
        }
    });
    if let Some(action) = fire {
        tracing::debug!(?id, "image button activated");
        action(tree, id);
    }
}

fn draw(tree: &Tree, id: NodeId, clip: Rect, target: Rect, canvas: &mut Canvas) {
    if let Some(button) = tree.state::<ImageButton>(id) {
        canvas.image.apply_image(target, button.current_image(), clip);
    }
}
