// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording box classes shared by the unit tests.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;
use core::sync::atomic::{AtomicU64, Ordering};

use kurbo::{Point, Rect, Vec2};
use trellis_canvas::{Canvas, Rgba};

use crate::draw::container_draw;
use crate::router::{
    container_on_mouse_enter, container_on_mouse_exit, container_on_mouse_move,
    container_on_mouse_up,
};
use crate::{BoxClass, Button, KeyCode, KeyState, MouseState, NodeId, Tree};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
    Enter(Point),
    Exit(Point),
    Move(Point),
    Down(Button, Point),
    Up(Button, Point),
    Scroll(f64, Point),
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

#[derive(Debug, Default)]
pub(crate) struct Log {
    events: Vec<(u64, Event)>,
    draws: RefCell<Vec<(Rect, Rect)>>,
}

/// Global ordering across every recorder, so tests can compare boxes.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn new_log() -> Box<dyn Any + Send> {
    Box::new(Log::default())
}

fn record(tree: &mut Tree, id: NodeId, event: Event) {
    let seq = SEQUENCE.fetch_add(1, Ordering::SeqCst);
    tree.state_mut::<Log>(id)
        .expect("recording box")
        .events
        .push((seq, event));
}

fn leaf_enter(tree: &mut Tree, id: NodeId, state: &MouseState) {
    record(tree, id, Event::Enter(state.position));
}

fn leaf_exit(tree: &mut Tree, id: NodeId, state: &MouseState) {
    record(tree, id, Event::Exit(state.position));
}

fn leaf_move(tree: &mut Tree, id: NodeId, _: Vec2, state: &MouseState) {
    record(tree, id, Event::Move(state.position));
}

fn leaf_down(tree: &mut Tree, id: NodeId, button: Button, state: &MouseState) {
    record(tree, id, Event::Down(button, state.position));
}

fn leaf_up(tree: &mut Tree, id: NodeId, button: Button, state: &MouseState) {
    record(tree, id, Event::Up(button, state.position));
}

fn leaf_scroll(tree: &mut Tree, id: NodeId, amount: f64, state: &MouseState) {
    record(tree, id, Event::Scroll(amount, state.position));
}

fn leaf_key_down(tree: &mut Tree, id: NodeId, key: KeyCode, _: &KeyState) {
    record(tree, id, Event::KeyDown(key));
}

fn leaf_key_up(tree: &mut Tree, id: NodeId, key: KeyCode, _: &KeyState) {
    record(tree, id, Event::KeyUp(key));
}

fn leaf_draw(tree: &Tree, id: NodeId, clip: Rect, target: Rect, canvas: &mut Canvas) {
    if let Some(log) = tree.state::<Log>(id) {
        log.draws.borrow_mut().push((clip, target));
    }
    canvas.image.apply_rectangle(target, Rgba::WHITE);
}

fn recording_enter(tree: &mut Tree, id: NodeId, state: &MouseState) {
    leaf_enter(tree, id, state);
    container_on_mouse_enter(tree, id, state);
}

fn recording_exit(tree: &mut Tree, id: NodeId, state: &MouseState) {
    container_on_mouse_exit(tree, id, state);
    leaf_exit(tree, id, state);
}

fn recording_move(tree: &mut Tree, id: NodeId, change: Vec2, state: &MouseState) {
    leaf_move(tree, id, change, state);
    container_on_mouse_move(tree, id, change, state);
}

fn recording_up(tree: &mut Tree, id: NodeId, button: Button, state: &MouseState) {
    leaf_up(tree, id, button, state);
    container_on_mouse_up(tree, id, button, state);
}

fn recording_draw(tree: &Tree, id: NodeId, clip: Rect, target: Rect, canvas: &mut Canvas) {
    if let Some(log) = tree.state::<Log>(id) {
        log.draws.borrow_mut().push((clip, target));
    }
    container_draw(tree, id, clip, target, canvas);
}

/// Leaf that logs every notification and paints its target white.
pub(crate) static RECORDER: BoxClass = BoxClass::LEAF
    .named("Recorder")
    .with_construct(new_log)
    .with_on_mouse_enter(leaf_enter)
    .with_on_mouse_exit(leaf_exit)
    .with_on_mouse_move(leaf_move)
    .with_on_mouse_down(leaf_down)
    .with_on_mouse_up(leaf_up)
    .with_on_mouse_scroll(leaf_scroll)
    .with_on_key_down(leaf_key_down)
    .with_on_key_up(leaf_key_up)
    .with_draw(leaf_draw);

/// Stock container that also logs enter, exit, move, up and draw.
///
/// Button-down and wheel stay stock so parents walk through it.
pub(crate) static RECORDING_CONTAINER: BoxClass = BoxClass::CONTAINER
    .named("RecordingContainer")
    .with_construct(new_log)
    .with_on_mouse_enter(recording_enter)
    .with_on_mouse_exit(recording_exit)
    .with_on_mouse_move(recording_move)
    .with_on_mouse_up(recording_up)
    .with_draw(recording_draw);

pub(crate) fn add(tree: &mut Tree, parent: Option<NodeId>, class: &'static BoxClass, frame: Rect) -> NodeId {
    let id = tree.insert(parent, class);
    tree.set_frame(id, frame.origin(), frame.size());
    id
}

/// Events recorded by `id`, oldest first.
pub(crate) fn events(tree: &Tree, id: NodeId) -> Vec<Event> {
    tree.state::<Log>(id)
        .map(|log| log.events.iter().map(|(_, e)| e.clone()).collect())
        .unwrap_or_default()
}

/// Global sequence number of the first event on `id` matching `pred`.
pub(crate) fn seq_of(tree: &Tree, id: NodeId, pred: impl Fn(&Event) -> bool) -> u64 {
    tree.state::<Log>(id)
        .and_then(|log| log.events.iter().find(|(_, e)| pred(e)).map(|(s, _)| *s))
        .expect("event was recorded")
}

/// Clip and target pairs passed to `id`'s draw routine.
pub(crate) fn draws(tree: &Tree, id: NodeId) -> Vec<(Rect, Rect)> {
    tree.state::<Log>(id)
        .map(|log| log.draws.borrow().clone())
        .unwrap_or_default()
}

pub(crate) fn at(x: f64, y: f64) -> MouseState {
    MouseState::new(Point::new(x, y), crate::MouseButtons::empty())
}
