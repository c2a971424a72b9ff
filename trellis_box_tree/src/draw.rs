// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip/viewport draw traversal.

use kurbo::{Rect, Vec2};
use trellis_canvas::Canvas;

use crate::tree::Tree;
use crate::types::NodeId;

impl Tree {
    /// Draw box `id`: `clip` is the region to render in the box's local space,
    /// and `target` the canvas rectangle it maps onto.
    ///
    /// Does nothing for stale ids or classes without a draw routine.
    pub fn draw(&self, id: NodeId, clip: Rect, target: Rect, canvas: &mut Canvas) {
        if let Some(draw) = self.class(id).and_then(|c| c.draw) {
            draw(self, id, clip, target, canvas);
        }
    }
}

/// Stock container draw.
///
/// Floods `target` with the background colour when it is visible, then draws
/// each child bottom to top. Every child's clip is the parent clip intersected
/// with the child's frame, mapped onto the canvas with the same per-axis scale
/// as `clip` to `target`, then shifted into the child's space.
pub fn container_draw(tree: &Tree, container: NodeId, clip: Rect, target: Rect, canvas: &mut Canvas) {
    let Some(background) = tree.background(container) else {
        return;
    };
    if background.a != 0.0 {
        canvas.image.apply_rectangle(target, background);
    }

    let scale = if clip.size() == target.size() {
        Vec2::new(1.0, 1.0)
    } else {
        Vec2::new(
            target.width() / clip.width(),
            target.height() / clip.height(),
        )
    };

    for &child in tree.children_of(container) {
        let node = tree.node(child);
        let Some(draw) = node.class.draw else {
            continue;
        };
        let frame = Rect::from_origin_size(node.origin, node.size);
        let Some(child_clip) = clip_to_frame(clip, frame) else {
            continue;
        };
        let child_target = Rect::new(
            target.x0 + (child_clip.x0 - clip.x0) * scale.x,
            target.y0 + (child_clip.y0 - clip.y0) * scale.y,
            target.x1 + (child_clip.x1 - clip.x1) * scale.x,
            target.y1 + (child_clip.y1 - clip.y1) * scale.y,
        );
        draw(
            tree,
            child,
            child_clip - node.origin.to_vec2(),
            child_target,
            canvas,
        );
    }
}

/// Intersect `clip` with `frame`, or `None` if the overlap is empty on either axis.
fn clip_to_frame(clip: Rect, frame: Rect) -> Option<Rect> {
    let mut out = clip;
    if out.x0 < frame.x0 {
        out.x0 = frame.x0;
    }
    if out.x1 > frame.x1 {
        out.x1 = frame.x1;
    }
    if out.x1 <= out.x0 {
        return None;
    }
    if out.y0 < frame.y0 {
        out.y0 = frame.y0;
    }
    if out.y1 > frame.y1 {
        out.y1 = frame.y1;
    }
    if out.y1 <= out.y0 {
        return None;
    }
    Some(out)
}
