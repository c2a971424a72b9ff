// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, frames, per-instance state, focus bookkeeping.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;
use trellis_canvas::Rgba;

use crate::class::BoxClass;
use crate::types::NodeId;

/// Focus chain returned by [`Tree::mouse_focus_chain`] and [`Tree::key_focus_chain`].
pub type FocusChain = SmallVec<[NodeId; 8]>;

/// Arena of boxes.
///
/// Boxes are addressed by generational [`NodeId`]s. Each box holds a frame
/// (origin in its parent's space plus a size), a reference to its shared
/// [`BoxClass`], optional per-instance state, and, for containers, an ordered
/// child list with the mouse-focus and key-focus indices.
///
/// Every structural or visual change bumps a modification counter, which a
/// render loop compares against the value it last drew.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Size};
/// use trellis_box_tree::{BoxClass, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, &BoxClass::CONTAINER);
/// let leaf = tree.insert(Some(root), &BoxClass::LEAF);
/// tree.set_frame(leaf, Point::new(10.0, 10.0), Size::new(20.0, 20.0));
///
/// assert_eq!(tree.children_of(root), &[leaf]);
/// assert_eq!(tree.parent_of(leaf), Some(root));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epoch: u64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Node {
    generation: u32,
    pub(crate) class: &'static BoxClass,
    pub(crate) parent: Option<NodeId>,
    pub(crate) origin: Point,
    pub(crate) size: Size,
    pub(crate) container: Option<ContainerState>,
    state: Option<Box<dyn Any + Send>>,
}

/// Children and focus indices owned by a container box.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerState {
    /// Painting order; later children are on top.
    pub(crate) children: Vec<NodeId>,
    pub(crate) mouse_focus: Option<usize>,
    pub(crate) key_focus: Option<usize>,
    pub(crate) background: Rgba,
}

impl Node {
    fn new(
        generation: u32,
        class: &'static BoxClass,
        parent: Option<NodeId>,
        state: Option<Box<dyn Any + Send>>,
    ) -> Self {
        Self {
            generation,
            class,
            parent,
            origin: Point::ZERO,
            size: Size::ZERO,
            container: class.is_container().then(ContainerState::default),
            state,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
        }
    }

    /// Insert a new box of `class` as the last (topmost) child of `parent`, or
    /// as a root if `None`.
    ///
    /// The class constructor, if any, builds the instance state. The new box
    /// starts with an empty frame at the origin.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale or not a container.
    pub fn insert(&mut self, parent: Option<NodeId>, class: &'static BoxClass) -> NodeId {
        let state = class.construct.map(|construct| construct());
        self.insert_node(parent, class, state)
    }

    /// Insert a new box with caller-supplied instance state, bypassing the
    /// class constructor.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale or not a container.
    pub fn insert_with_state<T: Any + Send>(
        &mut self,
        parent: Option<NodeId>,
        class: &'static BoxClass,
        state: T,
    ) -> NodeId {
        self.insert_node(parent, class, Some(Box::new(state)))
    }

    fn insert_node(
        &mut self,
        parent: Option<NodeId>,
        class: &'static BoxClass,
        state: Option<Box<dyn Any + Send>>,
    ) -> NodeId {
        if let Some(p) = parent {
            assert!(
                self.is_alive(p) && self.node(p).container.is_some(),
                "parent of a {} must be a live container",
                class.type_name
            );
        }
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, class, parent, state));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes
                .push(Some(Node::new(generation, class, parent, state)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            self.container_mut(p).children.push(id);
        }
        tracing::debug!(?id, ?parent, class = class.type_name, "insert");
        self.epoch += 1;
        id
    }

    /// Remove a box and its whole subtree.
    ///
    /// The box's destructor runs first, then its children are destroyed in
    /// order. If the box held its parent's mouse or key focus, the parent's
    /// index is cleared without delivering an exit notification; indices that
    /// pointed past the removed child are shifted down.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        tracing::debug!(?id, class = self.node(id).class.type_name, "remove");
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.destroy(id);
        self.epoch += 1;
    }

    fn destroy(&mut self, id: NodeId) {
        let class = self.node(id).class;
        if let Some(destruct) = class.destruct {
            destruct(self, id);
        }
        if !self.is_alive(id) {
            return;
        }
        let children = self
            .node_mut(id)
            .container
            .as_mut()
            .map(|c| core::mem::take(&mut c.children))
            .unwrap_or_default();
        for child in children {
            if self.is_alive(child) {
                self.destroy(child);
            }
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let c = self.container_mut(parent);
        if let Some(pos) = c.children.iter().position(|&child| child == id) {
            c.children.remove(pos);
            if c.mouse_focus == Some(pos) {
                tracing::debug!(?id, "removed box held mouse focus");
            }
            c.mouse_focus = index_after_removal(c.mouse_focus, pos);
            c.key_focus = index_after_removal(c.key_focus, pos);
        }
        self.node_mut(id).parent = None;
    }

    /// Set a box's origin (in its parent's space) and size.
    ///
    /// If either changed, the class's resize handler runs with the previous
    /// origin and size.
    pub fn set_frame(&mut self, id: NodeId, origin: Point, size: Size) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let (prev_origin, prev_size) = (node.origin, node.size);
        if prev_origin == origin && prev_size == size {
            return;
        }
        node.origin = origin;
        node.size = size;
        let class = node.class;
        tracing::debug!(?id, ?origin, ?size, "set frame");
        self.epoch += 1;
        if let Some(on_resize) = class.on_resize {
            on_resize(self, id, prev_origin, prev_size);
        }
    }

    /// Set a container's background colour, painted under its children.
    pub fn set_background(&mut self, id: NodeId, colour: Rgba) {
        if let Some(c) = self.node_opt_mut(id).and_then(|n| n.container.as_mut()) {
            c.background = colour;
            self.epoch += 1;
        }
    }

    /// Mark the tree as needing a redraw.
    pub fn request_redraw(&mut self) {
        self.epoch += 1;
    }

    /// Counter bumped by every change and by [`Tree::request_redraw`].
    pub fn modification_count(&self) -> u64 {
        self.epoch
    }

    /// Returns true if `id` refers to a live box.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// The class of a live box.
    pub fn class(&self, id: NodeId) -> Option<&'static BoxClass> {
        self.node_opt(id).map(|n| n.class)
    }

    /// Returns the parent of a box if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a box, or an empty slice for leaves and stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id)
            .and_then(|n| n.container.as_ref())
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every live box without a parent, in slot order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let node = slot.as_ref().filter(|n| n.parent.is_none())?;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                Some(NodeId::new(idx as u32, node.generation))
            })
            .collect()
    }

    /// The root of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node_opt(id).map(|_| id)?;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        Some(current)
    }

    /// Origin of a box in its parent's space.
    pub fn origin(&self, id: NodeId) -> Option<Point> {
        self.node_opt(id).map(|n| n.origin)
    }

    /// Size of a box.
    pub fn size(&self, id: NodeId) -> Option<Size> {
        self.node_opt(id).map(|n| n.size)
    }

    /// Frame of a box in its parent's space.
    pub fn frame(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| Rect::from_origin_size(n.origin, n.size))
    }

    /// A container's background colour.
    pub fn background(&self, id: NodeId) -> Option<Rgba> {
        self.node_opt(id)
            .and_then(|n| n.container.as_ref())
            .map(|c| c.background)
    }

    /// Borrow a box's instance state as `T`.
    pub fn state<T: Any>(&self, id: NodeId) -> Option<&T> {
        self.node_opt(id)?.state.as_deref()?.downcast_ref()
    }

    /// Mutably borrow a box's instance state as `T`.
    pub fn state_mut<T: Any>(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id)?.state.as_deref_mut()?.downcast_mut()
    }

    /// The box's title, as reported by its class.
    pub fn title(&self, id: NodeId) -> Option<&str> {
        let get_title = self.class(id)?.get_title?;
        get_title(self, id)
    }

    /// Index of the child under the pointer, if any.
    pub fn mouse_focus(&self, id: NodeId) -> Option<usize> {
        self.container(id)?.mouse_focus
    }

    /// The child under the pointer, if any.
    pub fn mouse_focused_child(&self, id: NodeId) -> Option<NodeId> {
        let c = self.container(id)?;
        c.mouse_focus.map(|i| c.children[i])
    }

    /// Index of the child on the keyboard focus path, if any.
    pub fn key_focus(&self, id: NodeId) -> Option<usize> {
        self.container(id)?.key_focus
    }

    /// The child on the keyboard focus path, if any.
    pub fn key_focused_child(&self, id: NodeId) -> Option<NodeId> {
        let c = self.container(id)?;
        c.key_focus.map(|i| c.children[i])
    }

    /// The chain of boxes under the pointer, starting at `from`.
    ///
    /// Empty for stale ids.
    pub fn mouse_focus_chain(&self, from: NodeId) -> FocusChain {
        self.chain(from, Self::mouse_focused_child)
    }

    /// The keyboard focus path, starting at `from`.
    pub fn key_focus_chain(&self, from: NodeId) -> FocusChain {
        self.chain(from, Self::key_focused_child)
    }

    fn chain(&self, from: NodeId, next: fn(&Self, NodeId) -> Option<NodeId>) -> FocusChain {
        let mut out = FocusChain::new();
        let mut current = self.is_alive(from).then_some(from);
        while let Some(id) = current {
            out.push(id);
            current = next(self, id);
        }
        out
    }

    /// Move keyboard focus to `target`, or clear it with `None`.
    ///
    /// There is a single keyboard focus across all roots: every existing key
    /// focus chain is cleared, then each ancestor of `target` records the index
    /// leading to it.
    pub fn set_key_focus(&mut self, target: Option<NodeId>) {
        tracing::debug!(?target, "set key focus");
        for root in self.roots() {
            let mut current = Some(root);
            while let Some(id) = current {
                let Some(c) = self.node_mut(id).container.as_mut() else {
                    break;
                };
                current = c.key_focus.take().map(|i| c.children[i]);
            }
        }
        self.epoch += 1;
        let Some(mut child) = target.filter(|&t| self.is_alive(t)) else {
            return;
        };
        while let Some(parent) = self.node(child).parent {
            let c = self.container_mut(parent);
            c.key_focus = c.children.iter().position(|&id| id == child);
            child = parent;
        }
    }

    /// The deepest box on the keyboard focus path below `root`.
    pub fn key_focus_target(&self, root: NodeId) -> Option<NodeId> {
        self.key_focus_chain(root).last().copied()
    }

    // --- internals ---

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn container(&self, id: NodeId) -> Option<&ContainerState> {
        self.node_opt(id)?.container.as_ref()
    }

    pub(crate) fn container_mut(&mut self, id: NodeId) -> &mut ContainerState {
        self.node_mut(id)
            .container
            .as_mut()
            .expect("box is not a container")
    }

    pub(crate) fn set_mouse_focus(&mut self, id: NodeId, index: Option<usize>) {
        if let Some(c) = self.node_opt_mut(id).and_then(|n| n.container.as_mut()) {
            c.mouse_focus = index;
        }
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        for root in self.roots() {
            if self.is_alive(root) {
                self.destroy(root);
            }
        }
    }
}

fn index_after_removal(index: Option<usize>, removed: usize) -> Option<usize> {
    match index {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert(None, &BoxClass::CONTAINER);
        let a = tree.insert(Some(root), &BoxClass::LEAF);

        assert!(tree.is_alive(root));
        assert!(tree.is_alive(a));

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(tree.children_of(root).is_empty());

        let b = tree.insert(Some(root), &BoxClass::LEAF);
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = Tree::new();
        let root = tree.insert(None, &BoxClass::CONTAINER);
        let a = tree.insert(Some(root), &BoxClass::LEAF);
        let b = tree.insert(Some(root), &BoxClass::LEAF);
        let c = tree.insert(Some(root), &BoxClass::LEAF);
        assert_eq!(tree.children_of(root), &[a, b, c]);
        assert_eq!(tree.roots(), vec![root]);
        assert_eq!(tree.root_of(c), Some(root));
    }

    #[test]
    #[should_panic(expected = "must be a live container")]
    fn inserting_under_a_leaf_panics() {
        let mut tree = Tree::new();
        let leaf = tree.insert(None, &BoxClass::LEAF);
        tree.insert(Some(leaf), &BoxClass::LEAF);
    }

    #[test]
    fn removal_repairs_focus_indices() {
        let mut tree = Tree::new();
        let root = tree.insert(None, &BoxClass::CONTAINER);
        let a = tree.insert(Some(root), &BoxClass::LEAF);
        let b = tree.insert(Some(root), &BoxClass::LEAF);
        let c = tree.insert(Some(root), &BoxClass::LEAF);

        tree.set_mouse_focus(root, Some(2));
        tree.set_key_focus(Some(b));
        tree.remove(a);
        assert_eq!(tree.mouse_focused_child(root), Some(c));
        assert_eq!(tree.key_focused_child(root), Some(b));

        tree.remove(c);
        assert_eq!(tree.mouse_focus(root), None);
        assert_eq!(tree.key_focus(root), Some(0));
    }

    static SEQUENCE: AtomicUsize = AtomicUsize::new(1);
    static PARENT_GONE_AT: AtomicUsize = AtomicUsize::new(0);
    static CHILD_GONE_AT: AtomicUsize = AtomicUsize::new(0);

    fn parent_destruct(tree: &mut Tree, id: NodeId) {
        assert!(tree.children_of(id).iter().all(|&c| tree.is_alive(c)));
        PARENT_GONE_AT.store(SEQUENCE.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
    }

    fn child_destruct(_: &mut Tree, _: NodeId) {
        CHILD_GONE_AT.store(SEQUENCE.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
    }

    static PARENT: BoxClass = BoxClass::CONTAINER.with_destruct(parent_destruct);
    static CHILD: BoxClass = BoxClass::LEAF.with_destruct(child_destruct);

    #[test]
    fn destructor_runs_before_children() {
        let mut tree = Tree::new();
        let root = tree.insert(None, &BoxClass::CONTAINER);
        let parent = tree.insert(Some(root), &PARENT);
        let child = tree.insert(Some(parent), &CHILD);

        tree.remove(parent);
        assert!(!tree.is_alive(parent));
        assert!(!tree.is_alive(child));
        assert!(tree.children_of(root).is_empty());

        let parent_at = PARENT_GONE_AT.load(Ordering::SeqCst);
        let child_at = CHILD_GONE_AT.load(Ordering::SeqCst);
        assert!(parent_at != 0 && parent_at < child_at);
    }

    #[test]
    fn dropping_the_tree_destroys_every_box() {
        static DROPPED: AtomicUsize = AtomicUsize::new(0);
        fn count(_: &mut Tree, _: NodeId) {
            DROPPED.fetch_add(1, Ordering::SeqCst);
        }
        static COUNTED_CONTAINER: BoxClass = BoxClass::CONTAINER.with_destruct(count);
        static COUNTED_LEAF: BoxClass = BoxClass::LEAF.with_destruct(count);

        let mut tree = Tree::new();
        let root = tree.insert(None, &COUNTED_CONTAINER);
        tree.insert(Some(root), &COUNTED_LEAF);
        tree.insert(Some(root), &COUNTED_LEAF);
        tree.insert(None, &COUNTED_LEAF);
        drop(tree);
        assert_eq!(DROPPED.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn set_frame_reports_previous_geometry() {
        fn on_resize(tree: &mut Tree, id: NodeId, prev_origin: Point, prev_size: Size) {
            if let Some(log) = tree.state_mut::<Vec<(Point, Size)>>(id) {
                log.push((prev_origin, prev_size));
            }
        }
        static RESIZABLE: BoxClass = BoxClass::LEAF.with_on_resize(on_resize);

        let mut tree = Tree::new();
        let id = tree.insert_with_state(None, &RESIZABLE, Vec::<(Point, Size)>::new());
        tree.set_frame(id, Point::new(1.0, 2.0), Size::new(3.0, 4.0));
        tree.set_frame(id, Point::new(1.0, 2.0), Size::new(3.0, 4.0));
        tree.set_frame(id, Point::new(5.0, 2.0), Size::new(3.0, 4.0));

        let log = tree.state::<Vec<(Point, Size)>>(id).unwrap();
        assert_eq!(
            log.as_slice(),
            &[
                (Point::ZERO, Size::ZERO),
                (Point::new(1.0, 2.0), Size::new(3.0, 4.0)),
            ]
        );
        assert_eq!(tree.frame(id), Some(Rect::new(5.0, 2.0, 8.0, 6.0)));
    }

    #[test]
    fn constructor_builds_state() {
        fn build() -> Box<dyn Any + Send> {
            Box::new(String::from("fresh"))
        }
        fn title(tree: &Tree, id: NodeId) -> Option<&str> {
            tree.state::<String>(id).map(String::as_str)
        }
        static TITLED: BoxClass = BoxClass::LEAF.with_construct(build).with_get_title(title);

        let mut tree = Tree::new();
        let id = tree.insert(None, &TITLED);
        assert_eq!(tree.title(id), Some("fresh"));
        assert!(tree.state::<u32>(id).is_none());
        tree.state_mut::<String>(id).unwrap().push('!');
        assert_eq!(tree.title(id), Some("fresh!"));
    }

    #[test]
    fn key_focus_is_global() {
        let mut tree = Tree::new();
        let first = tree.insert(None, &BoxClass::CONTAINER);
        let inner = tree.insert(Some(first), &BoxClass::CONTAINER);
        let leaf = tree.insert(Some(inner), &BoxClass::LEAF);
        let second = tree.insert(None, &BoxClass::CONTAINER);
        let other = tree.insert(Some(second), &BoxClass::LEAF);

        tree.set_key_focus(Some(leaf));
        assert_eq!(tree.key_focus_chain(first).as_slice(), &[first, inner, leaf]);
        assert_eq!(tree.key_focus_target(first), Some(leaf));

        tree.set_key_focus(Some(other));
        assert_eq!(tree.key_focus_chain(first).as_slice(), &[first]);
        assert_eq!(tree.key_focus(inner), None);
        assert_eq!(tree.key_focus_target(second), Some(other));

        tree.set_key_focus(None);
        assert_eq!(tree.key_focus(second), None);
    }

    #[test]
    fn modification_count_tracks_changes() {
        let mut tree = Tree::new();
        let start = tree.modification_count();
        let root = tree.insert(None, &BoxClass::CONTAINER);
        let after_insert = tree.modification_count();
        assert!(after_insert > start);

        tree.set_background(root, Rgba::WHITE);
        assert!(tree.modification_count() > after_insert);
        assert_eq!(tree.background(root), Some(Rgba::WHITE));

        let before = tree.modification_count();
        tree.request_redraw();
        assert_eq!(tree.modification_count(), before + 1);
    }

    #[test]
    fn stale_ids_read_as_absent() {
        let mut tree = Tree::new();
        let root = tree.insert(None, &BoxClass::CONTAINER);
        tree.remove(root);
        assert_eq!(tree.origin(root), None);
        assert_eq!(tree.class(root).map(|c| c.type_name), None);
        assert!(tree.children_of(root).is_empty());
        assert!(tree.mouse_focus_chain(root).is_empty());
        tree.set_frame(root, Point::ZERO, Size::new(1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "dangling NodeId")]
    fn internal_access_rejects_a_reused_slot() {
        let mut tree = Tree::new();
        let old = tree.insert(None, &BoxClass::LEAF);
        tree.remove(old);
        let new = tree.insert(None, &BoxClass::CONTAINER);
        assert_eq!(old.0, new.0, "slot should be reused");
        let _ = tree.node(old);
    }
}
