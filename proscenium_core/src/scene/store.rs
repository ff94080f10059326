// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property
//! management.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::backend::DrawContext;
use crate::dirty;
use crate::draw::DrawList;
use crate::error::Error;
use crate::event::{Event, EventKind};
use crate::geom::{Matrix, Point, float};

use super::dispatch::ListenerMap;
use super::id::{INVALID, NodeId};
use super::traverse::Children;

/// The scene graph and everything attached to it.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies a
/// slot in parallel arrays. Destroyed nodes are recycled via a free list, and
/// generation counters prevent stale handle access.
///
/// Slot 0 is the stage root: it always exists, has no parent, and cannot be
/// destroyed. Nodes are *attached* when reachable from the root; only
/// attached nodes participate in drawing and hit testing, but detached
/// subtrees keep their full structure and properties.
pub struct Stage {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) local_transform: Vec<Matrix>,
    pub(crate) visible: Vec<bool>,
    pub(crate) alpha: Vec<f64>,
    pub(crate) name: Vec<Option<String>>,
    pub(crate) draw: Vec<Option<DrawList>>,
    pub(crate) context: Vec<Option<Box<dyn DrawContext>>>,
    pub(crate) listeners: Vec<ListenerMap>,
    pub(crate) pointer_inside: Vec<bool>,
    pub(crate) attached: Vec<bool>,

    // -- Computed properties (written by evaluate) --
    pub(crate) world_transform: Vec<Matrix>,
    pub(crate) effective_alpha: Vec<f64>,
    pub(crate) effective_visible: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Scene path cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) scene_path_len: usize,
    pub(crate) traversal_dirty: bool,

    // -- Dispatcher queue (registration order) --
    pub(crate) queue: Vec<u32>,
    pub(crate) next_listener_id: u64,

    // -- Frame state --
    pub(crate) frame_interval_ms: Option<f64>,
    pub(crate) frame_count: u64,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("queue", &self.queue)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Creates a stage containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        let mut stage = Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            local_transform: Vec::new(),
            visible: Vec::new(),
            alpha: Vec::new(),
            name: Vec::new(),
            draw: Vec::new(),
            context: Vec::new(),
            listeners: Vec::new(),
            pointer_inside: Vec::new(),
            attached: Vec::new(),
            world_transform: Vec::new(),
            effective_alpha: Vec::new(),
            effective_visible: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            scene_path_len: 0,
            traversal_dirty: true,
            queue: Vec::new(),
            next_listener_id: 0,
            frame_interval_ms: None,
            frame_count: 0,
        };
        // Slot 0 is the stage root.
        let root = stage.alloc_slot();
        debug_assert_eq!(root, 0);
        stage.attached[0] = true;
        stage.dirty.mark(0, dirty::TOPOLOGY);
        stage
    }

    /// The stage root handle.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId {
            idx: 0,
            generation: self.generation[0],
        }
    }

    // -- Allocation API --

    /// Creates a new detached node and returns its handle.
    ///
    /// The node starts with an identity transform, full alpha, visible, no
    /// draw list, no listeners, and no parent.
    pub fn create_node(&mut self) -> NodeId {
        let idx = self.alloc_slot();
        self.traversal_dirty = true;
        self.dirty.mark(idx, dirty::TOPOLOGY);
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// Listener registrations and dispatcher-queue membership are cleared.
    ///
    /// # Panics
    ///
    /// Panics if the node is the stage root, still has a parent or children,
    /// or the handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(idx != 0, "cannot destroy the stage root");
        assert!(
            self.parent[idx as usize] == INVALID,
            "cannot destroy an attached node (remove it from its parent first)"
        );
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy a node with children"
        );

        self.listeners[idx as usize] = ListenerMap::default();
        self.queue.retain(|&q| q != idx);
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `node` as the *first* child of `parent` (the back of the
    /// z-stack; later siblings draw on top).
    ///
    /// If `node` is already a child of `parent`, this is a no-op. If it has a
    /// different parent, it is removed from there first (with the usual
    /// `Removed` delivery). Attaching a subtree to the stage root's tree
    /// dispatches `Added` to every newly attached node, deepest first.
    ///
    /// # Errors
    ///
    /// [`Error::WouldCycle`] when `node` is `parent` or one of its ancestors.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), Error> {
        self.add_child_at(parent, node, 0)
    }

    /// Adds `node` as a child of `parent` at the given index.
    ///
    /// Index 0 is the back of the z-stack; `child_count(parent)` appends on
    /// top. Otherwise behaves like [`add_child`](Self::add_child).
    ///
    /// # Errors
    ///
    /// [`Error::WouldCycle`] when `node` is `parent` or one of its ancestors;
    /// [`Error::IndexOutOfRange`] when `index > child_count(parent)`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child_at(
        &mut self,
        parent: NodeId,
        node: NodeId,
        index: usize,
    ) -> Result<(), Error> {
        self.validate(parent);
        self.validate(node);
        if self.contains(node, parent) {
            return Err(Error::WouldCycle);
        }
        if self.parent[node.idx as usize] == parent.idx {
            return Ok(());
        }
        // Range-check before touching the old parent: a failed insert must
        // leave the node exactly where it was. `node` is not already under
        // `parent` here, so detaching it cannot change this count.
        let count = self.child_count(parent);
        if index > count {
            return Err(Error::IndexOutOfRange { index, count });
        }
        let old_parent = self.parent[node.idx as usize];
        if old_parent != INVALID {
            self.detach_child(old_parent, node.idx);
        }
        self.attach_child(parent.idx, node.idx, index);
        Ok(())
    }

    /// Removes `node` from `parent`.
    ///
    /// When the subtree was attached, `Removed` is dispatched to every node
    /// in it, deepest first, *before* the links are severed.
    ///
    /// # Errors
    ///
    /// [`Error::NotAChild`] when `node` is not a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), Error> {
        self.validate(parent);
        self.validate(node);
        if self.parent[node.idx as usize] != parent.idx {
            return Err(Error::NotAChild);
        }
        self.detach_child(parent.idx, node.idx);
        Ok(())
    }

    /// Removes and returns the child of `parent` at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `index >= child_count(parent)`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId, Error> {
        self.validate(parent);
        let count = self.child_count(parent);
        let Some(child_idx) = self.nth_child(parent.idx, index) else {
            return Err(Error::IndexOutOfRange { index, count });
        };
        let child = NodeId {
            idx: child_idx,
            generation: self.generation[child_idx as usize],
        };
        self.detach_child(parent.idx, child_idx);
        Ok(child)
    }

    /// Moves `node` to `index` within its parent's child list.
    ///
    /// # Errors
    ///
    /// [`Error::NotAChild`] when `node` is not a child of `parent`;
    /// [`Error::IndexOutOfRange`] when `index >= child_count(parent)`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn set_child_index(
        &mut self,
        parent: NodeId,
        node: NodeId,
        index: usize,
    ) -> Result<(), Error> {
        self.validate(parent);
        self.validate(node);
        if self.parent[node.idx as usize] != parent.idx {
            return Err(Error::NotAChild);
        }
        let mut order = self.children_indices(parent.idx);
        let count = order.len();
        if index >= count {
            return Err(Error::IndexOutOfRange { index, count });
        }
        order.retain(|&c| c != node.idx);
        order.insert(index, node.idx);
        self.relink_children(parent.idx, &order);
        Ok(())
    }

    /// Swaps the children of `parent` at indices `a` and `b`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when either index is out of range.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn swap_children_at(&mut self, parent: NodeId, a: usize, b: usize) -> Result<(), Error> {
        self.validate(parent);
        let mut order = self.children_indices(parent.idx);
        let count = order.len();
        for index in [a, b] {
            if index >= count {
                return Err(Error::IndexOutOfRange { index, count });
            }
        }
        order.swap(a, b);
        self.relink_children(parent.idx, &order);
        Ok(())
    }

    /// Swaps the positions of two children of `parent`.
    ///
    /// # Errors
    ///
    /// [`Error::NotAChild`] when either node is not a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if any handle is stale.
    pub fn swap_children(&mut self, parent: NodeId, a: NodeId, b: NodeId) -> Result<(), Error> {
        self.validate(parent);
        self.validate(a);
        self.validate(b);
        if self.parent[a.idx as usize] != parent.idx || self.parent[b.idx as usize] != parent.idx {
            return Err(Error::NotAChild);
        }
        self.swap_indices(parent.idx, a.idx, b.idx);
        Ok(())
    }

    /// Swaps the z-positions of two sibling nodes.
    ///
    /// # Errors
    ///
    /// [`Error::NotSiblings`] when the nodes do not share a parent.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn swap_depths(&mut self, a: NodeId, b: NodeId) -> Result<(), Error> {
        self.validate(a);
        self.validate(b);
        let p = self.parent[a.idx as usize];
        if p == INVALID || self.parent[b.idx as usize] != p {
            return Err(Error::NotSiblings);
        }
        self.swap_indices(p, a.idx, b.idx);
        Ok(())
    }

    /// Returns the parent of a node, if any.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(NodeId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a node, back to front.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the number of direct children of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns whether `node` is `ancestor` or one of its descendants.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        let mut cur = node.idx;
        loop {
            if cur == ancestor.idx {
                return true;
            }
            cur = self.parent[cur as usize];
            if cur == INVALID {
                return false;
            }
        }
    }

    /// Returns the stage root when `id` is attached to it, `None` for nodes
    /// in detached subtrees.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.attached[id.idx as usize].then(|| self.root())
    }

    // -- Property getters --

    /// Returns the local transform of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> Matrix {
        self.validate(id);
        self.local_transform[id.idx as usize]
    }

    /// Returns the local visibility flag of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns the local alpha of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn alpha(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.alpha[id.idx as usize]
    }

    /// Returns the debug name of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.validate(id);
        self.name[id.idx as usize].as_deref()
    }

    /// Returns the computed stage-space transform of a node.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Matrix {
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    /// Returns the computed effective alpha of a node (product of ancestor
    /// alphas).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn effective_alpha(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.effective_alpha[id.idx as usize]
    }

    /// Returns whether the node is effectively visible (itself and every
    /// ancestor visible).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn effective_visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.effective_visible[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the local transform of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_transform(&mut self, id: NodeId, transform: Matrix) {
        self.validate(id);
        self.local_transform[id.idx as usize] = transform;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the local visibility flag of a node.
    ///
    /// Routed through the transform channel so one drain pass recomputes both
    /// world transforms and effective visibility.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.validate(id);
        self.visible[id.idx as usize] = visible;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the local alpha of a node, clamped to `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) {
        self.validate(id);
        self.alpha[id.idx as usize] = alpha.clamp(0.0, 1.0);
        self.dirty.mark_with(id.idx, dirty::ALPHA, &EagerPolicy);
    }

    /// Sets the debug name of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_name(&mut self, id: NodeId, name: Option<String>) {
        self.validate(id);
        self.name[id.idx as usize] = name;
    }

    // -- Transform component views --

    /// Returns the translation component of the local transform.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point {
        self.validate(id);
        let m = self.local_transform[id.idx as usize];
        Point::new(m.tx, m.ty)
    }

    /// Sets the translation component of the local transform, leaving
    /// rotation and scale intact.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.validate(id);
        let m = &mut self.local_transform[id.idx as usize];
        m.tx = position.x;
        m.ty = position.y;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Returns the rotation component of the local transform, in degrees.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn rotation(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.local_transform[id.idx as usize].rotation().to_degrees()
    }

    /// Sets the rotation component of the local transform in degrees,
    /// preserving translation and scale. Skew does not survive
    /// recomposition.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) {
        self.validate(id);
        let m = self.local_transform[id.idx as usize];
        let (sx, sy) = decompose_scale(m);
        self.local_transform[id.idx as usize] = Matrix::from_translation(m.tx, m.ty)
            * Matrix::from_rotation(degrees.to_radians())
            * Matrix::from_scale(sx, sy);
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Returns the scale components of the local transform.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn scale(&self, id: NodeId) -> (f64, f64) {
        self.validate(id);
        decompose_scale(self.local_transform[id.idx as usize])
    }

    /// Sets the scale components of the local transform, preserving
    /// translation and rotation. Skew does not survive recomposition.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_scale(&mut self, id: NodeId, sx: f64, sy: f64) {
        self.validate(id);
        let m = self.local_transform[id.idx as usize];
        self.local_transform[id.idx as usize] = Matrix::from_translation(m.tx, m.ty)
            * Matrix::from_rotation(m.rotation())
            * Matrix::from_scale(sx, sy);
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    // -- Draw list API --

    /// Returns the node's draw list, if it has one.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn draw_list(&self, id: NodeId) -> Option<&DrawList> {
        self.validate(id);
        self.draw[id.idx as usize].as_ref()
    }

    /// Returns the node's draw list, creating an empty one on first use.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn draw_list_mut(&mut self, id: NodeId) -> &mut DrawList {
        self.validate(id);
        self.draw[id.idx as usize].get_or_insert_with(DrawList::new)
    }

    /// Returns whether the node owns a backing draw context (i.e. is a
    /// layer).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_layer(&self, id: NodeId) -> bool {
        self.validate(id);
        self.context[id.idx as usize].is_some()
    }

    // -- Internal helpers --

    /// Allocates a slot with default properties and returns its index.
    fn alloc_slot(&mut self) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.local_transform[idx as usize] = Matrix::IDENTITY;
            self.visible[idx as usize] = true;
            self.alpha[idx as usize] = 1.0;
            self.name[idx as usize] = None;
            self.draw[idx as usize] = None;
            self.context[idx as usize] = None;
            self.listeners[idx as usize] = ListenerMap::default();
            self.pointer_inside[idx as usize] = false;
            self.attached[idx as usize] = false;
            self.world_transform[idx as usize] = Matrix::IDENTITY;
            self.effective_alpha[idx as usize] = 1.0;
            self.effective_visible[idx as usize] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.local_transform.push(Matrix::IDENTITY);
            self.visible.push(true);
            self.alpha.push(1.0);
            self.name.push(None);
            self.draw.push(None);
            self.context.push(None);
            self.listeners.push(ListenerMap::default());
            self.pointer_inside.push(false);
            self.attached.push(false);
            self.world_transform.push(Matrix::IDENTITY);
            self.effective_alpha.push(1.0);
            self.effective_visible.push(true);
            self.generation.push(0);
            idx
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Links `c` under `p` at `index` and performs all attach bookkeeping.
    ///
    /// `c` must be detached and `index` already range-checked.
    pub(crate) fn attach_child(&mut self, p: u32, c: u32, index: usize) {
        debug_assert!(self.parent[c as usize] == INVALID);
        let mut order = self.children_indices(p);
        order.insert(index, c);
        self.parent[c as usize] = p;
        self.relink_order(p, &order);

        // Dirty dependency edges: child depends on parent for the inherited
        // channels.
        let _ = self.dirty.add_dependency(c, p, dirty::TRANSFORM);
        let _ = self.dirty.add_dependency(c, p, dirty::ALPHA);

        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);

        if self.attached[p as usize] {
            let mut subtree = Vec::new();
            self.collect_postorder(c, &mut subtree);
            for &idx in &subtree {
                self.attached[idx as usize] = true;
            }
            self.dispatch_lifecycle(EventKind::Added, &subtree);
        }
    }

    /// Detaches `c` (a child of `p`) with `Removed` delivery and dirty
    /// bookkeeping.
    pub(crate) fn detach_child(&mut self, p: u32, c: u32) {
        if self.attached[c as usize] {
            // Removed is delivered while the node can still see its ancestry.
            let mut subtree = Vec::new();
            self.collect_postorder(c, &mut subtree);
            self.dispatch_lifecycle(EventKind::Removed, &subtree);
            for &idx in &subtree {
                self.attached[idx as usize] = false;
                self.pointer_inside[idx as usize] = false;
            }
        }

        let mut order = self.children_indices(p);
        order.retain(|&o| o != c);
        self.parent[c as usize] = INVALID;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;
        self.relink_order(p, &order);

        self.dirty.remove_dependency(c, p, dirty::TRANSFORM);
        self.dirty.remove_dependency(c, p, dirty::ALPHA);

        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Collects the child slot indices of `p`, back to front.
    pub(crate) fn children_indices(&self, p: u32) -> Vec<u32> {
        let mut order = Vec::new();
        let mut cur = self.first_child[p as usize];
        while cur != INVALID {
            order.push(cur);
            cur = self.next_sibling[cur as usize];
        }
        order
    }

    /// Rewrites `p`'s sibling links to match `order` and schedules the path
    /// rebuild.
    fn relink_children(&mut self, p: u32, order: &[u32]) {
        self.relink_order(p, order);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    fn relink_order(&mut self, p: u32, order: &[u32]) {
        self.first_child[p as usize] = order.first().copied().unwrap_or(INVALID);
        for (i, &c) in order.iter().enumerate() {
            self.prev_sibling[c as usize] = if i == 0 { INVALID } else { order[i - 1] };
            self.next_sibling[c as usize] =
                order.get(i + 1).copied().unwrap_or(INVALID);
        }
    }

    /// Swaps two children of `p` in its child list. Callers have already
    /// verified membership.
    fn swap_indices(&mut self, p: u32, a: u32, b: u32) {
        let mut order = self.children_indices(p);
        let ia = order.iter().position(|&c| c == a);
        let ib = order.iter().position(|&c| c == b);
        if let (Some(ia), Some(ib)) = (ia, ib) {
            order.swap(ia, ib);
            self.relink_children(p, &order);
        }
    }

    /// Returns the slot index of the `index`-th child of `p`.
    pub(crate) fn nth_child(&self, p: u32, index: usize) -> Option<u32> {
        let mut cur = self.first_child[p as usize];
        let mut remaining = index;
        while cur != INVALID {
            if remaining == 0 {
                return Some(cur);
            }
            remaining -= 1;
            cur = self.next_sibling[cur as usize];
        }
        None
    }

    /// Collects the subtree rooted at `idx` in post-order (deepest first).
    pub(crate) fn collect_postorder(&self, idx: u32, out: &mut Vec<u32>) {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.collect_postorder(child, out);
            child = self.next_sibling[child as usize];
        }
        out.push(idx);
    }

    /// Dispatches a non-bubbling lifecycle event to each slot in order.
    fn dispatch_lifecycle(&mut self, kind: EventKind, slots: &[u32]) {
        for &idx in slots {
            let node = NodeId {
                idx,
                generation: self.generation[idx as usize],
            };
            let mut event = Event::new(kind);
            // Fresh event, so dispatch cannot reject it.
            let _ = self.dispatch_event(node, &mut event);
        }
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::ALPHA, &EagerPolicy);
    }
}

/// Extracts `(sx, sy)` from an affine matrix, preserving the determinant's
/// sign in `sy` so mirrored transforms round-trip.
fn decompose_scale(m: Matrix) -> (f64, f64) {
    let sx = float::sqrt(m.a * m.a + m.b * m.b);
    let sy = if sx == 0.0 {
        float::sqrt(m.c * m.c + m.d * m.d)
    } else {
        m.determinant() / sx
    };
    (sx, sy)
}
