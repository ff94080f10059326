// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene evaluation.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **TRANSFORM** — Drain dirty indices, recompute each node's
//!    `world_transform` as `parent_world * local_transform` and
//!    `effective_visible` as `parent_effective_visible && visible`.
//! 2. **ALPHA** — Drain dirty indices, recompute each node's
//!    `effective_alpha` as `parent_effective * alpha`.
//! 3. **TOPOLOGY** — Drain and discard (the scene path was already rebuilt
//!    at the start of evaluation if needed).
//!
//! The *scene path* is the cached depth-first pre-order of the attached tree:
//! ancestors precede descendants and siblings appear in index order, so the
//! same flat list serves both ancestor-chain reconstruction and back-to-front
//! draw order. Detached subtrees are kept in the traversal tail after the
//! scene path so their computed properties stay warm as well.

use alloc::vec::Vec;

use crate::dirty;
use crate::geom::Matrix;
use crate::trace::{PathRebuildEvent, Tracer};

use super::id::INVALID;
use super::store::Stage;

impl Stage {
    /// Recomputes all dirty world transforms, effective alphas, and effective
    /// visibility, rebuilding the scene path first when topology changed.
    pub fn evaluate(&mut self) {
        self.evaluate_with(&mut Tracer::none());
    }

    /// Like [`evaluate`](Self::evaluate), with trace instrumentation.
    pub fn evaluate_with(&mut self, tracer: &mut Tracer<'_>) {
        if self.traversal_dirty {
            self.rebuild_scene_path();
            self.traversal_dirty = false;
            tracer.path_rebuild(&PathRebuildEvent {
                attached: self.scene_path_len,
                total: self.traversal_order.len(),
            });
        }

        // Drain TRANSFORM — world transforms and effective visibility.
        let dirty_transforms: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_transforms {
            let parent_idx = self.parent[idx as usize];
            let (parent_world, parent_visible) = if parent_idx != INVALID {
                (
                    self.world_transform[parent_idx as usize],
                    self.effective_visible[parent_idx as usize],
                )
            } else {
                (Matrix::IDENTITY, true)
            };
            self.world_transform[idx as usize] =
                parent_world * self.local_transform[idx as usize];
            self.effective_visible[idx as usize] =
                parent_visible && self.visible[idx as usize];
        }

        // Drain ALPHA — effective alpha.
        let dirty_alphas: Vec<u32> = self
            .dirty
            .drain(dirty::ALPHA)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_alphas {
            let parent_alpha = if self.parent[idx as usize] != INVALID {
                self.effective_alpha[self.parent[idx as usize] as usize]
            } else {
                1.0
            };
            self.effective_alpha[idx as usize] = parent_alpha * self.alpha[idx as usize];
        }

        // Drain TOPOLOGY (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
    }

    /// The cached scene path: slot indices of every attached node in
    /// depth-first pre-order, starting at the stage root.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn scene_path(&self) -> &[u32] {
        &self.traversal_order[..self.scene_path_len]
    }

    /// Rebuilds the traversal order: the attached tree first (the scene
    /// path), then every detached subtree.
    fn rebuild_scene_path(&mut self) {
        self.traversal_order.clear();
        self.dfs_collect(0);
        self.scene_path_len = self.traversal_order.len();
        for idx in 1..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::geom::Point;

    #[test]
    fn evaluate_computes_world_transforms() {
        let mut stage = Stage::new();
        let root = stage.root();
        let parent = stage.create_node();
        let child = stage.create_node();

        let parent_xf = Matrix::from_translation(10.0, 0.0);
        let child_xf = Matrix::from_translation(0.0, 5.0);
        stage.set_transform(parent, parent_xf);
        stage.set_transform(child, child_xf);
        stage.add_child(root, parent).unwrap();
        stage.add_child(parent, child).unwrap();

        stage.evaluate();

        assert_eq!(stage.world_transform(parent), parent_xf);
        assert_eq!(stage.world_transform(child), parent_xf * child_xf);
        let p = stage
            .world_transform(child)
            .transform_point(Point::ZERO);
        assert_eq!(p, Point::new(10.0, 5.0));
    }

    #[test]
    fn evaluate_computes_effective_alpha() {
        let mut stage = Stage::new();
        let root = stage.root();
        let parent = stage.create_node();
        let child = stage.create_node();

        stage.add_child(root, parent).unwrap();
        stage.add_child(parent, child).unwrap();
        stage.set_alpha(parent, 0.5);
        stage.set_alpha(child, 0.8);

        stage.evaluate();

        let eps = 1e-9;
        assert!((stage.effective_alpha(parent) - 0.5).abs() < eps);
        assert!((stage.effective_alpha(child) - 0.4).abs() < eps);
    }

    #[test]
    fn invisible_parent_hides_descendants() {
        let mut stage = Stage::new();
        let root = stage.root();
        let parent = stage.create_node();
        let child = stage.create_node();
        stage.add_child(root, parent).unwrap();
        stage.add_child(parent, child).unwrap();
        stage.evaluate();
        assert!(stage.effective_visible(child));

        stage.set_visible(parent, false);
        stage.evaluate();
        assert!(!stage.effective_visible(parent));
        assert!(!stage.effective_visible(child));

        stage.set_visible(parent, true);
        stage.evaluate();
        assert!(stage.effective_visible(child));
    }

    #[test]
    fn scene_path_is_preorder_with_prepend_semantics() {
        let mut stage = Stage::new();
        let root = stage.root();
        let a = stage.create_node();
        let b = stage.create_node();
        let b1 = stage.create_node();

        // add_child prepends, so `b` ends up before `a`.
        stage.add_child(root, a).unwrap();
        stage.add_child(root, b).unwrap();
        stage.add_child(b, b1).unwrap();

        stage.evaluate();
        assert_eq!(stage.scene_path(), &[0, b.idx, b1.idx, a.idx]);
    }

    #[test]
    fn detached_subtrees_are_not_on_the_scene_path() {
        let mut stage = Stage::new();
        let root = stage.root();
        let attached = stage.create_node();
        let loose = stage.create_node();
        let loose_child = stage.create_node();
        stage.add_child(root, attached).unwrap();
        stage.add_child(loose, loose_child).unwrap();

        stage.evaluate();
        assert_eq!(stage.scene_path(), &[0, attached.idx]);
        // Detached nodes still get evaluated properties.
        assert_eq!(stage.world_transform(loose_child), Matrix::IDENTITY);
    }

    #[test]
    fn reorder_updates_scene_path() {
        let mut stage = Stage::new();
        let root = stage.root();
        let a = stage.create_node();
        let b = stage.create_node();
        stage.add_child_at(root, a, 0).unwrap();
        stage.add_child_at(root, b, 1).unwrap();
        stage.evaluate();
        assert_eq!(stage.scene_path(), &[0, a.idx, b.idx]);

        stage.set_child_index(root, a, 1).unwrap();
        stage.evaluate();
        assert_eq!(stage.scene_path(), &[0, b.idx, a.idx]);
    }

    #[test]
    fn topology_change_recomputes_inherited_properties_for_subtree() {
        let mut stage = Stage::new();
        let parent = stage.create_node();
        let child = stage.create_node();
        let grandchild = stage.create_node();
        stage.add_child(child, grandchild).unwrap();
        stage.evaluate();

        stage.set_transform(parent, Matrix::from_translation(10.0, 0.0));
        stage.set_alpha(parent, 0.5);
        stage.evaluate();

        stage.add_child(parent, child).unwrap();
        stage.evaluate();

        assert_eq!(
            stage.world_transform(grandchild),
            Matrix::from_translation(10.0, 0.0)
        );
        let eps = 1e-9;
        assert!((stage.effective_alpha(grandchild) - 0.5).abs() < eps);

        let root_of_detached = stage.parent_of(parent);
        assert_eq!(root_of_detached, None);
        assert_eq!(
            stage.children(parent).collect::<Vec<_>>(),
            vec![child]
        );
    }
}
