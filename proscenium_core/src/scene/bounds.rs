// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate-space conversion and subtree bounds.

use crate::geom::{Matrix, Point, Rectangle};

use super::id::{INVALID, NodeId};
use super::store::Stage;

impl Stage {
    /// Transforms a point from `id`'s local space to stage space by applying
    /// every transform on the chain up to the root.
    ///
    /// Detached nodes transform relative to the root of their own subtree.
    /// Works directly off the local transforms, so no
    /// [`evaluate`](Self::evaluate) call is required first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn local_to_global(&self, id: NodeId, point: Point) -> Point {
        self.validate(id);
        let mut p = point;
        let mut cur = id.idx;
        while cur != INVALID {
            p = self.local_transform[cur as usize].transform_point(p);
            cur = self.parent[cur as usize];
        }
        p
    }

    /// Transforms a point from stage space into `id`'s local space.
    ///
    /// This subtracts the node's global origin rather than inverting the
    /// chain, so it is exact for translation-only ancestries and an
    /// approximation when rotation, scale, or skew is involved.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn global_to_local(&self, id: NodeId, point: Point) -> Point {
        let origin = self.local_to_global(id, Point::ZERO);
        point - origin
    }

    /// Returns the bounding rectangle of `id`'s subtree, expressed in
    /// `target`'s frame.
    ///
    /// The result is the union of every subtree draw-list extent carried
    /// through its chain of transforms into stage space, then shifted into
    /// `target`'s frame via [`global_to_local`](Self::global_to_local).
    /// [`Rectangle::ZERO`] when nothing in the subtree has drawn geometry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn get_bounds(&self, id: NodeId, target: NodeId) -> Rectangle {
        self.validate(id);
        self.validate(target);

        // The transform of `id`'s parent chain, excluding `id` itself.
        let mut base = Matrix::IDENTITY;
        let mut cur = self.parent[id.idx as usize];
        while cur != INVALID {
            base = self.local_transform[cur as usize] * base;
            cur = self.parent[cur as usize];
        }

        let mut extrema: Option<(Point, Point)> = None;
        self.accumulate_bounds(id.idx, base, &mut extrema);

        let Some((min, max)) = extrema else {
            return Rectangle::ZERO;
        };
        let origin = self.local_to_global(target, Point::ZERO);
        Rectangle::new(
            min.x - origin.x,
            min.y - origin.y,
            max.x - min.x,
            max.y - min.y,
        )
    }

    /// Folds the stage-space corners of every draw extent under `idx` into
    /// `extrema`. `acc` is the transform of `idx`'s parent chain.
    fn accumulate_bounds(&self, idx: u32, acc: Matrix, extrema: &mut Option<(Point, Point)>) {
        let world = acc * self.local_transform[idx as usize];
        if let Some(list) = &self.draw[idx as usize]
            && list.has_geometry()
        {
            let r = list.extent();
            for corner in [
                Point::new(r.x, r.y),
                Point::new(r.right(), r.y),
                Point::new(r.x, r.bottom()),
                Point::new(r.right(), r.bottom()),
            ] {
                let p = world.transform_point(corner);
                *extrema = Some(match *extrema {
                    Some((min, max)) => (
                        Point::new(min.x.min(p.x), min.y.min(p.y)),
                        Point::new(max.x.max(p.x), max.y.max(p.y)),
                    ),
                    None => (p, p),
                });
            }
        }
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.accumulate_bounds(child, world, extrema);
            child = self.next_sibling[child as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawOp;

    fn rect_node(stage: &mut Stage, r: Rectangle) -> NodeId {
        let id = stage.create_node();
        stage.draw_list_mut(id).push(DrawOp::Rect(r));
        id
    }

    #[test]
    fn local_to_global_composes_translations() {
        let mut stage = Stage::new();
        let root = stage.root();
        let a = stage.create_node();
        let b = stage.create_node();
        stage.add_child(root, a).unwrap();
        stage.add_child(a, b).unwrap();
        stage.set_transform(a, Matrix::from_translation(10.0, 0.0));
        stage.set_transform(b, Matrix::from_translation(0.0, 5.0));

        assert_eq!(
            stage.local_to_global(b, Point::new(1.0, 1.0)),
            Point::new(11.0, 6.0)
        );
    }

    #[test]
    fn global_to_local_round_trips_for_translation_chains() {
        let mut stage = Stage::new();
        let root = stage.root();
        let a = stage.create_node();
        stage.add_child(root, a).unwrap();
        stage.set_transform(a, Matrix::from_translation(-3.0, 7.0));

        let p = Point::new(4.0, 4.0);
        let global = stage.local_to_global(a, p);
        let back = stage.global_to_local(a, global);
        assert!((back.x - p.x).abs() < 1e-6);
        assert!((back.y - p.y).abs() < 1e-6);
    }

    #[test]
    fn bounds_of_a_shapeless_subtree_are_zero() {
        let mut stage = Stage::new();
        let root = stage.root();
        let a = stage.create_node();
        stage.add_child(root, a).unwrap();
        assert_eq!(stage.get_bounds(a, root), Rectangle::ZERO);
    }

    #[test]
    fn bounds_union_the_subtree() {
        let mut stage = Stage::new();
        let root = stage.root();
        let group = stage.create_node();
        let a = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let b = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        stage.add_child(root, group).unwrap();
        stage.add_child(group, a).unwrap();
        stage.add_child(group, b).unwrap();
        stage.set_transform(b, Matrix::from_translation(20.0, 5.0));

        assert_eq!(
            stage.get_bounds(group, root),
            Rectangle::new(0.0, 0.0, 30.0, 15.0)
        );
    }

    #[test]
    fn bounds_are_expressed_in_the_target_frame() {
        let mut stage = Stage::new();
        let root = stage.root();
        let frame = stage.create_node();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 4.0, 4.0));
        stage.add_child(root, frame).unwrap();
        stage.add_child(root, shape).unwrap();
        stage.set_transform(frame, Matrix::from_translation(100.0, 100.0));
        stage.set_transform(shape, Matrix::from_translation(110.0, 100.0));

        assert_eq!(
            stage.get_bounds(shape, frame),
            Rectangle::new(10.0, 0.0, 4.0, 4.0)
        );
    }

    #[test]
    fn rotated_extents_produce_axis_aligned_bounds() {
        let mut stage = Stage::new();
        let root = stage.root();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 10.0, 10.0));
        stage.add_child(root, shape).unwrap();
        stage.set_transform(shape, Matrix::from_rotation(core::f64::consts::FRAC_PI_2));

        let b = stage.get_bounds(shape, root);
        assert!((b.x - -10.0).abs() < 1e-9);
        assert!(b.y.abs() < 1e-9);
        assert!((b.width - 10.0).abs() < 1e-9);
        assert!((b.height - 10.0).abs() < 1e-9);
    }

    #[test]
    fn detached_subtrees_measure_against_their_own_root() {
        let mut stage = Stage::new();
        let group = stage.create_node();
        let shape = rect_node(&mut stage, Rectangle::new(0.0, 0.0, 2.0, 2.0));
        stage.add_child(group, shape).unwrap();
        stage.set_transform(shape, Matrix::from_translation(5.0, 5.0));

        assert_eq!(
            stage.get_bounds(group, group),
            Rectangle::new(5.0, 5.0, 2.0, 2.0)
        );
    }
}
