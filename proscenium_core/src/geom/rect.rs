// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned rectangle.

use crate::error::Error;

use super::Point;

/// An axis-aligned box described by its top-left corner and extents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rectangle {
    /// The zero rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a rectangle from its corner and extents.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge coordinate.
    #[inline]
    #[must_use]
    pub const fn top(self) -> f64 {
        self.y
    }

    /// Right edge coordinate.
    #[inline]
    #[must_use]
    pub const fn right(self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge coordinate.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Left edge coordinate.
    #[inline]
    #[must_use]
    pub const fn left(self) -> f64 {
        self.x
    }

    /// Whether this rectangle encloses no area.
    ///
    /// Empty means `width <= 0` or `height <= 0`. (Display-list libraries
    /// have historically shipped an inverted version of this test; the
    /// contract here is the documented, testable one.)
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether the point lies inside this rectangle (edges inclusive).
    #[inline]
    #[must_use]
    pub const fn contains_point(self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Corner-containment intersection test.
    ///
    /// True iff at least one corner of `other` lies within `self`. This is a
    /// known approximation, not true interval overlap: two rectangles that
    /// overlap only through edge-crossing, with no corner of `other` inside
    /// `self`, are reported as non-intersecting.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.contains_point(Point::new(other.left(), other.top()))
            || self.contains_point(Point::new(other.right(), other.top()))
            || self.contains_point(Point::new(other.left(), other.bottom()))
            || self.contains_point(Point::new(other.right(), other.bottom()))
    }

    /// Returns the overlap of two rectangles, or the zero rectangle when
    /// they are disjoint.
    ///
    /// # Errors
    ///
    /// [`Error::NegativeExtent`] when either input has a negative extent.
    pub fn intersection(self, other: Self) -> Result<Self, Error> {
        self.require_non_negative()?;
        other.require_non_negative()?;
        let x = self.left().max(other.left());
        let y = self.top().max(other.top());
        let width = self.right().min(other.right()) - x;
        let height = self.bottom().min(other.bottom()) - y;
        if width < 0.0 || height < 0.0 {
            return Ok(Self::ZERO);
        }
        Ok(Self::new(x, y, width, height))
    }

    /// Returns the smallest rectangle containing both inputs.
    ///
    /// # Errors
    ///
    /// [`Error::NegativeExtent`] when either input has a negative extent.
    pub fn union(self, other: Self) -> Result<Self, Error> {
        self.require_non_negative()?;
        other.require_non_negative()?;
        let x = self.left().min(other.left());
        let y = self.top().min(other.top());
        let width = self.right().max(other.right()) - x;
        let height = self.bottom().max(other.bottom()) - y;
        Ok(Self::new(x, y, width, height))
    }

    const fn require_non_negative(self) -> Result<(), Error> {
        if self.width < 0.0 || self.height < 0.0 {
            return Err(Error::NegativeExtent {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_edges() {
        let r = Rectangle::new(1.0, 2.0, 10.0, 20.0);
        assert_eq!(r.left(), 1.0);
        assert_eq!(r.top(), 2.0);
        assert_eq!(r.right(), 11.0);
        assert_eq!(r.bottom(), 22.0);
    }

    #[test]
    fn emptiness_contract() {
        assert!(Rectangle::ZERO.is_empty());
        assert!(Rectangle::new(0.0, 0.0, -1.0, 5.0).is_empty());
        assert!(Rectangle::new(0.0, 0.0, 5.0, 0.0).is_empty());
        assert!(!Rectangle::new(0.0, 0.0, 0.1, 0.1).is_empty());
    }

    #[test]
    fn contains_point_is_edge_inclusive() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Point::new(0.0, 0.0)));
        assert!(r.contains_point(Point::new(10.0, 10.0)));
        assert!(!r.contains_point(Point::new(10.01, 5.0)));
    }

    #[test]
    fn overlapping_rectangles_intersect() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(b));
    }

    #[test]
    fn cross_overlap_without_corners_is_missed() {
        // A wide flat bar crossing a tall thin bar: real overlap, but no
        // corner of the argument lies inside the receiver.
        let tall = Rectangle::new(4.0, 0.0, 2.0, 10.0);
        let wide = Rectangle::new(0.0, 4.0, 10.0, 2.0);
        assert!(!tall.intersects(wide));
    }

    #[test]
    fn intersection_of_overlapping_quadrants() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(b).unwrap(), Rectangle::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn intersection_of_disjoint_is_zero() {
        let a = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let b = Rectangle::new(5.0, 5.0, 1.0, 1.0);
        assert_eq!(a.intersection(b).unwrap(), Rectangle::ZERO);
    }

    #[test]
    fn union_covers_both() {
        let a = Rectangle::new(0.0, 0.0, 2.0, 2.0);
        let b = Rectangle::new(5.0, -1.0, 1.0, 1.0);
        assert_eq!(a.union(b).unwrap(), Rectangle::new(0.0, -1.0, 6.0, 3.0));
    }

    #[test]
    fn negative_extent_inputs_are_rejected() {
        let bad = Rectangle::new(0.0, 0.0, -2.0, 1.0);
        let ok = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            bad.intersection(ok),
            Err(Error::NegativeExtent { .. })
        ));
        assert!(matches!(ok.union(bad), Err(Error::NegativeExtent { .. })));
    }
}
