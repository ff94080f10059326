// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D point / vector value type.

use core::ops::{Add, Sub};

use super::float;

/// A point (or free vector) in the plane.
///
/// All operations are pure: they read their inputs and produce new values,
/// never mutating caller state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point from coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the origin.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        float::sqrt(self.x * self.x + self.y * self.y)
    }

    /// Distance between two points.
    #[inline]
    #[must_use]
    pub fn distance(a: Self, b: Self) -> f64 {
        (b - a).length()
    }

    /// Returns this vector scaled to the given length.
    ///
    /// The zero vector has no direction; scaling it produces non-finite
    /// coordinates, which [`is_finite`](Self::is_finite) exposes.
    #[inline]
    #[must_use]
    pub fn normalize(self, thickness: f64) -> Self {
        let len = self.length();
        Self {
            x: self.x / len * thickness,
            y: self.y / len * thickness,
        }
    }

    /// Linear interpolation: `t = 0` yields `a`, `t = 1` yields `b`.
    #[inline]
    #[must_use]
    pub fn interpolate(a: Self, b: Self, t: f64) -> Self {
        Self {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }

    /// Returns this point displaced by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Is this point [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Is this point [NaN]?
    ///
    /// [NaN]: f64::is_nan
    #[inline]
    #[must_use]
    pub const fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_euclidean() {
        assert_eq!(Point::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Point::ZERO.length(), 0.0);
    }

    #[test]
    fn add_subtract_round_trip() {
        let a = Point::new(1.5, -2.0);
        let b = Point::new(0.25, 7.0);
        assert_eq!(a + b - b, a);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert_eq!(Point::distance(a, b), 5.0);
        assert_eq!(Point::distance(b, a), 5.0);
    }

    #[test]
    fn normalize_scales_to_thickness() {
        let p = Point::new(0.0, 2.0).normalize(7.0);
        assert!((p.x - 0.0).abs() < 1e-12);
        assert!((p.y - 7.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_zero_vector_is_not_finite() {
        assert!(!Point::ZERO.normalize(1.0).is_finite());
    }

    #[test]
    fn interpolate_endpoints_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, -4.0);
        assert_eq!(Point::interpolate(a, b, 0.0), a);
        assert_eq!(Point::interpolate(a, b, 1.0), b);
        assert_eq!(Point::interpolate(a, b, 0.5), Point::new(5.0, -2.0));
    }

    #[test]
    fn offset_displaces() {
        assert_eq!(Point::new(1.0, 2.0).offset(-1.0, 3.0), Point::new(0.0, 5.0));
    }
}
