// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2×3 affine transform.
//!
//! This type covers the subset of planar affine transforms the scene graph
//! actually needs (identity, composition, point mapping, inversion, and the
//! rotation/scale/skew constructors) without pulling in a linear-algebra
//! crate.

use core::ops::Mul;

use crate::error::Error;

use super::Point;
use super::float;

/// A planar affine transform mapping `p' = (a·x + c·y + tx, b·x + d·y + ty)`.
///
/// The six fields are the two linear columns `(a, b)`, `(c, d)` and the
/// translation `(tx, ty)`, matching the conventional display-list layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    /// Linear part, column 0 x.
    pub a: f64,
    /// Linear part, column 0 y.
    pub b: f64,
    /// Linear part, column 1 x.
    pub c: f64,
    /// Linear part, column 1 y.
    pub d: f64,
    /// Translation x.
    pub tx: f64,
    /// Translation y.
    pub ty: f64,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Creates a transform from its six fields.
    #[inline]
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Creates a pure translation.
    #[inline]
    #[must_use]
    pub const fn from_translation(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    /// Creates a non-uniform scale about the origin.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Creates a counterclockwise rotation about the origin (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation(radians: f64) -> Self {
        let (s, c) = float::sin_cos(radians);
        Self {
            a: c,
            b: s,
            c: -s,
            d: c,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Creates a skew along each axis (radians).
    #[inline]
    #[must_use]
    pub fn from_skew(skew_x: f64, skew_y: f64) -> Self {
        Self {
            a: 1.0,
            b: float::tan(skew_y),
            c: float::tan(skew_x),
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Applies an additional translation after this transform.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..self
        }
    }

    /// Applies an additional rotation (radians) after this transform.
    #[inline]
    #[must_use]
    pub fn rotate(self, radians: f64) -> Self {
        Self::from_rotation(radians) * self
    }

    /// Applies an additional scale after this transform.
    #[inline]
    #[must_use]
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self::from_scale(sx, sy) * self
    }

    /// Applies an additional skew (radians) after this transform.
    #[inline]
    #[must_use]
    pub fn skew(self, skew_x: f64, skew_y: f64) -> Self {
        Self::from_skew(skew_x, skew_y) * self
    }

    /// Maps a point through this transform.
    #[inline]
    #[must_use]
    pub fn transform_point(self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.tx,
            y: self.b * p.x + self.d * p.y + self.ty,
        }
    }

    /// Maps a vector through the linear part only (translation ignored).
    #[inline]
    #[must_use]
    pub fn delta_transform_point(self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y,
            y: self.b * p.x + self.d * p.y,
        }
    }

    /// Determinant of the linear part.
    #[inline]
    #[must_use]
    pub const fn determinant(self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Returns the inverse transform.
    ///
    /// # Errors
    ///
    /// [`Error::SingularMatrix`] when the determinant is zero. Degenerate
    /// matrices surface here instead of propagating NaN through later point
    /// math.
    pub fn invert(self) -> Result<Self, Error> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(Error::SingularMatrix);
        }
        Ok(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.c * self.ty - self.d * self.tx) / det,
            ty: (self.b * self.tx - self.a * self.ty) / det,
        })
    }

    /// Rotation component in radians, `atan2(b, a)`.
    #[inline]
    #[must_use]
    pub fn rotation(self) -> f64 {
        float::atan2(self.b, self.a)
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.d.is_finite()
            && self.tx.is_finite()
            && self.ty.is_finite()
    }

    /// Is this transform [NaN]?
    ///
    /// [NaN]: f64::is_nan
    #[inline]
    #[must_use]
    pub const fn is_nan(self) -> bool {
        self.a.is_nan()
            || self.b.is_nan()
            || self.c.is_nan()
            || self.d.is_nan()
            || self.tx.is_nan()
            || self.ty.is_nan()
    }
}

impl Default for Matrix {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Self;

    /// Composes `self ∘ rhs`: `rhs` is applied to points first, `self`
    /// second, so `(self * rhs).transform_point(p)` equals
    /// `self.transform_point(rhs.transform_point(p))`.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            tx: self.a * rhs.tx + self.c * rhs.ty + self.tx,
            ty: self.b * rhs.tx + self.d * rhs.ty + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point, eps: f64) {
        assert!(
            (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Matrix::default(), Matrix::IDENTITY);
    }

    #[test]
    fn identity_multiply() {
        let t = Matrix::from_translation(1.0, 2.0);
        assert_eq!(Matrix::IDENTITY * t, t);
        assert_eq!(t * Matrix::IDENTITY, t);
    }

    #[test]
    fn composition_applies_rhs_first() {
        let scale = Matrix::from_scale(2.0, 2.0);
        let translate = Matrix::from_translation(3.0, 4.0);
        // Scale first, then translate.
        let m = translate * scale;
        assert_eq!(
            m.transform_point(Point::new(1.0, 1.0)),
            Point::new(5.0, 6.0)
        );
    }

    #[test]
    fn rotate_quarter_turn_maps_x_axis_to_y_axis() {
        let m = Matrix::IDENTITY.rotate(core::f64::consts::FRAC_PI_2);
        approx(
            m.transform_point(Point::new(1.0, 0.0)),
            Point::new(0.0, 1.0),
            1e-9,
        );
    }

    #[test]
    fn composition_is_associative_within_tolerance() {
        let a = Matrix::new(1.1, 0.3, -0.2, 0.9, 5.0, -3.0);
        let b = Matrix::from_rotation(0.7).translate(2.0, 1.0);
        let c = Matrix::from_scale(0.5, 3.0).skew(0.1, -0.2);
        let lhs = (a * b) * c;
        let rhs = a * (b * c);
        for p in [Point::ZERO, Point::new(1.0, 0.0), Point::new(-3.0, 7.0)] {
            approx(lhs.transform_point(p), rhs.transform_point(p), 1e-9);
        }
    }

    #[test]
    fn invert_round_trips() {
        let m = Matrix::from_rotation(0.4).scale(2.0, 3.0).translate(7.0, -1.0);
        let inv = m.invert().unwrap();
        for p in [Point::new(1.0, 2.0), Point::new(-5.0, 0.25)] {
            approx(inv.transform_point(m.transform_point(p)), p, 1e-9);
        }
    }

    #[test]
    fn invert_singular_fails() {
        let m = Matrix::from_scale(0.0, 1.0);
        assert_eq!(m.invert(), Err(Error::SingularMatrix));
    }

    #[test]
    fn delta_transform_ignores_translation() {
        let m = Matrix::from_translation(100.0, 100.0);
        assert_eq!(
            m.delta_transform_point(Point::new(1.0, 2.0)),
            Point::new(1.0, 2.0)
        );
    }

    #[test]
    fn rotation_accessor_reads_back() {
        let m = Matrix::from_rotation(0.9);
        assert!((m.rotation() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn nan_detected() {
        let mut m = Matrix::IDENTITY;
        m.c = f64::NAN;
        assert!(!m.is_finite());
        assert!(m.is_nan());
    }
}
