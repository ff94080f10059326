// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D geometry value types.
//!
//! [`Point`] and [`Matrix`] cover the subset of planar affine geometry the
//! scene graph actually needs (composition, point mapping, inversion)
//! without pulling in a linear-algebra crate. [`Rectangle`] is the
//! axis-aligned box used for hit-testing and bounds, and deliberately
//! reproduces two display-list quirks — corner-containment intersection and
//! a documented emptiness contract — rather than textbook interval math.

mod matrix;
mod point;
mod rect;

pub use matrix::Matrix;
pub use point::Point;
pub use rect::Rectangle;

/// Float helpers that route through `libm` when `std` is off.
pub(crate) mod float {
    #[inline]
    pub(crate) fn sqrt(v: f64) -> f64 {
        #[cfg(feature = "std")]
        {
            v.sqrt()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::sqrt(v)
        }
    }

    #[inline]
    pub(crate) fn atan2(y: f64, x: f64) -> f64 {
        #[cfg(feature = "std")]
        {
            y.atan2(x)
        }
        #[cfg(not(feature = "std"))]
        {
            libm::atan2(y, x)
        }
    }

    #[inline]
    pub(crate) fn sin_cos(v: f64) -> (f64, f64) {
        #[cfg(feature = "std")]
        {
            v.sin_cos()
        }
        #[cfg(not(feature = "std"))]
        {
            (libm::sin(v), libm::cos(v))
        }
    }

    #[inline]
    pub(crate) fn tan(v: f64) -> f64 {
        #[cfg(feature = "std")]
        {
            v.tan()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::tan(v)
        }
    }
}
