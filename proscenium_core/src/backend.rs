// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract.
//!
//! The engine draws through the [`DrawContext`] trait: an opaque
//! immediate-mode 2D surface the frame loop replays retained
//! [`DrawOp`](crate::draw::DrawOp) lists into. Each stage layer owns one
//! context. Platform glue implements this over whatever canvas the host
//! provides; `proscenium_debug` ships a recording implementation for tests.
//!
//! The engine only ever calls these methods between matching
//! [`save`](DrawContext::save)/[`restore`](DrawContext::restore) pairs, so
//! implementations may keep transform and style state on a simple stack.

use crate::draw::Brush;
use crate::error::Error;
use crate::geom::Matrix;

/// An immediate-mode 2D drawing surface.
pub trait DrawContext {
    /// Pushes the current transform, alpha, and style state.
    fn save(&mut self);

    /// Pops to the most recently saved state.
    fn restore(&mut self);

    /// Replaces the current transform.
    fn set_transform(&mut self, matrix: Matrix);

    /// Post-multiplies the current transform.
    fn concat_transform(&mut self, matrix: Matrix);

    /// Sets the global alpha applied to subsequent fills and strokes.
    fn set_alpha(&mut self, alpha: f64);

    /// Begins a new path, discarding any open one.
    fn begin_path(&mut self);

    /// Moves the pen to `(x, y)` without drawing.
    fn move_to(&mut self, x: f64, y: f64);

    /// Adds a straight segment from the pen to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);

    /// Adds a cubic Bézier segment through the two control points.
    fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);

    /// Adds an axis-aligned rectangle subpath.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Adds a circular arc centered at `(x, y)`.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);

    /// Closes the current subpath.
    fn close_path(&mut self);

    /// Sets the fill paint.
    fn set_fill_style(&mut self, brush: Brush);

    /// Sets the stroke paint and line width.
    fn set_stroke_style(&mut self, brush: Brush, width: f64);

    /// Fills the current path.
    fn fill(&mut self);

    /// Strokes the current path.
    fn stroke(&mut self);

    /// Clears the entire backing surface.
    ///
    /// # Errors
    ///
    /// [`Error::SurfaceUnavailable`] when the backing surface cannot be
    /// acquired. The frame loop propagates this without retrying.
    fn clear(&mut self) -> Result<(), Error>;

    /// The backing surface size in stage units, `(width, height)`.
    fn size(&self) -> (f64, f64);
}
