// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained draw lists.
//!
//! A node that should paint something owns a [`DrawList`]: an ordered sequence
//! of [`DrawOp`] values replayed against a [`DrawContext`] every frame. The
//! list doubles as the node's shape for hit testing and bounds queries — every
//! geometry op folds its coordinates into running min/max extrema, and
//! [`extent`](DrawList::extent) reports the resulting local bounding
//! rectangle.
//!
//! Ops are data, not callbacks, so a list can be replayed any number of times,
//! against any context, and inspected by tests and tooling.
//!
//! [`DrawContext`]: crate::backend::DrawContext

use alloc::vec::Vec;

use crate::geom::{Point, Rectangle};

/// An RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component.
    pub r: f64,
    /// Green component.
    pub g: f64,
    /// Blue component.
    pub b: f64,
    /// Alpha component.
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// A paint source for fills and strokes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Brush {
    /// A solid color.
    Solid(Color),
}

impl Default for Brush {
    fn default() -> Self {
        Self::Solid(Color::BLACK)
    }
}

/// One retained drawing command.
///
/// Coordinates are in the owning node's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    /// Begins a new path, discarding any open one.
    BeginPath,
    /// Moves the pen without drawing.
    MoveTo(Point),
    /// Adds a straight segment from the pen to the point.
    LineTo(Point),
    /// Adds a cubic Bézier segment through two control points.
    CurveTo {
        /// First control point.
        c1: Point,
        /// Second control point.
        c2: Point,
        /// Segment end point.
        to: Point,
    },
    /// Adds an axis-aligned rectangle subpath.
    Rect(Rectangle),
    /// Adds a circular arc centered at `center`.
    Arc {
        /// Arc center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Start angle in radians.
        start: f64,
        /// End angle in radians.
        end: f64,
    },
    /// Closes the current subpath.
    ClosePath,
    /// Fills the current path with the current fill style.
    Fill,
    /// Strokes the current path with the current stroke style.
    Stroke,
    /// Sets the stroke brush and line width.
    LineStyle {
        /// Stroke paint.
        brush: Brush,
        /// Line width.
        width: f64,
    },
    /// Sets the fill brush.
    FillStyle(Brush),
    /// Clears the entire backing surface.
    Clear,
}

/// An ordered sequence of [`DrawOp`]s with incrementally maintained extrema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    ops: Vec<DrawOp>,
    min: Option<Point>,
    max: Option<Point>,
}

impl DrawList {
    /// Creates an empty draw list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded ops, in replay order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Whether the list records no ops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether any geometry op has been pushed (style-only lists have no
    /// shape and take no part in bounds or hit testing).
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.min.is_some()
    }

    /// Appends an op, folding any geometry it carries into the extrema.
    pub fn push(&mut self, op: DrawOp) {
        match op {
            DrawOp::MoveTo(p) | DrawOp::LineTo(p) => self.fold(p),
            DrawOp::CurveTo { c1, c2, to } => {
                // Control points bound the curve, so folding them gives a
                // conservative extent.
                self.fold(c1);
                self.fold(c2);
                self.fold(to);
            }
            DrawOp::Rect(r) => {
                self.fold(Point::new(r.x, r.y));
                self.fold(Point::new(r.right(), r.bottom()));
            }
            DrawOp::Arc { center, radius, .. } => {
                self.fold(Point::new(center.x - radius, center.y - radius));
                self.fold(Point::new(center.x + radius, center.y + radius));
            }
            DrawOp::BeginPath
            | DrawOp::ClosePath
            | DrawOp::Fill
            | DrawOp::Stroke
            | DrawOp::LineStyle { .. }
            | DrawOp::FillStyle(_)
            | DrawOp::Clear => {}
        }
        self.ops.push(op);
    }

    /// The local bounding rectangle of all geometry recorded so far.
    ///
    /// [`Rectangle::ZERO`] when no geometry op has been pushed.
    #[must_use]
    pub fn extent(&self) -> Rectangle {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                Rectangle::new(min.x, min.y, max.x - min.x, max.y - min.y)
            }
            _ => Rectangle::ZERO,
        }
    }

    /// Removes all ops and resets the extrema.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.min = None;
        self.max = None;
    }

    fn fold(&mut self, p: Point) {
        self.min = Some(match self.min {
            Some(m) => Point::new(m.x.min(p.x), m.y.min(p.y)),
            None => p,
        });
        self.max = Some(match self.max {
            Some(m) => Point::new(m.x.max(p.x), m.y.max(p.y)),
            None => p,
        });
    }
}
