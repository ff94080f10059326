// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A call-recording draw context.
//!
//! [`RecordingContext`] implements
//! [`DrawContext`](proscenium_core::backend::DrawContext) and appends one
//! [`CanvasOp`] per call to a shared log. Cloning the context shares the log,
//! so a test can hand one clone to
//! [`Stage::add_layer`](proscenium_core::scene::Stage::add_layer) and keep
//! another to assert against after the frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proscenium_core::backend::DrawContext;
use proscenium_core::draw::Brush;
use proscenium_core::error::Error;
use proscenium_core::geom::Matrix;

/// One recorded [`DrawContext`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasOp {
    /// A `save` call.
    Save,
    /// A `restore` call.
    Restore,
    /// A `set_transform` call.
    SetTransform(Matrix),
    /// A `concat_transform` call.
    ConcatTransform(Matrix),
    /// A `set_alpha` call.
    SetAlpha(f64),
    /// A `begin_path` call.
    BeginPath,
    /// A `move_to` call.
    MoveTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// A `line_to` call.
    LineTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// A `curve_to` call (end point only; control points are not asserted
    /// against in practice).
    CurveTo {
        /// End X coordinate.
        x: f64,
        /// End Y coordinate.
        y: f64,
    },
    /// A `rect` call.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// An `arc` call.
    Arc {
        /// Center X coordinate.
        x: f64,
        /// Center Y coordinate.
        y: f64,
        /// Radius.
        radius: f64,
    },
    /// A `close_path` call.
    ClosePath,
    /// A `set_fill_style` call.
    SetFillStyle(Brush),
    /// A `set_stroke_style` call.
    SetStrokeStyle {
        /// Stroke paint.
        brush: Brush,
        /// Line width.
        width: f64,
    },
    /// A `fill` call.
    Fill,
    /// A `stroke` call.
    Stroke,
    /// A successful `clear` call.
    Clear,
}

/// A [`DrawContext`] test double that records every call.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    ops: Rc<RefCell<Vec<CanvasOp>>>,
    available: Rc<Cell<bool>>,
    size: (f64, f64),
}

impl RecordingContext {
    /// Creates an 800×600 recording surface.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(800.0, 600.0)
    }

    /// Creates a recording surface with the given size.
    #[must_use]
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            ops: Rc::default(),
            available: Rc::new(Cell::new(true)),
            size: (width, height),
        }
    }

    /// Returns a copy of the recorded ops.
    #[must_use]
    pub fn ops(&self) -> Vec<CanvasOp> {
        self.ops.borrow().clone()
    }

    /// Number of ops recorded so far.
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.ops.borrow().len()
    }

    /// Discards the recorded ops.
    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Toggles surface availability. While unavailable, `clear` returns
    /// [`Error::SurfaceUnavailable`]; all clones share the toggle.
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    fn record(&self, op: CanvasOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.record(CanvasOp::Save);
    }

    fn restore(&mut self) {
        self.record(CanvasOp::Restore);
    }

    fn set_transform(&mut self, matrix: Matrix) {
        self.record(CanvasOp::SetTransform(matrix));
    }

    fn concat_transform(&mut self, matrix: Matrix) {
        self.record(CanvasOp::ConcatTransform(matrix));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.record(CanvasOp::SetAlpha(alpha));
    }

    fn begin_path(&mut self) {
        self.record(CanvasOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(CanvasOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(CanvasOp::LineTo { x, y });
    }

    fn curve_to(&mut self, _c1x: f64, _c1y: f64, _c2x: f64, _c2y: f64, x: f64, y: f64) {
        self.record(CanvasOp::CurveTo { x, y });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(CanvasOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start: f64, _end: f64) {
        self.record(CanvasOp::Arc { x, y, radius });
    }

    fn close_path(&mut self) {
        self.record(CanvasOp::ClosePath);
    }

    fn set_fill_style(&mut self, brush: Brush) {
        self.record(CanvasOp::SetFillStyle(brush));
    }

    fn set_stroke_style(&mut self, brush: Brush, width: f64) {
        self.record(CanvasOp::SetStrokeStyle { brush, width });
    }

    fn fill(&mut self) {
        self.record(CanvasOp::Fill);
    }

    fn stroke(&mut self) {
        self.record(CanvasOp::Stroke);
    }

    fn clear(&mut self) -> Result<(), Error> {
        if !self.available.get() {
            return Err(Error::SurfaceUnavailable);
        }
        self.record(CanvasOp::Clear);
        Ok(())
    }

    fn size(&self) -> (f64, f64) {
        self.size
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}
