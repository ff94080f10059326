// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame loop: layer management and per-frame drawing.
//!
//! A *layer* is a root child that owns a [`DrawContext`] surface. Each frame
//! clears every layer surface, broadcasts `EnterFrame`, recomputes dirty
//! scene state, then replays the draw list of every effectively visible node
//! into the nearest enclosing layer's surface, in scene-path order (back to
//! front). Nodes with no enclosing layer retain their state but draw nowhere.
//!
//! The stage does not own a clock. Hosts decide when frames run and pass the
//! current time in; [`set_frame_rate`](Stage::set_frame_rate) only records
//! the requested pacing for the host driver to honor.

use alloc::boxed::Box;

use crate::backend::DrawContext;
use crate::draw::DrawOp;
use crate::error::Error;
use crate::event::{Event, EventKind};
use crate::trace::{DrawNodeEvent, EnterFrameEvent, FrameBeginEvent, FrameEndEvent, Tracer};

use super::id::{INVALID, NodeId};
use super::store::Stage;

impl Stage {
    /// Requests a frame rate in frames per second.
    ///
    /// `None` or a non-positive rate stops the loop. The stage only records
    /// the resulting interval; the host driver reads it back through
    /// [`frame_interval_ms`](Self::frame_interval_ms) and schedules
    /// [`run_frame`](Self::run_frame) calls accordingly.
    pub fn set_frame_rate(&mut self, frames_per_second: Option<f64>) {
        self.frame_interval_ms = frames_per_second
            .filter(|fps| *fps > 0.0)
            .map(|fps| 1000.0 / fps);
    }

    /// The requested interval between frames, or `None` when stopped.
    #[must_use]
    pub fn frame_interval_ms(&self) -> Option<f64> {
        self.frame_interval_ms
    }

    /// Whether a frame rate is currently requested.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.frame_interval_ms.is_some()
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Creates a node owning `surface` and appends it as the topmost root
    /// child.
    ///
    /// Later layers stack in front of earlier ones.
    pub fn add_layer(&mut self, surface: Box<dyn DrawContext>) -> NodeId {
        let id = self.create_node();
        self.context[id.idx as usize] = Some(surface);
        let index = self.child_count(self.root());
        self.attach_child(0, id.idx, index);
        id
    }

    /// Takes the surface back from a layer node.
    ///
    /// The node is detached from the root (dispatching `Removed` through its
    /// subtree) and stays alive as an ordinary detached node; returns `None`
    /// when it owned no surface.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn remove_layer(&mut self, id: NodeId) -> Option<Box<dyn DrawContext>> {
        self.validate(id);
        let surface = self.context[id.idx as usize].take()?;
        if self.parent[id.idx as usize] != INVALID {
            let parent = self.parent[id.idx as usize];
            self.detach_child(parent, id.idx);
        }
        Some(surface)
    }

    /// Number of root children owning a surface.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.children_indices(0)
            .iter()
            .filter(|&&c| self.context[c as usize].is_some())
            .count()
    }

    /// The front-most layer, if any.
    #[must_use]
    pub fn topmost_layer(&self) -> Option<NodeId> {
        self.children_indices(0)
            .into_iter()
            .rev()
            .find(|&c| self.context[c as usize].is_some())
            .map(|c| NodeId {
                idx: c,
                generation: self.generation[c as usize],
            })
    }

    /// Runs one frame at host time `now_ms`.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::SurfaceUnavailable`] from a layer surface; the
    /// frame is abandoned mid-way and the host decides whether to retry.
    pub fn run_frame(&mut self, now_ms: f64) -> Result<(), Error> {
        self.run_frame_with(now_ms, &mut Tracer::none())
    }

    /// [`run_frame`](Self::run_frame) with tracing.
    ///
    /// # Errors
    ///
    /// Same as [`run_frame`](Self::run_frame).
    pub fn run_frame_with(&mut self, now_ms: f64, tracer: &mut Tracer<'_>) -> Result<(), Error> {
        self.frame_count += 1;
        let frame_index = self.frame_count;
        tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            timestamp_ms: now_ms,
        });

        // Every layer surface is wiped, back to front, before anything runs
        // script: listeners observe a blank frame, never last frame's pixels.
        let mut layers_cleared = 0;
        for idx in self.children_indices(0) {
            if let Some(ctx) = self.context[idx as usize].as_mut() {
                ctx.clear()?;
                layers_cleared += 1;
            }
        }

        let receivers = self.queue.len();
        let mut event = Event::new(EventKind::EnterFrame).with_timestamp(now_ms);
        // A fresh event cannot arrive cancelled.
        let _ = self.broadcast_event(&mut event);
        tracer.enter_frame(&EnterFrameEvent {
            frame_index,
            receivers,
        });

        // Listeners may have moved nodes or touched properties; settle
        // everything before reading computed state.
        self.evaluate_with(tracer);

        let mut nodes_drawn = 0;
        for i in 1..self.scene_path_len {
            let idx = self.traversal_order[i];
            if !self.effective_visible[idx as usize] {
                continue;
            }
            let Some(surface_idx) = self.surface_slot(idx) else {
                continue;
            };
            let Some(list) = self.draw[idx as usize].as_ref() else {
                continue;
            };
            if list.is_empty() {
                continue;
            }
            let world = self.world_transform[idx as usize];
            let alpha = self.effective_alpha[idx as usize];
            let op_count = list.ops().len();
            // `draw` and `context` are distinct fields, so the shared borrow
            // of the list and the mutable borrow of the surface coexist.
            let ctx = match self.context[surface_idx as usize].as_mut() {
                Some(ctx) => ctx.as_mut(),
                None => continue,
            };
            ctx.save();
            ctx.set_transform(world);
            // A layer drawing onto its own surface stays at full alpha;
            // its alpha only attenuates descendants.
            if surface_idx != idx {
                ctx.set_alpha(alpha);
            }
            replay(list.ops(), ctx)?;
            ctx.restore();
            tracer.draw_node(&DrawNodeEvent {
                frame_index,
                node_index: idx,
                op_count,
            });
            nodes_drawn += 1;
        }

        tracer.frame_end(&FrameEndEvent {
            frame_index,
            layers_cleared,
            nodes_drawn,
        });
        Ok(())
    }

    /// Nearest ancestor-or-self slot owning a surface.
    fn surface_slot(&self, idx: u32) -> Option<u32> {
        let mut cur = idx;
        loop {
            if self.context[cur as usize].is_some() {
                return Some(cur);
            }
            let p = self.parent[cur as usize];
            if p == INVALID {
                return None;
            }
            cur = p;
        }
    }
}

/// Replays a retained op sequence into a surface.
///
/// # Errors
///
/// Propagates [`Error::SurfaceUnavailable`] from [`DrawOp::Clear`].
fn replay(ops: &[DrawOp], ctx: &mut dyn DrawContext) -> Result<(), Error> {
    for op in ops {
        match *op {
            DrawOp::BeginPath => ctx.begin_path(),
            DrawOp::MoveTo(p) => ctx.move_to(p.x, p.y),
            DrawOp::LineTo(p) => ctx.line_to(p.x, p.y),
            DrawOp::CurveTo { c1, c2, to } => ctx.curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y),
            DrawOp::Rect(r) => ctx.rect(r.x, r.y, r.width, r.height),
            DrawOp::Arc {
                center,
                radius,
                start,
                end,
            } => ctx.arc(center.x, center.y, radius, start, end),
            DrawOp::ClosePath => ctx.close_path(),
            DrawOp::Fill => ctx.fill(),
            DrawOp::Stroke => ctx.stroke(),
            DrawOp::LineStyle { brush, width } => ctx.set_stroke_style(brush, width),
            DrawOp::FillStyle(brush) => ctx.set_fill_style(brush),
            DrawOp::Clear => ctx.clear()?,
        }
    }
    Ok(())
}
