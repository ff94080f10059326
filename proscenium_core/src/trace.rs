// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! frame-loop instrumentation calls at each stage. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

/// Emitted at the top of [`run_frame`](crate::scene::Stage::run_frame).
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host timestamp passed to the tick, in milliseconds.
    pub timestamp_ms: f64,
}

/// Emitted once a frame has fully drawn.
#[derive(Clone, Copy, Debug)]
pub struct FrameEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// How many layer surfaces were cleared.
    pub layers_cleared: usize,
    /// How many nodes replayed a draw list.
    pub nodes_drawn: usize,
}

/// Emitted when evaluation rebuilds the cached scene path.
#[derive(Clone, Copy, Debug)]
pub struct PathRebuildEvent {
    /// Nodes on the scene path (attached to the stage root).
    pub attached: usize,
    /// Total live nodes, detached subtrees included.
    pub total: usize,
}

/// Emitted after `EnterFrame` has been broadcast.
#[derive(Clone, Copy, Debug)]
pub struct EnterFrameEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Dispatcher-queue members visited by the broadcast.
    pub receivers: usize,
}

/// Emitted for each node whose draw list was replayed this frame.
#[derive(Clone, Copy, Debug)]
pub struct DrawNodeEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Raw slot index of the node.
    pub node_index: u32,
    /// Number of ops replayed.
    pub op_count: usize,
}

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the top of a frame tick.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called once a frame has fully drawn.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }

    /// Called when the scene path is rebuilt.
    fn on_path_rebuild(&mut self, e: &PathRebuildEvent) {
        _ = e;
    }

    /// Called after `EnterFrame` delivery.
    fn on_enter_frame(&mut self, e: &EnterFrameEvent) {
        _ = e;
    }

    /// Called for each node drawn this frame.
    fn on_draw_node(&mut self, e: &DrawNodeEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PathRebuildEvent`].
    #[inline]
    pub fn path_rebuild(&mut self, e: &PathRebuildEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_path_rebuild(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EnterFrameEvent`].
    #[inline]
    pub fn enter_frame(&mut self, e: &EnterFrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_enter_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DrawNodeEvent`].
    #[inline]
    pub fn draw_node(&mut self, e: &DrawNodeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_draw_node(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            timestamp_ms: 16.0,
        });
        sink.on_path_rebuild(&PathRebuildEvent {
            attached: 3,
            total: 4,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_begin(&FrameBeginEvent {
            frame_index: 1,
            timestamp_ms: 0.0,
        });
        tracer.frame_end(&FrameEndEvent {
            frame_index: 1,
            layers_cleared: 0,
            nodes_drawn: 0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_begin(&FrameBeginEvent {
            frame_index: 7,
            timestamp_ms: 0.0,
        });
        drop(tracer);
        assert_eq!(sink.frames, &[7]);
    }
}
