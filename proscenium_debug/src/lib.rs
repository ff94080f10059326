// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for proscenium
//! diagnostics.
//!
//! This crate provides test doubles and
//! [`TraceSink`](proscenium_core::trace::TraceSink) implementations for
//! development and post-mortem analysis:
//!
//! - [`canvas::RecordingContext`] — a
//!   [`DrawContext`](proscenium_core::backend::DrawContext) that logs every
//!   call for assertions.
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output,
//!   plus [`pretty::format_tree`] for scene-tree dumps.
//! - [`recorder::RecorderSink`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from
//!   recorded bytes.

pub mod canvas;
pub mod chrome;
pub mod pretty;
pub mod recorder;
