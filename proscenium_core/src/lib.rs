// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types and node tree for a retained-mode 2D scene graph.
//!
//! `proscenium_core` provides the foundational data structures for a
//! display-list style engine: a tree of nodes with composable affine
//! transforms, a DOM-style three-phase event propagation model, retained
//! per-node draw-command lists, and a frame tick that keeps a cached
//! traversal order in sync with tree mutations. It is `no_std` compatible
//! (with `alloc`) and uses array-based struct-of-arrays storage with index
//! handles for cache-friendly traversal.
//!
//! # Architecture
//!
//! A [`Stage`](scene::Stage) owns every node and drives the loop:
//!
//! ```text
//!   Host input ──► Stage::on_pointer_* / on_key ──► dispatch/broadcast
//!                                                        │
//!   Tick source ──► Stage::run_frame(now_ms)             ▼
//!        │                                         listener callbacks
//!        ├── clear layers                          (may mutate the tree)
//!        ├── broadcast EnterFrame                        │
//!        ├── evaluate (world transforms, alpha) ◄────────┘
//!        └── draw scene path back-to-front ──► DrawContext
//! ```
//!
//! **[`geom`]** — Point, Matrix (2×3 affine), Rectangle value types used for
//! transforms, hit-testing, and bounds.
//!
//! **[`event`]** — The event record shared by every variant (mouse, keyboard,
//! touch, text, lifecycle) plus the host input boundary types.
//!
//! **[`scene`]** — Struct-of-arrays node storage with generational handles,
//! listener registry and the capture/target/bubble dispatch algorithm, the
//! cached scene path, incremental evaluation, input translation, and the
//! per-frame tick.
//!
//! **[`draw`]** — Retained draw-command lists with incrementally maintained
//! bounding extrema.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! TRANSFORM and ALPHA propagate to descendants; TOPOLOGY triggers a
//! scene-path rebuild.
//!
//! **[`backend`]** — The [`DrawContext`](backend::DrawContext) trait that
//! drawing backends implement; the engine consumes it as an opaque
//! immediate-mode 2D capability.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Uses `std` float intrinsics instead of
//!   `libm`.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod dirty;
pub mod draw;
pub mod error;
pub mod event;
pub mod geom;
pub mod scene;
pub mod trace;
