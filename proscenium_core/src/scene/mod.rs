// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree data model and frame loop.
//!
//! A *node* is an element of the stage's display tree. Each node has:
//!
//! - An identity ([`NodeId`]) — a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree. Child order is paint order: index 0 is the rearmost.
//! - **Local properties** set by the caller:
//!   [`transform`](Stage::set_transform), [`visible`](Stage::set_visible),
//!   [`alpha`](Stage::set_alpha), [`name`](Stage::set_name), and the node's
//!   retained draw list.
//! - **Computed properties** produced by [`evaluate`](Stage::evaluate):
//!   `world_transform` (product of ancestor local transforms),
//!   `effective_alpha` (product of ancestor alphas), and
//!   `effective_visible` (conjunction of ancestor visibility).
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles for
//! cache-friendly traversal.
//!
//! The stage root (slot 0) always exists. Root children owning a
//! [`DrawContext`](crate::backend::DrawContext) surface are *layers*; the
//! frame loop ([`run_frame`](Stage::run_frame)) clears them and replays each
//! visible node's draw list into its nearest enclosing layer.
//!
//! Listeners attach per node and kind with
//! [`add_event_listener`](Stage::add_event_listener);
//! [`dispatch_event`](Stage::dispatch_event)
//! walks capture, target, and bubble phases over the ancestor chain, and the
//! input entry points (`on_pointer_*`, `on_key_*`) translate host samples
//! into dispatches.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)):
//!
//! - **TRANSFORM** — local transform and visibility changes; propagates to
//!   all descendants, since world transforms and effective visibility are
//!   inherited.
//! - **ALPHA** — alpha changes; likewise propagating.
//! - **TOPOLOGY** — structural changes (add/remove child, create/destroy
//!   node, reorder) that trigger a scene-path rebuild.

mod bounds;
mod dispatch;
mod evaluate;
mod frame;
mod id;
mod input;
mod store;
mod traverse;

pub use dispatch::Callback;
pub use id::{INVALID, ListenerId, NodeId};
pub use store::Stage;
pub use traverse::Children;
