// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Proscenium uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! propagate invalidation through the node tree. Each channel is an
//! independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`TRANSFORM`] and [`ALPHA`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency
//!   edges from child to parent. Marking a parent dirty automatically marks
//!   all descendants, because world transforms, effective alpha, and
//!   effective visibility are inherited properties. (Visibility changes are
//!   routed through [`TRANSFORM`] so the same drain pass recomputes both
//!   world transforms and `effective_visible`.)
//!
//! - **Structural** — [`TOPOLOGY`] is marked on tree mutations (add/remove
//!   child, create/destroy node, reorders). It triggers a traversal-order
//!   rebuild during evaluation but does not propagate to descendants.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`Stage::evaluate`](crate::scene::Stage::evaluate) call drains all
//! channels and refreshes the cached world transforms, effective alpha, and
//! paint order used by [`run_frame`](crate::scene::Stage::run_frame).

use understory_dirty::Channel;

/// Transform or visibility changed — requires world transform and effective
/// visibility recomputation for descendants.
pub const TRANSFORM: Channel = Channel::new(0);

/// Alpha changed — requires effective alpha recomputation for descendants.
pub const ALPHA: Channel = Channel::new(1);

/// Tree topology changed — triggers paint order rebuild.
pub const TOPOLOGY: Channel = Channel::new(2);
