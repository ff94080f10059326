// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-loop driver and pacing metrics for demos and tests.
//!
//! The core never reads a clock; [`driver::FrameDriver`] supplies one,
//! running [`Stage::run_frame`](proscenium_core::scene::Stage::run_frame) on
//! the wall-clock cadence the stage requests. [`pacing::PacingTracker`]
//! grades how well the achieved frame deltas match that cadence.

pub mod driver;
pub mod pacing;
