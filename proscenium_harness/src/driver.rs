// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall-clock frame driving.
//!
//! [`FrameDriver`] owns the clock the core deliberately lacks: it reads the
//! stage's requested frame interval, sleeps until each tick is due, and calls
//! [`Stage::run_frame`] with milliseconds since the driver was created.
//! Listeners can stop the loop from inside a frame by calling
//! [`Stage::set_frame_rate`] with `None`.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use proscenium_core::error::Error;
use proscenium_core::scene::Stage;

/// Drives a stage's frame loop from the wall clock.
#[derive(Debug)]
pub struct FrameDriver {
    epoch: Instant,
    next_due: Option<Instant>,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    /// Creates a driver; timestamps are measured from this moment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            next_due: None,
        }
    }

    /// Milliseconds elapsed since the driver was created.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Runs up to `frames` paced frames; returns how many actually ran.
    ///
    /// Stops early when the stage is not ticking (no frame rate requested, or
    /// a listener stopped the loop mid-run).
    ///
    /// # Errors
    ///
    /// Propagates the first frame error; the loop does not retry.
    pub fn run(&mut self, stage: &mut Stage, frames: u64) -> Result<u64, Error> {
        let mut ran = 0;
        while ran < frames {
            let Some(interval_ms) = stage.frame_interval_ms() else {
                debug!(ran, "stage stopped ticking");
                break;
            };
            let due = self.next_due.unwrap_or_else(Instant::now);
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
            let timestamp_ms = self.now_ms();
            trace!(
                frame = stage.frame_count() + 1,
                t_ms = timestamp_ms,
                "tick"
            );
            stage.run_frame(timestamp_ms)?;
            ran += 1;
            // Schedule from the previous due time, not from now, so oversleep
            // in one frame does not accumulate.
            self.next_due = Some(due + Duration::from_secs_f64(interval_ms / 1000.0));
        }
        Ok(ran)
    }

    /// Runs one immediate frame, ignoring pacing state.
    ///
    /// # Errors
    ///
    /// Propagates the frame error.
    pub fn step(&mut self, stage: &mut Stage) -> Result<(), Error> {
        let timestamp_ms = self.now_ms();
        stage.run_frame(timestamp_ms)
    }
}
