// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-pacing metrics and grading.

/// Per-frame sample fed into [`PacingTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct PacingSample {
    /// Achieved delta since the previous frame, in milliseconds.
    pub frame_delta_ms: f64,
    /// Interval the stage requested, in milliseconds.
    pub interval_ms: f64,
}

/// Letter grade for pacing quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacingGrade {
    /// Tight pacing and low miss rate.
    A,
    /// Good pacing with moderate misses.
    B,
    /// Degraded but usable.
    C,
    /// Poor pacing.
    D,
}

impl PacingGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`PacingTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct PacingReport {
    /// Current grade.
    pub grade: PacingGrade,
    /// Misses per 1000 observed frames.
    pub miss_rate_per_1000: f64,
    /// Mean frame delta over the ring buffer, in milliseconds.
    pub mean_delta_ms: f64,
    /// Total frames observed.
    pub total_frames: u64,
    /// Total misses observed.
    pub missed_frames: u64,
}

/// Rolling pacing tracker with fixed-size frame-delta history.
///
/// A frame *misses* when its delta exceeds 1.5× the requested interval.
#[derive(Debug)]
pub struct PacingTracker<const N: usize> {
    deltas_ms: [f64; N],
    cursor: usize,
    total_frames: u64,
    missed_frames: u64,
}

impl<const N: usize> Default for PacingTracker<N> {
    fn default() -> Self {
        Self::new(16.67)
    }
}

impl<const N: usize> PacingTracker<N> {
    /// Creates a tracker with `seed_delta_ms` prefilled in the ring buffer.
    #[must_use]
    pub const fn new(seed_delta_ms: f64) -> Self {
        Self {
            deltas_ms: [seed_delta_ms; N],
            cursor: 0,
            total_frames: 0,
            missed_frames: 0,
        }
    }

    /// Observes one frame and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, sample: PacingSample) -> PacingReport {
        self.total_frames = self.total_frames.saturating_add(1);
        self.deltas_ms[self.cursor % N] = sample.frame_delta_ms;
        self.cursor = (self.cursor + 1) % N;

        if sample.frame_delta_ms > sample.interval_ms * 1.5 {
            self.missed_frames = self.missed_frames.saturating_add(1);
        }

        let miss_rate = if self.total_frames == 0 {
            0.0
        } else {
            self.missed_frames as f64 * 1000.0 / self.total_frames as f64
        };

        let mean = self.deltas_ms.iter().sum::<f64>() / N as f64;
        let error_ratio = if sample.interval_ms > 0.0 {
            ((mean - sample.interval_ms) / sample.interval_ms).abs()
        } else {
            0.0
        };

        PacingReport {
            grade: grade_for(error_ratio, miss_rate),
            miss_rate_per_1000: miss_rate,
            mean_delta_ms: mean,
            total_frames: self.total_frames,
            missed_frames: self.missed_frames,
        }
    }

    /// Returns ring-buffer frame deltas oldest→newest.
    #[must_use]
    pub fn frame_deltas(&self) -> [f64; N] {
        let mut out = [0.0; N];
        let mut i = 0;
        while i < N {
            let idx = (self.cursor + i) % N;
            out[i] = self.deltas_ms[idx];
            i += 1;
        }
        out
    }

    /// Returns an ASCII sparkline over `frame_deltas()`.
    #[must_use]
    pub fn sparkline_ascii(&self, min_ms: f64, max_ms: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(N);
        let mut i = 0;
        while i < N {
            let idx = (self.cursor + i) % N;
            let v = self.deltas_ms[idx].clamp(min_ms, max_ms);
            let t = (v - min_ms) / (max_ms - min_ms);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level] as char);
            i += 1;
        }
        out
    }
}

fn grade_for(mean_error_ratio: f64, miss_rate_per_1000: f64) -> PacingGrade {
    if mean_error_ratio < 0.05 && miss_rate_per_1000 < 5.0 {
        PacingGrade::A
    } else if mean_error_ratio < 0.15 && miss_rate_per_1000 < 30.0 {
        PacingGrade::B
    } else if mean_error_ratio < 0.30 && miss_rate_per_1000 < 100.0 {
        PacingGrade::C
    } else {
        PacingGrade::D
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_rate_accumulates() {
        let mut t = PacingTracker::<8>::new(16.67);
        let mut i = 0;
        while i < 10 {
            let report = t.observe(PacingSample {
                frame_delta_ms: if i < 2 { 40.0 } else { 16.7 },
                interval_ms: 16.67,
            });
            if i == 9 {
                assert!((report.miss_rate_per_1000 - 200.0).abs() < 1e-6);
            }
            i += 1;
        }
    }

    #[test]
    fn steady_pacing_grades_a() {
        let mut t = PacingTracker::<8>::new(16.67);
        let mut grade = PacingGrade::D;
        for _ in 0..20 {
            grade = t
                .observe(PacingSample {
                    frame_delta_ms: 16.7,
                    interval_ms: 16.67,
                })
                .grade;
        }
        assert_eq!(grade, PacingGrade::A);
        assert_eq!(grade.as_str(), "A");
    }

    #[test]
    fn drifting_mean_degrades_the_grade() {
        let mut t = PacingTracker::<4>::new(16.67);
        let mut report = t.observe(PacingSample {
            frame_delta_ms: 20.0,
            interval_ms: 16.67,
        });
        for _ in 0..4 {
            report = t.observe(PacingSample {
                frame_delta_ms: 20.0,
                interval_ms: 16.67,
            });
        }
        assert_ne!(report.grade, PacingGrade::A);
        assert!((report.mean_delta_ms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn sparkline_covers_the_ring() {
        let t = PacingTracker::<12>::new(16.67);
        let line = t.sparkline_ascii(0.0, 33.0);
        assert_eq!(line.len(), 12);
    }
}
