// parsecomp - Comparative parser micro-benchmark harness
//
// Copyright (c) 2025 The parsecomp contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Timing primitives and trial statistics.
//!
//! Each trial is bracketed by two [`Timestamp`]s, each pairing a monotonic
//! wall-clock reading with a cycle-counter reading. Samples are folded into a
//! [`SampleAggregate`] as they arrive, so the number of trials never affects
//! memory use.
//!
//! # Statistics
//!
//! The primary statistic is the best (minimum) time: scheduling noise only
//! ever adds time, so the minimum is the tightest observed bound on the true
//! cost. The dispersion reported next to it is `mean - best`. Converted to
//! throughput this equals the gap between the best-case and the average-case
//! rate, which is what the error margin columns show.

use serde::Serialize;
use std::sync::atomic::{compiler_fence, Ordering};
use std::time::{Duration, Instant};

/// Unit of the cycle counter on this target.
#[cfg(target_arch = "x86_64")]
pub const CYCLE_UNIT: &str = "cycles";

/// Unit of the cycle counter on this target.
#[cfg(not(target_arch = "x86_64"))]
pub const CYCLE_UNIT: &str = "ns";

/// Reads the time-stamp counter between two `lfence`s.
///
/// The fences keep earlier instructions from retiring after the read and
/// later ones from starting before it.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
#[allow(unused_unsafe)]
pub fn read_cycle_counter() -> u64 {
    use std::arch::x86_64::{_mm_lfence, _rdtsc};

    // SAFETY: LFENCE and RDTSC are available on every x86_64 CPU (SSE2 is
    // baseline) and have no memory effects.
    unsafe {
        _mm_lfence();
        let tsc = _rdtsc();
        _mm_lfence();
        tsc
    }
}

/// Reads nanoseconds since the first call; stands in for cycles off x86_64.
#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub fn read_cycle_counter() -> u64 {
    use std::sync::OnceLock;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

/// A paired wall-clock and cycle-counter reading.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: Instant,
    cycles: u64,
}

impl Timestamp {
    /// Takes the opening timestamp of an interval.
    ///
    /// The cycle counter is read last, so the wall-clock read is not charged
    /// to the cycle delta.
    #[inline(always)]
    pub fn now() -> Self {
        compiler_fence(Ordering::SeqCst);
        let instant = Instant::now();
        let cycles = read_cycle_counter();
        compiler_fence(Ordering::SeqCst);
        Self { instant, cycles }
    }

    /// Takes the closing timestamp of an interval.
    ///
    /// Mirror image of [`Timestamp::now`]: the cycle counter is read first,
    /// so both deltas bracket only the work in between.
    #[inline(always)]
    pub fn end_now() -> Self {
        compiler_fence(Ordering::SeqCst);
        let cycles = read_cycle_counter();
        let instant = Instant::now();
        compiler_fence(Ordering::SeqCst);
        Self { instant, cycles }
    }

    /// Returns the sample spanning from `self` to `end`.
    pub fn until(&self, end: &Timestamp) -> TrialSample {
        TrialSample {
            elapsed: end.instant.saturating_duration_since(self.instant),
            cycles: end.cycles.saturating_sub(self.cycles),
        }
    }
}

/// Elapsed time and cycles of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrialSample {
    /// Wall-clock duration.
    pub elapsed: Duration,
    /// Cycle-counter delta.
    pub cycles: u64,
}

impl TrialSample {
    /// Creates a sample from explicit values.
    pub fn new(elapsed: Duration, cycles: u64) -> Self {
        Self { elapsed, cycles }
    }
}

/// Running reduction over trial samples.
///
/// Best time and best cycles are tracked independently; on a loaded machine
/// the two minima can come from different trials.
#[derive(Debug, Clone, Default)]
pub struct SampleAggregate {
    count: u64,
    best_time: Option<Duration>,
    best_cycles: Option<u64>,
    total_nanos: u128,
    total_cycles: u128,
}

impl SampleAggregate {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one sample in.
    #[inline]
    pub fn push(&mut self, sample: TrialSample) {
        self.count += 1;
        self.total_nanos += sample.elapsed.as_nanos();
        self.total_cycles += u128::from(sample.cycles);
        self.best_time = Some(match self.best_time {
            Some(best) => best.min(sample.elapsed),
            None => sample.elapsed,
        });
        self.best_cycles = Some(match self.best_cycles {
            Some(best) => best.min(sample.cycles),
            None => sample.cycles,
        });
    }

    /// Number of samples folded so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Produces the final statistics for a corpus of `volume` bytes.
    pub fn finish(&self, volume: usize, mismatches: u64) -> TrialStatistics {
        if self.count == 0 {
            return TrialStatistics {
                repeat_count: 0,
                volume,
                best_time: Duration::ZERO,
                mean_time: Duration::ZERO,
                dispersion: Duration::ZERO,
                best_cycles: 0,
                mean_cycles: 0,
                dispersion_cycles: 0,
                mismatches,
            };
        }

        let count = u128::from(self.count);
        let best_time = self.best_time.unwrap_or_default();
        let best_cycles = self.best_cycles.unwrap_or_default();
        let mean_time = duration_from_nanos(self.total_nanos / count);
        let mean_cycles = u64::try_from(self.total_cycles / count).unwrap_or(u64::MAX);

        TrialStatistics {
            repeat_count: self.count,
            volume,
            best_time,
            mean_time,
            dispersion: mean_time.saturating_sub(best_time),
            best_cycles,
            mean_cycles,
            dispersion_cycles: mean_cycles.saturating_sub(best_cycles),
            mismatches,
        }
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % 1_000_000_000) as u32)
}

/// Reduced timing statistics for one candidate on one corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialStatistics {
    /// Number of completed trials.
    pub repeat_count: u64,
    /// Logical corpus size in bytes.
    pub volume: usize,
    /// Minimum wall-clock time over all trials.
    pub best_time: Duration,
    /// Mean wall-clock time over all trials.
    pub mean_time: Duration,
    /// `mean_time - best_time`.
    pub dispersion: Duration,
    /// Minimum cycle count over all trials.
    pub best_cycles: u64,
    /// Mean cycle count over all trials.
    pub mean_cycles: u64,
    /// `mean_cycles - best_cycles`.
    pub dispersion_cycles: u64,
    /// Number of trials whose result differed from the expected one.
    pub mismatches: u64,
}

impl TrialStatistics {
    /// Derives normalized throughput from the best observations.
    pub fn throughput(&self) -> ThroughputMetrics {
        ThroughputMetrics::derive(self)
    }
}

/// Throughput derived from [`TrialStatistics`].
///
/// An empty corpus or a zero best time yields non-finite values, which the
/// reporters print as `NaN`/`inf`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughputMetrics {
    /// `best_cycles / volume`.
    pub cycles_per_byte: f64,
    /// `dispersion_cycles / volume`.
    pub cycles_per_byte_err: f64,
    /// `volume / (best_seconds × 1e9)`.
    pub gigabytes_per_second: f64,
    /// Best-case rate minus mean-case rate.
    pub gigabytes_per_second_err: f64,
}

impl ThroughputMetrics {
    /// Computes throughput from trial statistics.
    pub fn derive(stats: &TrialStatistics) -> Self {
        let volume = stats.volume as f64;
        let best_gbs = gigabytes_per_second(stats.volume, stats.best_time.as_secs_f64());
        let mean_gbs = gigabytes_per_second(stats.volume, stats.mean_time.as_secs_f64());

        Self {
            cycles_per_byte: stats.best_cycles as f64 / volume,
            cycles_per_byte_err: stats.dispersion_cycles as f64 / volume,
            gigabytes_per_second: best_gbs,
            gigabytes_per_second_err: best_gbs - mean_gbs,
        }
    }
}

/// `volume / (seconds × 1e9)`.
pub fn gigabytes_per_second(volume: usize, seconds: f64) -> f64 {
    volume as f64 / (seconds * 1e9)
}
