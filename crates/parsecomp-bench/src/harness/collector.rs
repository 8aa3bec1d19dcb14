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

//! Hardware performance counter collection.
//!
//! Counter access goes through the [`CounterBackend`] trait. On Linux the
//! backend is a `perf_event` group of five hardware counters (cycles,
//! instructions, branch misses, cache references, cache misses); everywhere
//! else [`NoCounters`] reports the facility as unsupported. Callers only see
//! [`CounterCollector::capability_available`] and never need to know which
//! platform they run on.
//!
//! Counters are opened inside [`CounterCollector::measure`] and closed when
//! the backend is dropped, on every exit path including a panicking
//! candidate.

use crate::core::config::CacheEventBasis;
use crate::core::registry::Candidate;
use crate::error::{BenchError, Result};
use crate::fixtures::{Corpus, ScratchBuffer};
use crate::harness::runner::fault;
use serde::Serialize;
use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};

/// Raw counter deltas for one measured region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSample {
    /// CPU cycles.
    pub cycles: u64,
    /// Retired instructions.
    pub instructions: u64,
    /// Mispredicted branches.
    pub branch_misses: u64,
    /// Cache references.
    pub cache_references: u64,
    /// Cache misses.
    pub cache_misses: u64,
}

impl CounterSample {
    /// Adds `other` into `self`, saturating on overflow.
    pub fn accumulate(&mut self, other: &CounterSample) {
        self.cycles = self.cycles.saturating_add(other.cycles);
        self.instructions = self.instructions.saturating_add(other.instructions);
        self.branch_misses = self.branch_misses.saturating_add(other.branch_misses);
        self.cache_references = self.cache_references.saturating_add(other.cache_references);
        self.cache_misses = self.cache_misses.saturating_add(other.cache_misses);
    }
}

/// Capability-checked access to hardware counters.
pub trait CounterBackend {
    /// Returns whether this backend can count anything.
    fn is_supported(&self) -> bool;

    /// Zeroes and starts the counters.
    fn start(&mut self) -> Result<()>;

    /// Stops the counters and returns the deltas since [`CounterBackend::start`].
    fn stop(&mut self) -> Result<CounterSample>;
}

/// Backend for platforms without counter support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCounters;

impl CounterBackend for NoCounters {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<CounterSample> {
        Ok(CounterSample::default())
    }
}

#[cfg(target_os = "linux")]
pub use linux::PerfCounters;

#[cfg(target_os = "linux")]
mod linux {
    use super::{CounterBackend, CounterSample};
    use crate::error::{BenchError, Result};
    use perf_event::events::Hardware;
    use perf_event::{Builder, Counter, Group};

    /// A `perf_event` group scheduled onto the PMU as a unit.
    ///
    /// Only user-space events of the calling thread are counted.
    pub struct PerfCounters {
        group: Group,
        cycles: Counter,
        instructions: Counter,
        branch_misses: Counter,
        cache_references: Counter,
        cache_misses: Counter,
    }

    impl PerfCounters {
        /// Opens the counter group.
        ///
        /// # Errors
        ///
        /// Returns [`BenchError::CounterUnavailable`] when the kernel refuses
        /// the events, typically because of `perf_event_paranoid` or a
        /// virtualized PMU.
        pub fn open() -> Result<Self> {
            let mut group = Group::new().map_err(unavailable)?;
            let cycles = open_member(&mut group, Hardware::CPU_CYCLES)?;
            let instructions = open_member(&mut group, Hardware::INSTRUCTIONS)?;
            let branch_misses = open_member(&mut group, Hardware::BRANCH_MISSES)?;
            let cache_references = open_member(&mut group, Hardware::CACHE_REFERENCES)?;
            let cache_misses = open_member(&mut group, Hardware::CACHE_MISSES)?;

            Ok(Self {
                group,
                cycles,
                instructions,
                branch_misses,
                cache_references,
                cache_misses,
            })
        }
    }

    fn open_member(group: &mut Group, event: Hardware) -> Result<Counter> {
        Builder::new()
            .group(group)
            .kind(event)
            .build()
            .map_err(unavailable)
    }

    fn unavailable(err: std::io::Error) -> BenchError {
        BenchError::CounterUnavailable(err.to_string())
    }

    impl CounterBackend for PerfCounters {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&mut self) -> Result<()> {
            self.group
                .reset()
                .map_err(|e| BenchError::counter("reset", e))?;
            self.group
                .enable()
                .map_err(|e| BenchError::counter("enable", e))
        }

        fn stop(&mut self) -> Result<CounterSample> {
            self.group
                .disable()
                .map_err(|e| BenchError::counter("disable", e))?;
            let counts = self
                .group
                .read()
                .map_err(|e| BenchError::counter("read", e))?;

            if counts.time_running() == 0 {
                return Err(BenchError::Counter {
                    message: "counter group was never scheduled on the PMU".to_string(),
                });
            }

            Ok(CounterSample {
                cycles: counts[&self.cycles],
                instructions: counts[&self.instructions],
                branch_misses: counts[&self.branch_misses],
                cache_references: counts[&self.cache_references],
                cache_misses: counts[&self.cache_misses],
            })
        }
    }
}

/// Opens the best backend for this platform.
///
/// # Errors
///
/// Returns [`BenchError::CounterUnavailable`] when the platform or the
/// current privileges do not allow counting.
pub fn open_backend() -> Result<Box<dyn CounterBackend>> {
    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(PerfCounters::open()?))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Err(BenchError::CounterUnavailable(
            "hardware counters are only supported on Linux".to_string(),
        ))
    }
}

/// Counter totals averaged over a candidate's trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardwareCounterSample {
    /// Number of measured invocations.
    pub repeat_count: u64,
    /// Logical corpus size in bytes.
    pub volume: usize,
    /// Average cycles per invocation.
    pub cycles: f64,
    /// Average retired instructions per invocation.
    pub instructions: f64,
    /// Average branch misses per invocation.
    pub branch_misses: f64,
    /// Average cache references per invocation.
    pub cache_references: f64,
    /// Average cache misses per invocation.
    pub cache_misses: f64,
    /// Invocations whose result differed from the expected one.
    pub mismatches: u64,
}

impl HardwareCounterSample {
    /// Averages `totals` over `repeat_count` invocations.
    pub fn from_totals(
        totals: &CounterSample,
        repeat_count: u64,
        volume: usize,
        mismatches: u64,
    ) -> Self {
        let n = repeat_count.max(1) as f64;
        Self {
            repeat_count,
            volume,
            cycles: totals.cycles as f64 / n,
            instructions: totals.instructions as f64 / n,
            branch_misses: totals.branch_misses as f64 / n,
            cache_references: totals.cache_references as f64 / n,
            cache_misses: totals.cache_misses as f64 / n,
            mismatches,
        }
    }

    /// Retired instructions per cycle.
    pub fn instructions_per_cycle(&self) -> f64 {
        self.instructions / self.cycles
    }

    /// Retired instructions per input byte.
    pub fn instructions_per_byte(&self) -> f64 {
        self.instructions / self.volume as f64
    }

    /// Input bytes per cache event, with the denominator chosen by `basis`.
    pub fn bytes_per_cache_event(&self, basis: CacheEventBasis) -> f64 {
        let events = match basis {
            CacheEventBasis::Misses => self.cache_misses,
            CacheEventBasis::References => self.cache_references,
        };
        self.volume as f64 / events
    }
}

/// Runs candidates under hardware counters when the platform allows it.
#[derive(Debug, Clone)]
pub struct CounterCollector {
    unavailable: Option<String>,
}

impl CounterCollector {
    /// Probes the platform by opening, then immediately closing, the counters.
    pub fn detect() -> Self {
        match open_backend() {
            Ok(backend) if backend.is_supported() => Self { unavailable: None },
            Ok(_) => Self::disabled("backend reports no support"),
            Err(err) => {
                tracing::debug!(error = %err, "hardware counters unavailable");
                Self::disabled(err.to_string())
            }
        }
    }

    /// Creates a collector that never measures.
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
        }
    }

    /// Returns whether [`CounterCollector::measure`] can be called.
    pub fn capability_available(&self) -> bool {
        self.unavailable.is_none()
    }

    /// Returns why counters are unavailable, if they are.
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    /// Measures `candidate` over `repeat_count` invocations.
    ///
    /// The counters are opened for the duration of this call only.
    ///
    /// # Errors
    ///
    /// - [`BenchError::CounterUnavailable`] if the capability is absent
    /// - [`BenchError::Counter`] if a counter control call fails
    /// - [`BenchError::CandidateFault`] if the candidate panics
    pub fn measure(
        &self,
        candidate: &mut Candidate,
        corpus: &Corpus,
        scratch: &mut ScratchBuffer,
        repeat_count: u64,
    ) -> Result<HardwareCounterSample> {
        if let Some(reason) = &self.unavailable {
            return Err(BenchError::CounterUnavailable(reason.clone()));
        }
        let mut backend = open_backend()?;
        measure_with(backend.as_mut(), candidate, corpus, scratch, repeat_count)
    }
}

/// Measures `candidate` with an explicit backend.
///
/// Per trial: reset, start counters, invoke, stop counters, accumulate.
/// Unexpected results are counted in the sample but do not invalidate it.
pub fn measure_with<B>(
    backend: &mut B,
    candidate: &mut Candidate,
    corpus: &Corpus,
    scratch: &mut ScratchBuffer,
    repeat_count: u64,
) -> Result<HardwareCounterSample>
where
    B: CounterBackend + ?Sized,
{
    if !backend.is_supported() {
        return Err(BenchError::CounterUnavailable(
            "backend reports no support".to_string(),
        ));
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<(CounterSample, u64)> {
        let expected = candidate.expected_for(corpus);
        let mut totals = CounterSample::default();
        let mut mismatches = 0u64;

        for _ in 0..repeat_count {
            candidate.reset(corpus, scratch);
            backend.start()?;
            let observed = black_box(candidate.invoke(corpus, scratch));
            let delta = backend.stop()?;
            totals.accumulate(&delta);

            if observed != expected {
                mismatches += 1;
            }
        }
        Ok((totals, mismatches))
    }));

    let (totals, mismatches) = outcome.map_err(|payload| fault(candidate.name(), payload))??;
    if mismatches > 0 {
        tracing::warn!(
            candidate = candidate.name(),
            mismatches,
            "unexpected results during counter collection"
        );
    }

    Ok(HardwareCounterSample::from_totals(
        &totals,
        repeat_count,
        corpus.volume(),
        mismatches,
    ))
}
