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

//! Trial runner for executing candidates and reducing their timings.

use crate::core::config::BenchConfig;
use crate::core::measurement::{SampleAggregate, Timestamp, TrialStatistics};
use crate::core::registry::{Candidate, Outcome};
use crate::error::{BenchError, Result};
use crate::fixtures::{Corpus, ScratchBuffer};
use crate::harness::collector::{CounterCollector, HardwareCounterSample};
use std::any::Any;
use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};

/// Runs candidates against a corpus and reduces per-trial timings.
///
/// The runner owns the scratch buffer lent to candidates, so one candidate's
/// in-place mutations can never be observed by another candidate mid-run.
#[derive(Debug)]
pub struct TrialRunner {
    config: BenchConfig,
    scratch: ScratchBuffer,
}

impl TrialRunner {
    /// Creates a new runner with the specified configuration.
    pub fn new(config: BenchConfig) -> Self {
        Self {
            config,
            scratch: ScratchBuffer::new(),
        }
    }

    /// Returns the runner configuration.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Returns the number of trials used for `corpus`.
    pub fn repeat_count(&self, corpus: &Corpus) -> u64 {
        self.config.repeat_count(corpus.volume())
    }

    /// Returns the scratch buffer as left by the last trial.
    pub fn scratch(&self) -> &ScratchBuffer {
        &self.scratch
    }

    /// Measures `candidate` on `corpus`.
    ///
    /// Every trial is reset, timestamped, invoked, timestamped and checked in
    /// that order. A wrong result does not stop the loop: the statistics are
    /// completed and returned inside [`BenchError::ResultMismatch`].
    ///
    /// # Errors
    ///
    /// - [`BenchError::ResultMismatch`] if any trial returned an unexpected value
    /// - [`BenchError::CandidateFault`] if the candidate panicked
    pub fn run(&mut self, candidate: &mut Candidate, corpus: &Corpus) -> Result<TrialStatistics> {
        let repeat = self.repeat_count(corpus);
        self.scratch.restore_from(corpus);

        tracing::debug!(
            candidate = candidate.name(),
            repeat,
            volume = corpus.volume(),
            "running trials"
        );

        let scratch = &mut self.scratch;
        let trials = panic::catch_unwind(AssertUnwindSafe(|| {
            let expected = candidate.expected_for(corpus);
            let mut aggregate = SampleAggregate::new();
            let mut mismatches = 0u64;
            let mut first_mismatch: Option<Outcome> = None;

            for _ in 0..repeat {
                candidate.reset(corpus, scratch);
                let start = Timestamp::now();
                let observed = black_box(candidate.invoke(corpus, scratch));
                let end = Timestamp::end_now();
                aggregate.push(start.until(&end));

                if observed != expected {
                    mismatches += 1;
                    first_mismatch.get_or_insert(observed);
                }
            }

            (expected, aggregate, mismatches, first_mismatch)
        }));

        let (expected, aggregate, mismatches, first_mismatch) =
            trials.map_err(|payload| fault(candidate.name(), payload))?;

        let statistics = aggregate.finish(corpus.volume(), mismatches);
        match first_mismatch {
            None => Ok(statistics),
            Some(observed) => {
                tracing::warn!(
                    candidate = candidate.name(),
                    %expected,
                    %observed,
                    mismatches,
                    "candidate returned an unexpected result"
                );
                Err(BenchError::ResultMismatch {
                    candidate: candidate.name().to_string(),
                    expected,
                    observed,
                    mismatches,
                    statistics: Box::new(statistics),
                })
            }
        }
    }

    /// Collects averaged hardware counters for `candidate` on `corpus`.
    ///
    /// Uses the same repeat count and scratch buffer as [`TrialRunner::run`].
    pub fn profile(
        &mut self,
        candidate: &mut Candidate,
        corpus: &Corpus,
        collector: &CounterCollector,
    ) -> Result<HardwareCounterSample> {
        let repeat = self.repeat_count(corpus);
        self.scratch.restore_from(corpus);
        collector.measure(candidate, corpus, &mut self.scratch, repeat)
    }
}

/// Converts a panic payload into a candidate fault.
pub(crate) fn fault(candidate: &str, payload: Box<dyn Any + Send>) -> BenchError {
    let message = if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "candidate panicked".to_string()
    };

    tracing::warn!(candidate, %message, "candidate faulted");
    BenchError::CandidateFault {
        candidate: candidate.to_string(),
        message,
    }
}
