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

//! Report types and structures.
//!
//! A [`FileReport`] is built incrementally by the driver while it walks the
//! registry, so streaming reporters and whole-document reporters consume the
//! same data.

use crate::core::config::CacheEventBasis;
use crate::core::measurement::{ThroughputMetrics, TrialStatistics};
use crate::core::registry::Outcome;
use crate::error::{BenchError, Result};
use crate::harness::collector::HardwareCounterSample;
use serde::Serialize;
use std::path::Path;

/// How a candidate's measurement ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateStatus {
    /// Every trial returned the expected result.
    Measured,
    /// At least one trial returned something else.
    Mismatch {
        /// Expected result.
        expected: Outcome,
        /// First differing result.
        observed: Outcome,
        /// Number of differing trials.
        mismatches: u64,
    },
    /// The candidate panicked.
    Faulted {
        /// Panic message.
        message: String,
    },
}

impl CandidateStatus {
    /// Returns whether the candidate produced trustworthy numbers.
    pub fn is_measured(&self) -> bool {
        matches!(self, CandidateStatus::Measured)
    }

    /// Returns the marker printed before the name in narrative output.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            CandidateStatus::Measured => None,
            CandidateStatus::Mismatch { .. } => Some("MISMATCH:"),
            CandidateStatus::Faulted { .. } => Some("FAULT:"),
        }
    }
}

/// Result of one candidate on one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateReport {
    /// Candidate name.
    pub name: String,
    /// Outcome of the measurement.
    #[serde(flatten)]
    pub status: CandidateStatus,
    /// Timing statistics; absent when the candidate faulted.
    pub statistics: Option<TrialStatistics>,
    /// Derived throughput; absent when the candidate faulted.
    pub throughput: Option<ThroughputMetrics>,
}

impl CandidateReport {
    /// Builds a report entry from a trial-runner result.
    ///
    /// Errors other than candidate failures are passed back to the caller.
    pub fn from_result(name: &str, result: Result<TrialStatistics>) -> Result<Self> {
        match result {
            Ok(statistics) => Ok(Self::measured(name, statistics)),
            Err(BenchError::ResultMismatch {
                expected,
                observed,
                mismatches,
                statistics,
                ..
            }) => {
                let throughput = statistics.throughput();
                Ok(Self {
                    name: name.to_string(),
                    status: CandidateStatus::Mismatch {
                        expected,
                        observed,
                        mismatches,
                    },
                    statistics: Some(*statistics),
                    throughput: Some(throughput),
                })
            }
            Err(BenchError::CandidateFault { message, .. }) => Ok(Self {
                name: name.to_string(),
                status: CandidateStatus::Faulted { message },
                statistics: None,
                throughput: None,
            }),
            Err(other) => Err(other),
        }
    }

    /// Builds a successful report entry.
    pub fn measured(name: &str, statistics: TrialStatistics) -> Self {
        let throughput = statistics.throughput();
        Self {
            name: name.to_string(),
            status: CandidateStatus::Measured,
            statistics: Some(statistics),
            throughput: Some(throughput),
        }
    }

    /// Returns the throughput only when the measurement can be trusted.
    pub fn trusted_throughput(&self) -> Option<&ThroughputMetrics> {
        if self.status.is_measured() {
            self.throughput.as_ref()
        } else {
            None
        }
    }
}

/// Hardware-counter deep-dive for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterProfile {
    /// Candidate name.
    pub name: String,
    /// Averaged counter values.
    pub sample: HardwareCounterSample,
    /// Denominator used for `bytes_per_cache_event`.
    pub basis: CacheEventBasis,
    /// Input bytes per cache event.
    pub bytes_per_cache_event: f64,
    /// Retired instructions per cycle.
    pub instructions_per_cycle: f64,
    /// Retired instructions per input byte.
    pub instructions_per_byte: f64,
}

impl CounterProfile {
    /// Computes the derived diagnostics for `sample`.
    pub fn new(name: &str, sample: HardwareCounterSample, basis: CacheEventBasis) -> Self {
        Self {
            name: name.to_string(),
            bytes_per_cache_event: sample.bytes_per_cache_event(basis),
            instructions_per_cycle: sample.instructions_per_cycle(),
            instructions_per_byte: sample.instructions_per_byte(),
            sample,
            basis,
        }
    }
}

/// Everything measured for one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Input path as given on the command line.
    pub path: String,
    /// Logical corpus size in bytes.
    pub volume: usize,
    /// Human-readable size, e.g. `617 KB`.
    pub size_label: String,
    /// Trials per candidate.
    pub repeat_count: u64,
    /// Unit of the cycle columns.
    pub cycle_unit: &'static str,
    /// Candidate results in registration order.
    pub candidates: Vec<CandidateReport>,
    /// Counter profiles of the deep-dive candidates, if collected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub counters: Vec<CounterProfile>,
}

impl FileReport {
    /// Creates an empty report for a loaded file.
    pub fn new(
        path: &Path,
        volume: usize,
        size_label: String,
        repeat_count: u64,
        cycle_unit: &'static str,
    ) -> Self {
        Self {
            path: path.display().to_string(),
            volume,
            size_label,
            repeat_count,
            cycle_unit,
            candidates: Vec::new(),
            counters: Vec::new(),
        }
    }

    /// Returns the entry for candidate `name`.
    pub fn candidate(&self, name: &str) -> Option<&CandidateReport> {
        self.candidates.iter().find(|c| c.name == name)
    }

    /// Returns the number of candidates that mismatched or faulted.
    pub fn failure_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| !c.status.is_measured())
            .count()
    }
}
