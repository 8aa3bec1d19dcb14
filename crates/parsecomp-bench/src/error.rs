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

//! Error types for benchmarking operations.
//!
//! Errors fall into two groups. Load failures ([`BenchError::CorpusLoad`],
//! [`BenchError::CorpusTooLarge`]) make the whole run fail once every file
//! has been attempted. Candidate failures ([`BenchError::ResultMismatch`],
//! [`BenchError::CandidateFault`]) are soft: they are surfaced in the report
//! but never abort the remaining candidates.

use crate::core::measurement::TrialStatistics;
use crate::core::registry::Outcome;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for benchmarking operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur while loading corpora, running candidates or
/// collecting hardware counters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchError {
    /// Input file is missing or unreadable.
    #[error("Could not load the file '{path}': {message}")]
    CorpusLoad {
        /// The file path that failed to load
        path: PathBuf,
        /// The underlying error message
        message: String,
    },

    /// Input file exceeds the configured maximum corpus size.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes")]
    CorpusTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed size in bytes
        max: u64,
    },

    /// A candidate returned a value other than its expected result.
    ///
    /// The trial loop still runs to completion; `statistics` holds the
    /// timings so the report can show them next to the fault marker.
    #[error("Candidate '{candidate}' returned {observed}, expected {expected} ({mismatches} mismatching trials)")]
    ResultMismatch {
        /// Candidate name
        candidate: String,
        /// Expected result
        expected: Outcome,
        /// First observed result that differed
        observed: Outcome,
        /// Number of trials whose result differed
        mismatches: u64,
        /// Statistics from the completed trial loop
        statistics: Box<TrialStatistics>,
    },

    /// A candidate panicked while being measured.
    #[error("Candidate '{candidate}' faulted: {message}")]
    CandidateFault {
        /// Candidate name
        candidate: String,
        /// Panic payload or failure description
        message: String,
    },

    /// Hardware counters cannot be used on this platform or permission level.
    #[error("Hardware counters unavailable: {0}")]
    CounterUnavailable(String),

    /// A counter control call failed after the counters were opened.
    #[error("Hardware counter error: {message}")]
    Counter {
        /// Error message
        message: String,
    },

    /// Invalid configuration parameter
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Writing a report failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl BenchError {
    /// Create a load error with file path context.
    pub fn corpus_load(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::CorpusLoad {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a counter control error.
    pub fn counter(operation: &str, source: io::Error) -> Self {
        Self::Counter {
            message: format!("{}: {}", operation, source),
        }
    }

    /// Returns whether this error means an input file was skipped.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::CorpusLoad { .. } | Self::CorpusTooLarge { .. })
    }

    /// Returns whether this error is a per-candidate correctness fault.
    pub fn is_candidate_failure(&self) -> bool {
        matches!(self, Self::ResultMismatch { .. } | Self::CandidateFault { .. })
    }
}

impl From<io::Error> for BenchError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}
