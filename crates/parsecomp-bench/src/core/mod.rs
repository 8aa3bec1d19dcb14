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

//! Core benchmark infrastructure.
//!
//! # Modules
//!
//! - `config`: Repeat-count policy and output mode
//! - `measurement`: Low-overhead timing and trial statistics
//! - `registry`: Candidates and the ordered candidate registry

pub mod config;
pub mod measurement;
pub mod registry;

pub use config::{repeat_count, BenchConfig, CacheEventBasis, OutputMode, MIN_REPEAT, TARGET_VOLUME};
pub use measurement::{
    gigabytes_per_second, read_cycle_counter, SampleAggregate, ThroughputMetrics, Timestamp,
    TrialSample, TrialStatistics, CYCLE_UNIT,
};
pub use registry::{Candidate, CandidateRegistry, Expectation, Outcome};
