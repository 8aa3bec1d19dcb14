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

//! Comparative parser micro-benchmark harness.
//!
//! Measures how fast several parser implementations process the same input
//! file and reports cycles per byte and GB/s for each of them.
//!
//! ## Features
//!
//! - **Trial runner**: repeat-until-volume loop with reset actions and
//!   result validation
//! - **Hardware counters**: cycles, instructions, branch and cache events
//!   on Linux
//! - **Reporters**: narrative, fixed-column table and JSON output
//!
//! ## Usage
//!
//! ```no_run
//! use parsecomp_bench::core::{BenchConfig, Candidate, CandidateRegistry, OutputMode, Outcome};
//! use parsecomp_bench::harness::{BenchmarkDriver, CounterCollector};
//! use parsecomp_bench::reporters::reporter_for;
//!
//! let mut registry = CandidateRegistry::new();
//! registry.register(Candidate::new("non-empty", |corpus, _| {
//!     Outcome::Flag(!corpus.is_empty())
//! }))?;
//!
//! let config = BenchConfig::new(OutputMode::Table);
//! let mut reporter = reporter_for(config.mode, std::io::stdout());
//! let mut driver = BenchmarkDriver::new(config, registry, CounterCollector::detect())?;
//! let summary = driver.run_all(&["twitter.json"], reporter.as_mut())?;
//! assert!(summary.exit_success());
//! # Ok::<(), parsecomp_bench::BenchError>(())
//! ```

pub mod core;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod reporters;

pub use error::{BenchError, Result};
pub use fixtures::{Corpus, ScratchBuffer};
