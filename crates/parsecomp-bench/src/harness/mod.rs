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

//! Benchmark execution.
//!
//! # Modules
//!
//! - `runner`: Timed trial loop and statistics reduction
//! - `collector`: Hardware performance counters
//! - `driver`: Per-file orchestration over the candidate registry

pub mod collector;
pub mod driver;
pub mod runner;

pub use collector::{
    open_backend, CounterBackend, CounterCollector, CounterSample, HardwareCounterSample,
    NoCounters,
};
#[cfg(target_os = "linux")]
pub use collector::PerfCounters;
pub use driver::{BenchmarkDriver, RunSummary};
pub use runner::TrialRunner;
