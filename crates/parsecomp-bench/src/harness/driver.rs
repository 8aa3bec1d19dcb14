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

//! Per-file benchmark driver.
//!
//! Loads each corpus once, runs every active candidate through the
//! [`TrialRunner`], optionally profiles the deep-dive candidates with the
//! [`CounterCollector`], and streams everything into a [`Reporter`].

use crate::core::config::BenchConfig;
use crate::core::measurement::CYCLE_UNIT;
use crate::core::registry::CandidateRegistry;
use crate::error::{BenchError, Result};
use crate::fixtures::Corpus;
use crate::harness::collector::CounterCollector;
use crate::harness::runner::TrialRunner;
use crate::reporters::types::{CandidateReport, CandidateStatus, CounterProfile, FileReport};
use crate::reporters::Reporter;
use std::path::{Path, PathBuf};

/// Outcome of a whole run over several files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Files that were loaded and benchmarked.
    pub files_benchmarked: usize,
    /// Files that could not be loaded, with the reason.
    pub load_failures: Vec<(PathBuf, BenchError)>,
    /// Candidate results that mismatched or faulted, over all files.
    pub candidate_failures: usize,
}

impl RunSummary {
    /// Returns whether every file was loaded.
    pub fn exit_success(&self) -> bool {
        self.load_failures.is_empty()
    }
}

/// Drives candidates over input files.
#[derive(Debug)]
pub struct BenchmarkDriver {
    runner: TrialRunner,
    collector: CounterCollector,
    registry: CandidateRegistry,
}

impl BenchmarkDriver {
    /// Creates a driver after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] if the configuration is unusable.
    pub fn new(
        config: BenchConfig,
        registry: CandidateRegistry,
        collector: CounterCollector,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            runner: TrialRunner::new(config),
            collector,
            registry,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BenchConfig {
        self.runner.config()
    }

    /// Returns the candidate registry.
    pub fn registry(&self) -> &CandidateRegistry {
        &self.registry
    }

    /// Returns whether the counter deep-dive will run for loaded files.
    pub fn counters_active(&self) -> bool {
        let config = self.runner.config();
        config.mode.includes_counters()
            && config.counters_enabled
            && self.collector.capability_available()
    }

    /// Benchmarks every file in order.
    ///
    /// A file that fails to load is reported and skipped; the remaining
    /// files still run.
    ///
    /// # Errors
    ///
    /// Only reporter failures abort the run.
    pub fn run_all<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        reporter.begin()?;

        for path in paths {
            let path = path.as_ref();
            match self.bench_file(path, reporter) {
                Ok(file) => {
                    summary.files_benchmarked += 1;
                    summary.candidate_failures += file.failure_count();
                }
                Err(err) if err.is_load_failure() => {
                    tracing::error!(path = %path.display(), error = %err, "skipping input");
                    reporter.skip_file(path, &err)?;
                    summary.load_failures.push((path.to_path_buf(), err));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(summary)
    }

    /// Benchmarks a single file.
    ///
    /// # Errors
    ///
    /// Returns a load error if the file cannot be read, or a reporter error.
    pub fn bench_file(&mut self, path: &Path, reporter: &mut dyn Reporter) -> Result<FileReport> {
        let corpus = Corpus::load(path, self.runner.config().max_corpus_size)?;
        self.bench_corpus(&corpus, reporter)
    }

    /// Benchmarks an already loaded corpus.
    pub fn bench_corpus(&mut self, corpus: &Corpus, reporter: &mut dyn Reporter) -> Result<FileReport> {
        let mode = self.runner.config().mode;
        let basis = self.runner.config().cache_basis;
        let profile_counters = self.counters_active();
        let repeat = self.runner.repeat_count(corpus);

        tracing::info!(
            path = %corpus.path().display(),
            volume = corpus.volume(),
            repeat,
            "benchmarking input"
        );

        let mut file = FileReport::new(
            corpus.path(),
            corpus.volume(),
            corpus.size_label(),
            repeat,
            CYCLE_UNIT,
        );
        reporter.begin_file(&file)?;

        for candidate in self.registry.active_mut(mode) {
            let result = self.runner.run(candidate, corpus);
            let entry = CandidateReport::from_result(candidate.name(), result)?;
            reporter.candidate(&file, &entry)?;
            file.candidates.push(entry);
        }

        if profile_counters {
            let mut started = false;
            for candidate in self.registry.active_mut(mode) {
                if !candidate.deep_dive() {
                    continue;
                }
                let faulted = file
                    .candidate(candidate.name())
                    .map_or(false, |c| matches!(c.status, CandidateStatus::Faulted { .. }));
                if faulted {
                    continue;
                }
                if !started {
                    reporter.begin_counters(&file)?;
                    started = true;
                }

                match self.runner.profile(candidate, corpus, &self.collector) {
                    Ok(sample) => {
                        let profile = CounterProfile::new(candidate.name(), sample, basis);
                        reporter.counters(&profile)?;
                        file.counters.push(profile);
                    }
                    Err(BenchError::CounterUnavailable(reason)) => {
                        tracing::warn!(%reason, "hardware counters became unavailable");
                        break;
                    }
                    Err(err) => {
                        tracing::warn!(
                            candidate = candidate.name(),
                            error = %err,
                            "counter profile omitted"
                        );
                    }
                }
            }
        }

        reporter.end_file(&file)?;
        Ok(file)
    }
}
