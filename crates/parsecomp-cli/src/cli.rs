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

//! Command-line arguments and execution.

use crate::candidates::builtin_registry;
use crate::error::CliError;
use clap::{Parser, ValueEnum};
use parsecomp_bench::core::{BenchConfig, CacheEventBasis, OutputMode};
use parsecomp_bench::fixtures::DEFAULT_MAX_CORPUS_SIZE;
use parsecomp_bench::harness::{BenchmarkDriver, CounterCollector, RunSummary};
use parsecomp_bench::reporters::reporter_for;
use parsecomp_bench::BenchError;
use std::io::{self, Write};
use std::path::PathBuf;

/// parsecomp - compare JSON parser throughput on real files
///
/// Every file is loaded once and handed to each built-in parser repeatedly.
/// Results are reported as cycles per byte and GB/s.
///
/// # Examples
///
/// ```bash
/// # Narrative output
/// parsecomp twitter.json
///
/// # Header line, narrative and hardware counters
/// parsecomp -v twitter.json
///
/// # Table for plotting, with a tenth of the default iterations
/// parsecomp -t -r 0.1 twitter.json canada.json
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "parsecomp")]
#[command(author, version, about = "parsecomp - compare JSON parser throughput on real files", long_about = None)]
pub struct Cli {
    /// Input files, benchmarked in order
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print a header per file and the hardware-counter analysis
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print a fixed-column table (overrides -v)
    #[arg(short = 't', long)]
    pub table: bool,

    /// Scale the number of iterations: above 1 runs more, below 1 fewer
    #[arg(
        short = 'r',
        long = "repeat-multiplier",
        value_name = "N",
        default_value_t = 1.0,
        value_parser = parse_multiplier
    )]
    pub repeat_multiplier: f64,

    /// Denominator of the bytes-per-cache-event diagnostic
    #[arg(long, value_enum, default_value_t = CacheBasisArg::Misses)]
    pub cache_basis: CacheBasisArg,

    /// Largest input file accepted, in bytes
    #[arg(long, env = "PARSECOMP_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_CORPUS_SIZE)]
    pub max_file_size: u64,

    /// Print one JSON document per file (overrides -t and -v)
    #[arg(long)]
    pub json: bool,

    /// Never open hardware performance counters
    #[arg(long)]
    pub no_counters: bool,
}

/// Command-line spelling of [`CacheEventBasis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBasisArg {
    /// Cache misses
    Misses,
    /// Cache references
    References,
}

impl From<CacheBasisArg> for CacheEventBasis {
    fn from(arg: CacheBasisArg) -> Self {
        match arg {
            CacheBasisArg::Misses => CacheEventBasis::Misses,
            CacheBasisArg::References => CacheEventBasis::References,
        }
    }
}

/// Parses `-r`, accepting finite positive numbers only.
pub fn parse_multiplier(value: &str) -> Result<f64, CliError> {
    let multiplier: f64 = value
        .trim()
        .parse()
        .map_err(|_| CliError::invalid_argument("-r", format!("'{}' is not a number", value)))?;
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(CliError::invalid_argument(
            "-r",
            format!("must be a positive number, got {}", value),
        ));
    }
    Ok(multiplier)
}

/// Writes one `Could not load the file` line per skipped input.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn report_load_failures<W: Write>(summary: &RunSummary, out: &mut W) -> Result<(), CliError> {
    for (_, err) in &summary.load_failures {
        writeln!(out, "{}", err).map_err(BenchError::from)?;
    }
    Ok(())
}

impl Cli {
    /// Resolves the output mode; `--json` beats `-t`, which beats `-v`.
    pub fn mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.table {
            OutputMode::Table
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Summary
        }
    }

    /// Builds the benchmark configuration from the arguments.
    pub fn config(&self) -> BenchConfig {
        BenchConfig::new(self.mode())
            .with_repeat_multiplier(self.repeat_multiplier)
            .with_cache_basis(self.cache_basis.into())
            .with_max_corpus_size(self.max_file_size)
            .with_counters(!self.no_counters)
    }

    /// Runs the benchmark over every file, writing the report to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration or a failed report write.
    /// Files that cannot be loaded are not errors; they are counted in the
    /// returned summary.
    pub fn execute(&self) -> Result<RunSummary, CliError> {
        let config = self.config();
        let mode = config.mode;

        let collector = if mode.includes_counters() && config.counters_enabled {
            CounterCollector::detect()
        } else {
            CounterCollector::disabled("not requested")
        };
        if let Some(reason) = collector.unavailable_reason() {
            tracing::debug!(%reason, "hardware-counter analysis disabled");
        }

        let mut driver = BenchmarkDriver::new(config, builtin_registry()?, collector)?;
        let stdout = io::stdout();
        let mut reporter = reporter_for(mode, stdout.lock());
        let summary = driver.run_all(&self.files, reporter.as_mut())?;
        drop(reporter);

        // Printed regardless of RUST_LOG.
        let stderr = io::stderr();
        report_load_failures(&summary, &mut stderr.lock())?;

        tracing::info!(
            files = summary.files_benchmarked,
            load_failures = summary.load_failures.len(),
            candidate_failures = summary.candidate_failures,
            "run complete"
        );
        Ok(summary)
    }
}
