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

//! Centralized benchmark configuration.
//!
//! Provides the repeat-count policy, output mode selection and corpus limits
//! shared by the trial runner, the driver and the reporters.

use crate::error::{BenchError, Result};
use crate::fixtures::DEFAULT_MAX_CORPUS_SIZE;
use serde::Serialize;

/// Total number of bytes each candidate should process per file at multiplier 1.
pub const TARGET_VOLUME: u64 = 50_000_000;

/// Lower bound on the number of trials per candidate.
pub const MIN_REPEAT: u64 = 10;

/// Output mode for benchmark reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One narrative line per candidate, no per-file header or counter block.
    #[default]
    Summary,
    /// Narrative with per-file header and hardware-counter deep-dive.
    Verbose,
    /// Fixed-width machine-parseable table.
    Table,
    /// One JSON document per file.
    Json,
}

impl OutputMode {
    /// Returns whether candidates flagged as illustrative-only are skipped.
    pub fn is_data_mode(&self) -> bool {
        matches!(self, OutputMode::Table | OutputMode::Json)
    }

    /// Returns whether the hardware-counter deep-dive belongs in this mode.
    pub fn includes_counters(&self) -> bool {
        matches!(self, OutputMode::Verbose)
    }
}

/// Denominator used for the bytes-per-cache-event diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheEventBasis {
    /// Divide by last-level cache misses.
    #[default]
    Misses,
    /// Divide by cache references.
    References,
}

impl CacheEventBasis {
    /// Returns the label used in report columns.
    pub fn as_str(&self) -> &str {
        match self {
            CacheEventBasis::Misses => "cachemiss",
            CacheEventBasis::References => "cacheref",
        }
    }
}

/// Benchmark configuration.
///
/// # Example
///
/// ```no_run
/// use parsecomp_bench::core::config::{BenchConfig, OutputMode};
///
/// let config = BenchConfig::default()
///     .with_repeat_multiplier(0.5)
///     .with_mode(OutputMode::Table);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchConfig {
    /// Bytes each candidate should process per file before scaling.
    pub target_volume: u64,
    /// Scale factor applied to `target_volume`.
    pub repeat_multiplier: f64,
    /// Floor on the number of trials.
    pub min_repeat: u64,
    /// Report output mode.
    pub mode: OutputMode,
    /// Denominator for bytes-per-cache-event.
    pub cache_basis: CacheEventBasis,
    /// Largest corpus accepted by the loader, in bytes.
    pub max_corpus_size: u64,
    /// Whether the counter deep-dive may run at all.
    pub counters_enabled: bool,
}

impl BenchConfig {
    /// Creates a configuration with the given output mode and defaults elsewhere.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            target_volume: TARGET_VOLUME,
            repeat_multiplier: 1.0,
            min_repeat: MIN_REPEAT,
            mode,
            cache_basis: CacheEventBasis::default(),
            max_corpus_size: DEFAULT_MAX_CORPUS_SIZE,
            counters_enabled: true,
        }
    }

    /// Sets the repeat multiplier.
    pub fn with_repeat_multiplier(mut self, multiplier: f64) -> Self {
        self.repeat_multiplier = multiplier;
        self
    }

    /// Sets the target volume.
    pub fn with_target_volume(mut self, volume: u64) -> Self {
        self.target_volume = volume;
        self
    }

    /// Sets the output mode.
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the cache-event denominator.
    pub fn with_cache_basis(mut self, basis: CacheEventBasis) -> Self {
        self.cache_basis = basis;
        self
    }

    /// Sets the maximum corpus size.
    pub fn with_max_corpus_size(mut self, max: u64) -> Self {
        self.max_corpus_size = max;
        self
    }

    /// Enables or disables the hardware-counter deep-dive.
    pub fn with_counters(mut self, enabled: bool) -> Self {
        self.counters_enabled = enabled;
        self
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.repeat_multiplier.is_finite() || self.repeat_multiplier <= 0.0 {
            return Err(BenchError::invalid_config(
                "repeat_multiplier",
                format!("must be a positive number, got {}", self.repeat_multiplier),
            ));
        }
        if self.min_repeat < MIN_REPEAT {
            return Err(BenchError::invalid_config(
                "min_repeat",
                format!("must be at least {}", MIN_REPEAT),
            ));
        }
        if self.target_volume == 0 {
            return Err(BenchError::invalid_config("target_volume", "must be positive"));
        }
        Ok(())
    }

    /// Returns the number of trials for a corpus of `volume` bytes.
    pub fn repeat_count(&self, volume: usize) -> u64 {
        repeat_count(
            self.target_volume,
            self.repeat_multiplier,
            volume,
            self.min_repeat,
        )
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new(OutputMode::default())
    }
}

/// Computes `max(min_repeat, floor(target_volume × multiplier / volume))`.
///
/// An empty corpus gets `min_repeat` trials. Float-to-integer conversion
/// saturates, so absurd multipliers cannot overflow.
pub fn repeat_count(target_volume: u64, multiplier: f64, volume: usize, min_repeat: u64) -> u64 {
    if volume == 0 {
        return min_repeat;
    }
    let scaled = (target_volume as f64 * multiplier / volume as f64).floor();
    (scaled as u64).max(min_repeat)
}
