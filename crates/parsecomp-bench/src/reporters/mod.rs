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

//! Benchmark reporters for the supported output modes.
//!
//! Reporters receive events from the driver as results become available,
//! so a long run shows progress line by line.
//!
//! # Modules
//!
//! - `types`: Core report data structures
//! - `console`: Narrative output (default and verbose modes)
//! - `table`: Fixed-column table output
//! - `json`: One JSON document per file

pub mod console;
pub mod json;
pub mod table;
pub mod types;

use crate::core::config::OutputMode;
use crate::error::{BenchError, Result};
use std::io::Write;
use std::path::Path;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use table::TableReporter;
pub use types::{CandidateReport, CandidateStatus, CounterProfile, FileReport};

/// Sink for benchmark events.
///
/// Calls arrive in this order for every run: `begin` once, then per file
/// either `skip_file`, or `begin_file`, `candidate` per active candidate,
/// optionally `begin_counters` followed by `counters` per deep-dive
/// candidate, and finally `end_file`.
pub trait Reporter {
    /// Called once before the first file.
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after a file was loaded; `file.candidates` is still empty.
    fn begin_file(&mut self, file: &FileReport) -> Result<()>;

    /// Called after each candidate finishes.
    fn candidate(&mut self, file: &FileReport, entry: &CandidateReport) -> Result<()>;

    /// Called once before the first counter profile of a file.
    fn begin_counters(&mut self, _file: &FileReport) -> Result<()> {
        Ok(())
    }

    /// Called after each deep-dive candidate was profiled.
    fn counters(&mut self, _profile: &CounterProfile) -> Result<()> {
        Ok(())
    }

    /// Called with the complete report of a file.
    fn end_file(&mut self, file: &FileReport) -> Result<()>;

    /// Called when a file could not be loaded.
    fn skip_file(&mut self, _path: &Path, _error: &BenchError) -> Result<()> {
        Ok(())
    }
}

/// Creates the reporter for `mode`, writing to `out`.
pub fn reporter_for<'a, W: Write + 'a>(mode: OutputMode, out: W) -> Box<dyn Reporter + 'a> {
    match mode {
        OutputMode::Summary => Box::new(ConsoleReporter::new(out, false)),
        OutputMode::Verbose => Box::new(ConsoleReporter::new(out, true)),
        OutputMode::Table => Box::new(TableReporter::new(out)),
        OutputMode::Json => Box::new(JsonReporter::new(out)),
    }
}

/// Separator written after every file in the text modes.
pub(crate) fn write_file_separator<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
