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

//! Narrative console reporter.
//!
//! Formats one human-readable line per candidate. In verbose mode each file
//! also gets a header line and, when counters were collected, a
//! hardware-counter block.

use crate::error::{BenchError, Result};
use crate::reporters::types::{CandidateReport, CandidateStatus, CounterProfile, FileReport};
use crate::reporters::{write_file_separator, Reporter};
use std::io::Write;
use std::path::Path;

/// Narrative reporter for the default and verbose modes.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter; `verbose` adds file headers and counter blocks.
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Formats the per-file header line.
pub fn format_file_header(file: &FileReport) -> String {
    format!(
        "Input {} has {}: will run {} iterations.",
        file.path, file.size_label, file.repeat_count
    )
}

/// Formats the narrative line for one candidate.
pub fn format_candidate_line(entry: &CandidateReport, cycle_unit: &str) -> String {
    let marker = entry
        .status
        .marker()
        .map(|m| format!("{} ", m))
        .unwrap_or_default();

    match (&entry.status, &entry.throughput) {
        (CandidateStatus::Faulted { message }, _) => {
            format!("{}{:<40}\t: {}", marker, entry.name, message)
        }
        (status, Some(t)) => {
            let mut line = format!(
                "{}{:<40}\t: {:8.3} {} per input byte (best) {:8.3} {} per input byte (err) {:8.3} GB/s (error margin: {:.3} GB/s)",
                marker,
                entry.name,
                t.cycles_per_byte,
                cycle_unit,
                t.cycles_per_byte_err,
                cycle_unit,
                t.gigabytes_per_second,
                t.gigabytes_per_second_err
            );
            if let CandidateStatus::Mismatch {
                expected,
                observed,
                mismatches,
            } = status
            {
                line.push_str(&format!(
                    " [expected {}, got {} in {} trials]",
                    expected, observed, mismatches
                ));
            }
            line
        }
        (_, None) => format!("{}{:<40}\t: no measurement", marker, entry.name),
    }
}

/// Formats the hardware-counter line for one candidate.
pub fn format_counter_line(profile: &CounterProfile) -> String {
    let sample = &profile.sample;
    format!(
        "{:<10}: cycles {:10.0} instructions {:10.0} branchmisses {:10.0} cacheref {:10.0} cachemisses {:10.0}  bytesper{} {:10.0} inspercycle {:10.1} insperbyte {:10.1}",
        profile.name,
        sample.cycles,
        sample.instructions,
        sample.branch_misses,
        sample.cache_references,
        sample.cache_misses,
        profile.basis.as_str(),
        profile.bytes_per_cache_event,
        profile.instructions_per_cycle,
        profile.instructions_per_byte
    )
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn begin_file(&mut self, file: &FileReport) -> Result<()> {
        if self.verbose {
            writeln!(self.out, "{}", format_file_header(file))?;
        }
        Ok(())
    }

    fn candidate(&mut self, file: &FileReport, entry: &CandidateReport) -> Result<()> {
        writeln!(self.out, "{}", format_candidate_line(entry, file.cycle_unit))?;
        self.out.flush()?;
        Ok(())
    }

    fn begin_counters(&mut self, _file: &FileReport) -> Result<()> {
        if self.verbose {
            writeln!(self.out, "\n \n <doing additional analysis with performance counters (Linux only)>")?;
        }
        Ok(())
    }

    fn counters(&mut self, profile: &CounterProfile) -> Result<()> {
        if self.verbose {
            writeln!(self.out, "{}", format_counter_line(profile))?;
        }
        Ok(())
    }

    fn end_file(&mut self, _file: &FileReport) -> Result<()> {
        write_file_separator(&mut self.out)
    }

    fn skip_file(&mut self, _path: &Path, _error: &BenchError) -> Result<()> {
        write_file_separator(&mut self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CacheEventBasis;
    use crate::core::measurement::{SampleAggregate, TrialSample};
    use crate::core::registry::Outcome;
    use crate::harness::collector::{CounterSample, HardwareCounterSample};
    use std::time::Duration;

    fn file() -> FileReport {
        FileReport::new(Path::new("twitter.json"), 631_515, "616 KB".to_string(), 79, "cycles")
    }

    fn measured(name: &str) -> CandidateReport {
        let mut agg = SampleAggregate::new();
        agg.push(TrialSample::new(Duration::from_micros(300), 1_000_000));
        CandidateReport::measured(name, agg.finish(631_515, 0))
    }

    #[test]
    fn test_file_header() {
        assert_eq!(
            format_file_header(&file()),
            "Input twitter.json has 616 KB: will run 79 iterations."
        );
    }

    #[test]
    fn test_measured_line() {
        let line = format_candidate_line(&measured("serde_json"), "cycles");
        assert!(line.starts_with("serde_json"));
        assert!(line.contains("cycles per input byte (best)"));
        assert!(line.contains("GB/s (error margin:"));
    }

    #[test]
    fn test_fault_line_is_marked() {
        let report = CandidateReport::from_result(
            "broken",
            Err(BenchError::CandidateFault {
                candidate: "broken".to_string(),
                message: "stack overflow".to_string(),
            }),
        )
        .unwrap();
        let line = format_candidate_line(&report, "cycles");
        assert!(line.starts_with("FAULT: broken"));
        assert!(line.ends_with("stack overflow"));
    }

    #[test]
    fn test_mismatch_line_is_marked() {
        let mut agg = SampleAggregate::new();
        agg.push(TrialSample::new(Duration::from_micros(3), 100));
        let report = CandidateReport::from_result(
            "liar",
            Err(BenchError::ResultMismatch {
                candidate: "liar".to_string(),
                expected: Outcome::Count(3),
                observed: Outcome::Count(2),
                mismatches: 10,
                statistics: Box::new(agg.finish(100, 10)),
            }),
        )
        .unwrap();
        let line = format_candidate_line(&report, "ns");
        assert!(line.starts_with("MISMATCH: liar"));
        assert!(line.contains("[expected 3, got 2 in 10 trials]"));
    }

    #[test]
    fn test_counter_line() {
        let totals = CounterSample {
            cycles: 2_000,
            instructions: 5_000,
            branch_misses: 10,
            cache_references: 40,
            cache_misses: 8,
        };
        let sample = HardwareCounterSample::from_totals(&totals, 2, 500, 0);
        let profile = CounterProfile::new("serde_json", sample, CacheEventBasis::Misses);
        let line = format_counter_line(&profile);
        assert!(line.starts_with("serde_json: cycles"));
        assert!(line.contains("bytespercachemiss"));
        assert!(line.contains(&format!("inspercycle {:10.1}", 2.5)));
    }

    #[test]
    fn test_summary_mode_has_no_header() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        let file = file();
        reporter.begin_file(&file).unwrap();
        reporter.candidate(&file, &measured("serde_json")).unwrap();
        reporter.begin_counters(&file).unwrap();
        reporter.end_file(&file).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(!output.contains("Input twitter.json"));
        assert!(!output.contains("performance counters"));
        assert!(output.ends_with("\n\n\n"));
    }

    #[test]
    fn test_verbose_mode_has_header() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        let file = file();
        reporter.begin_file(&file).unwrap();
        reporter.candidate(&file, &measured("serde_json")).unwrap();
        reporter.end_file(&file).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.starts_with("Input twitter.json has 616 KB"));
    }
}
