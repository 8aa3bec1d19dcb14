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

//! Fixed-column table output for plotting scripts.
//!
//! ```text
//! name                                            cycles_per_byte  cycles_per_byte_err ...
//! "serde_json                              "                2.104                0.051 ...
//! ```
//!
//! The header is written once per reporter. Candidates whose numbers cannot
//! be trusted get `NaN` in every numeric column so rows stay aligned.

use crate::error::{BenchError, Result};
use crate::reporters::types::{CandidateReport, FileReport};
use crate::reporters::{write_file_separator, Reporter};
use std::io::Write;
use std::path::Path;

/// Column names in output order.
pub const COLUMNS: [&str; 5] = [
    "name",
    "cycles_per_byte",
    "cycles_per_byte_err",
    "gb_per_s",
    "gb_per_s_err",
];

/// Table reporter.
#[derive(Debug)]
pub struct TableReporter<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> TableReporter<W> {
    /// Creates a table reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "{}", format_header())?;
            self.header_written = true;
        }
        Ok(())
    }
}

/// Formats the header line.
pub fn format_header() -> String {
    format!(
        "{:<42} {:>20} {:>20} {:>20} {:>20}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
    )
}

/// Formats one candidate row.
pub fn format_row(entry: &CandidateReport) -> String {
    let (cpb, cpb_err, gbs, gbs_err) = match entry.trusted_throughput() {
        Some(t) => (
            t.cycles_per_byte,
            t.cycles_per_byte_err,
            t.gigabytes_per_second,
            t.gigabytes_per_second_err,
        ),
        None => (f64::NAN, f64::NAN, f64::NAN, f64::NAN),
    };
    format!(
        "\"{:<40}\" {:>20.3} {:>20.3} {:>20.3} {:>20.3}",
        entry.name, cpb, cpb_err, gbs, gbs_err
    )
}

impl<W: Write> Reporter for TableReporter<W> {
    fn begin(&mut self) -> Result<()> {
        self.write_header()
    }

    fn begin_file(&mut self, _file: &FileReport) -> Result<()> {
        self.write_header()
    }

    fn candidate(&mut self, _file: &FileReport, entry: &CandidateReport) -> Result<()> {
        writeln!(self.out, "{}", format_row(entry))?;
        self.out.flush()?;
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
    use crate::core::measurement::{SampleAggregate, TrialSample};
    use std::time::Duration;

    fn entry(name: &str) -> CandidateReport {
        let mut agg = SampleAggregate::new();
        agg.push(TrialSample::new(Duration::from_micros(1), 2_000));
        CandidateReport::measured(name, agg.finish(1_000, 0))
    }

    #[test]
    fn test_header_layout() {
        let header = format_header();
        assert!(header.starts_with("name "));
        assert_eq!(header.len(), 42 + 4 * 21);
        assert!(header.ends_with("gb_per_s_err"));
    }

    #[test]
    fn test_row_layout() {
        let row = format_row(&entry("serde_json"));
        assert!(row.starts_with("\"serde_json"));
        assert_eq!(row.len(), 42 + 4 * 21);
        // 2_000 cycles over 1_000 bytes
        assert!(row.contains("2.000"));
    }

    #[test]
    fn test_untrusted_row_is_nan() {
        let report = CandidateReport::from_result(
            "broken",
            Err(BenchError::CandidateFault {
                candidate: "broken".to_string(),
                message: "boom".to_string(),
            }),
        )
        .unwrap();
        let row = format_row(&report);
        assert_eq!(row.matches("NaN").count(), 4);
    }

    #[test]
    fn test_header_once() {
        let mut reporter = TableReporter::new(Vec::new());
        let file = FileReport::new(Path::new("a.json"), 1_000, "1000 B".to_string(), 10, "cycles");
        reporter.begin().unwrap();
        for _ in 0..2 {
            reporter.begin_file(&file).unwrap();
            reporter.candidate(&file, &entry("x")).unwrap();
            reporter.end_file(&file).unwrap();
        }
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output.matches("cycles_per_byte_err").count(), 1);
        assert_eq!(output.lines().filter(|l| l.starts_with('"')).count(), 2);
    }
}
