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

//! JSON export for benchmark reports.
//!
//! Each loaded file produces one line holding its complete [`FileReport`].
//! Non-finite floats are written as `null`.

use crate::error::Result;
use crate::reporters::types::{CandidateReport, FileReport};
use crate::reporters::Reporter;
use std::io::Write;

/// JSON-lines reporter.
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    /// Creates a JSON reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Serializes a file report as a single line of JSON.
pub fn export_json(file: &FileReport) -> Result<String> {
    Ok(serde_json::to_string(file)?)
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn begin_file(&mut self, _file: &FileReport) -> Result<()> {
        Ok(())
    }

    fn candidate(&mut self, _file: &FileReport, _entry: &CandidateReport) -> Result<()> {
        Ok(())
    }

    fn end_file(&mut self, file: &FileReport) -> Result<()> {
        writeln!(self.out, "{}", export_json(file)?)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::{SampleAggregate, TrialSample};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_one_line_per_file() {
        let mut file = FileReport::new(Path::new("canada.json"), 2_251_051, "2 MB".to_string(), 22, "cycles");
        let mut agg = SampleAggregate::new();
        agg.push(TrialSample::new(Duration::from_millis(2), 6_000_000));
        file.candidates
            .push(CandidateReport::measured("serde_json", agg.finish(2_251_051, 0)));

        let mut reporter = JsonReporter::new(Vec::new());
        reporter.end_file(&file).unwrap();
        reporter.end_file(&file).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["path"], "canada.json");
        assert_eq!(value["repeat_count"], 22);
        assert_eq!(value["candidates"][0]["name"], "serde_json");
        assert_eq!(value["candidates"][0]["status"], "measured");
        assert!(value.get("counters").is_none());
    }

    #[test]
    fn test_nan_becomes_null() {
        let mut agg = SampleAggregate::new();
        agg.push(TrialSample::new(Duration::ZERO, 0));
        let mut file = FileReport::new(Path::new("empty.json"), 0, "0 B".to_string(), 10, "cycles");
        file.candidates
            .push(CandidateReport::measured("noop", agg.finish(0, 0)));

        let json = export_json(&file).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["candidates"][0]["throughput"]["cycles_per_byte"].is_null());
    }
}
