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

//! End-to-end tests of the driver and reporters.
//!
//! Runs small registries over temporary files and checks the rendered
//! output of every mode.

use parsecomp_bench::core::{BenchConfig, Candidate, CandidateRegistry, OutputMode, Outcome};
use parsecomp_bench::fixtures::{restore_scratch, Corpus, ScratchBuffer};
use parsecomp_bench::harness::{BenchmarkDriver, CounterCollector, RunSummary};
use parsecomp_bench::reporters::{ConsoleReporter, JsonReporter, Reporter, TableReporter};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

// ===== Test Helpers =====

fn temp_input(content: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write temp file");
    file
}

fn registry() -> CandidateRegistry {
    let mut registry = CandidateRegistry::new();
    registry
        .register(
            Candidate::new("byte sum", |corpus: &Corpus, _: &mut ScratchBuffer| {
                Outcome::from(corpus.as_bytes().iter().map(|&b| u64::from(b)).sum::<u64>())
            })
            .expecting_from(|corpus| {
                Outcome::from(corpus.as_bytes().iter().map(|&b| u64::from(b)).sum::<u64>())
            })
            .with_deep_dive(),
        )
        .unwrap();
    registry
        .register(
            Candidate::new("in-place zero", |_, scratch: &mut ScratchBuffer| {
                let pristine = scratch.contents().iter().any(|&b| b != 0);
                scratch.contents_mut().fill(0);
                Outcome::Flag(pristine)
            })
            .with_reset(restore_scratch),
        )
        .unwrap();
    registry
        .register(Candidate::new("copy", |corpus: &Corpus, _: &mut ScratchBuffer| {
            Outcome::from(corpus.as_bytes().to_vec().len())
        })
        .expecting_from(|corpus| Outcome::from(corpus.volume()))
        .verbose_only())
        .unwrap();
    registry
}

fn run<R: Reporter>(mode: OutputMode, paths: &[PathBuf], reporter: &mut R) -> RunSummary {
    let config = BenchConfig::new(mode).with_target_volume(10_000);
    let mut driver =
        BenchmarkDriver::new(config, registry(), CounterCollector::disabled("test")).unwrap();
    driver.run_all(paths, reporter).unwrap()
}

// ===== Table Mode =====

#[test]
fn test_table_two_files_one_header() {
    let a = temp_input(br#"{"a":[1,2,3]}"#);
    let b = temp_input(br#"[true,false,null]"#);
    let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];

    let mut reporter = TableReporter::new(Vec::new());
    let summary = run(OutputMode::Table, &paths, &mut reporter);
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(summary.exit_success());
    assert_eq!(output.lines().filter(|l| l.starts_with("name ")).count(), 1);

    let rows: Vec<_> = output.lines().filter(|l| l.starts_with('"')).collect();
    // verbose-only candidates are skipped: two candidates per file
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("\"byte sum"));
    assert!(rows[1].starts_with("\"in-place zero"));
    assert!(rows[2].starts_with("\"byte sum"));
}

#[test]
fn test_table_missing_file_continues() {
    let good = temp_input(b"[1]");
    let paths = vec![
        PathBuf::from("/nonexistent/input.json"),
        good.path().to_path_buf(),
    ];

    let mut reporter = TableReporter::new(Vec::new());
    let summary = run(OutputMode::Table, &paths, &mut reporter);
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(!summary.exit_success());
    assert_eq!(summary.files_benchmarked, 1);
    assert_eq!(output.lines().filter(|l| l.starts_with('"')).count(), 2);
}

// ===== Narrative Modes =====

#[test]
fn test_verbose_without_counters_omits_block() {
    let input = temp_input(br#"{"key":"value"}"#);
    let paths = vec![input.path().to_path_buf()];

    let mut reporter = ConsoleReporter::new(Vec::new(), true);
    run(OutputMode::Verbose, &paths, &mut reporter);
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(output.starts_with("Input "));
    assert!(output.contains("15 B: will run 666 iterations."));
    assert!(output.contains("copy"));
    assert!(!output.contains("performance counters"));
}

#[test]
fn test_summary_has_no_file_header() {
    let input = temp_input(b"[]");
    let paths = vec![input.path().to_path_buf()];

    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    run(OutputMode::Summary, &paths, &mut reporter);
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(!output.contains("Input "));
    assert_eq!(output.lines().filter(|l| l.contains("per input byte")).count(), 3);
}

#[test]
fn test_mismatch_is_flagged() {
    let input = temp_input(b"{}");
    let mut registry = CandidateRegistry::new();
    registry
        .register(Candidate::new("wrong answer", |_, _| Outcome::Count(1)).expecting(2u64))
        .unwrap();
    let config = BenchConfig::new(OutputMode::Summary).with_target_volume(100);
    let mut driver =
        BenchmarkDriver::new(config, registry, CounterCollector::disabled("test")).unwrap();

    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    let summary = driver.run_all(&[input.path()], &mut reporter).unwrap();
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert_eq!(summary.candidate_failures, 1);
    assert!(output.starts_with("MISMATCH: wrong answer"));
}

#[test]
fn test_fault_does_not_stop_other_candidates() {
    let input = temp_input(b"[1,2]");
    let mut registry = CandidateRegistry::new();
    registry
        .register(Candidate::new("panics", |_, _| panic!("unsupported input")))
        .unwrap();
    registry
        .register(Candidate::new("fine", |_, _| Outcome::Flag(true)))
        .unwrap();
    let config = BenchConfig::new(OutputMode::Table).with_target_volume(100);
    let mut driver =
        BenchmarkDriver::new(config, registry, CounterCollector::disabled("test")).unwrap();

    let mut reporter = TableReporter::new(Vec::new());
    let summary = driver.run_all(&[input.path()], &mut reporter).unwrap();
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert_eq!(summary.candidate_failures, 1);
    let rows: Vec<_> = output.lines().filter(|l| l.starts_with('"')).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].matches("NaN").count(), 4);
    assert!(rows[1].starts_with("\"fine"));
}

// ===== JSON Mode =====

#[test]
fn test_json_one_document_per_file() {
    let a = temp_input(b"[1,2,3]");
    let b = temp_input(b"{\"x\":null}");
    let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];

    let mut reporter = JsonReporter::new(Vec::new());
    run(OutputMode::Json, &paths, &mut reporter);
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    let docs: Vec<serde_json::Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["volume"], 7);
    assert_eq!(docs[0]["candidates"].as_array().unwrap().len(), 2);
    assert_eq!(docs[1]["candidates"][1]["name"], "in-place zero");
}
