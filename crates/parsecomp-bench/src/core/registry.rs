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

//! Candidate definitions and the ordered candidate registry.
//!
//! A [`Candidate`] wraps one implementation under test: the operation to
//! time, the result it must produce, and an optional reset action for
//! operations that consume their input buffer. Candidates are collected in a
//! [`CandidateRegistry`], whose registration order is the report order.

use crate::core::config::OutputMode;
use crate::error::{BenchError, Result};
use crate::fixtures::{Corpus, ScratchBuffer};
use serde::Serialize;
use std::fmt;

/// Comparable result of one candidate invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Pass/fail style result, e.g. "document is valid".
    Flag(bool),
    /// Count style result, e.g. number of top-level elements.
    Count(u64),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Flag(flag) => write!(f, "{}", flag),
            Outcome::Count(count) => write!(f, "{}", count),
        }
    }
}

impl From<bool> for Outcome {
    fn from(flag: bool) -> Self {
        Outcome::Flag(flag)
    }
}

impl From<u64> for Outcome {
    fn from(count: u64) -> Self {
        Outcome::Count(count)
    }
}

impl From<usize> for Outcome {
    fn from(count: usize) -> Self {
        Outcome::Count(count as u64)
    }
}

/// The timed operation of a candidate.
pub type InvokeFn = Box<dyn FnMut(&Corpus, &mut ScratchBuffer) -> Outcome>;

/// Action run before every invocation to restore candidate input.
pub type ResetFn = Box<dyn FnMut(&Corpus, &mut ScratchBuffer)>;

/// Computes a corpus-dependent expected result.
pub type DeriveFn = Box<dyn Fn(&Corpus) -> Outcome>;

/// What a candidate must return.
pub enum Expectation {
    /// The same value for every corpus.
    Exact(Outcome),
    /// A value computed once per corpus, outside the timed region.
    FromCorpus(DeriveFn),
}

impl Expectation {
    /// Resolves the expected outcome for `corpus`.
    pub fn resolve(&self, corpus: &Corpus) -> Outcome {
        match self {
            Expectation::Exact(outcome) => *outcome,
            Expectation::FromCorpus(derive) => derive(corpus),
        }
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Exact(outcome) => f.debug_tuple("Exact").field(outcome).finish(),
            Expectation::FromCorpus(_) => f.write_str("FromCorpus(..)"),
        }
    }
}

/// A named unit under test.
///
/// `invoke` must be idempotent when preceded by `reset`, or naturally
/// idempotent when no reset is set.
///
/// # Example
///
/// ```no_run
/// use parsecomp_bench::core::registry::{Candidate, Outcome};
/// use parsecomp_bench::fixtures::restore_scratch;
///
/// let candidate = Candidate::new("uppercase in place", |_corpus, scratch| {
///     scratch.contents_mut().make_ascii_uppercase();
///     Outcome::Flag(true)
/// })
/// .with_reset(restore_scratch);
/// assert!(candidate.has_reset());
/// ```
pub struct Candidate {
    name: String,
    invoke: InvokeFn,
    expected: Expectation,
    reset: Option<ResetFn>,
    data_mode: bool,
    deep_dive: bool,
}

impl Candidate {
    /// Creates a candidate that is expected to return `Outcome::Flag(true)`.
    pub fn new<F>(name: impl Into<String>, invoke: F) -> Self
    where
        F: FnMut(&Corpus, &mut ScratchBuffer) -> Outcome + 'static,
    {
        Self {
            name: name.into(),
            invoke: Box::new(invoke),
            expected: Expectation::Exact(Outcome::Flag(true)),
            reset: None,
            data_mode: true,
            deep_dive: false,
        }
    }

    /// Sets a fixed expected result.
    pub fn expecting(mut self, expected: impl Into<Outcome>) -> Self {
        self.expected = Expectation::Exact(expected.into());
        self
    }

    /// Sets an expected result derived from each corpus.
    pub fn expecting_from<F>(mut self, derive: F) -> Self
    where
        F: Fn(&Corpus) -> Outcome + 'static,
    {
        self.expected = Expectation::FromCorpus(Box::new(derive));
        self
    }

    /// Sets the reset action run before every invocation.
    pub fn with_reset<F>(mut self, reset: F) -> Self
    where
        F: FnMut(&Corpus, &mut ScratchBuffer) + 'static,
    {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Marks the candidate as an illustrative baseline skipped in data modes.
    pub fn verbose_only(mut self) -> Self {
        self.data_mode = false;
        self
    }

    /// Includes the candidate in the hardware-counter deep-dive.
    pub fn with_deep_dive(mut self) -> Self {
        self.deep_dive = true;
        self
    }

    /// Returns the candidate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the candidate runs in table/JSON modes.
    pub fn runs_in_data_mode(&self) -> bool {
        self.data_mode
    }

    /// Returns whether the candidate runs in `mode`.
    pub fn runs_in(&self, mode: OutputMode) -> bool {
        self.data_mode || !mode.is_data_mode()
    }

    /// Returns whether the candidate takes part in the counter deep-dive.
    pub fn deep_dive(&self) -> bool {
        self.deep_dive
    }

    /// Returns whether a reset action is set.
    pub fn has_reset(&self) -> bool {
        self.reset.is_some()
    }

    /// Returns the expectation.
    pub fn expectation(&self) -> &Expectation {
        &self.expected
    }

    /// Resolves the expected result for `corpus`.
    pub fn expected_for(&self, corpus: &Corpus) -> Outcome {
        self.expected.resolve(corpus)
    }

    /// Runs the reset action, if any.
    #[inline(always)]
    pub fn reset(&mut self, corpus: &Corpus, scratch: &mut ScratchBuffer) {
        if let Some(reset) = self.reset.as_mut() {
            reset(corpus, scratch);
        }
    }

    /// Runs the timed operation once.
    #[inline(always)]
    pub fn invoke(&mut self, corpus: &Corpus, scratch: &mut ScratchBuffer) -> Outcome {
        (self.invoke)(corpus, scratch)
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("expected", &self.expected)
            .field("has_reset", &self.has_reset())
            .field("data_mode", &self.data_mode)
            .field("deep_dive", &self.deep_dive)
            .finish()
    }
}

/// Ordered set of candidates with unique names.
#[derive(Debug, Default)]
pub struct CandidateRegistry {
    candidates: Vec<Candidate>,
}

impl CandidateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] if the name is empty or already
    /// registered.
    pub fn register(&mut self, candidate: Candidate) -> Result<()> {
        if candidate.name().trim().is_empty() {
            return Err(BenchError::invalid_config(
                "candidate",
                "name must not be empty",
            ));
        }
        if self.contains(candidate.name()) {
            return Err(BenchError::invalid_config(
                "candidate",
                format!("'{}' is already registered", candidate.name()),
            ));
        }
        self.candidates.push(candidate);
        Ok(())
    }

    /// Returns whether a candidate named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.candidates.iter().any(|c| c.name() == name)
    }

    /// Returns the number of registered candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns whether no candidates are registered.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns candidate names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.candidates.iter().map(Candidate::name).collect()
    }

    /// Iterates over candidates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// Iterates mutably over candidates in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Candidate> {
        self.candidates.iter_mut()
    }

    /// Iterates mutably over the candidates that run in `mode`.
    pub fn active_mut(&mut self, mode: OutputMode) -> impl Iterator<Item = &mut Candidate> {
        self.candidates.iter_mut().filter(move |c| c.runs_in(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trivial(name: &str) -> Candidate {
        Candidate::new(name, |_, _| Outcome::Flag(true))
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Flag(true).to_string(), "true");
        assert_eq!(Outcome::Count(42).to_string(), "42");
        assert_eq!(Outcome::from(7usize), Outcome::Count(7));
    }

    #[test]
    fn test_candidate_defaults() {
        let candidate = trivial("plain");
        let corpus = Corpus::from_bytes("inline", b"x");
        assert_eq!(candidate.expected_for(&corpus), Outcome::Flag(true));
        assert!(candidate.runs_in_data_mode());
        assert!(!candidate.deep_dive());
        assert!(!candidate.has_reset());
    }

    #[test]
    fn test_expectation_from_corpus() {
        let candidate = trivial("len").expecting_from(|corpus| Outcome::from(corpus.volume()));
        let corpus = Corpus::from_bytes("inline", b"12345");
        assert_eq!(candidate.expected_for(&corpus), Outcome::Count(5));
    }

    #[test]
    fn test_verbose_only_skipped_in_data_modes() {
        let candidate = trivial("baseline").verbose_only();
        assert!(candidate.runs_in(OutputMode::Verbose));
        assert!(candidate.runs_in(OutputMode::Summary));
        assert!(!candidate.runs_in(OutputMode::Table));
        assert!(!candidate.runs_in(OutputMode::Json));
    }

    #[test]
    fn test_reset_runs_before_invoke() {
        let corpus = Corpus::from_bytes("inline", b"abc");
        let mut scratch = ScratchBuffer::new();
        let mut candidate = Candidate::new("upper", |_, scratch: &mut ScratchBuffer| {
            scratch.contents_mut().make_ascii_uppercase();
            Outcome::from(scratch.contents() == b"ABC")
        })
        .with_reset(crate::fixtures::restore_scratch);

        candidate.reset(&corpus, &mut scratch);
        assert!(scratch.matches(&corpus));
        assert_eq!(candidate.invoke(&corpus, &mut scratch), Outcome::Flag(true));
        assert!(!scratch.matches(&corpus));
    }

    #[test]
    fn test_registry_preserves_order() {
        let mut registry = CandidateRegistry::new();
        for name in ["zeta", "alpha", "mu"] {
            registry.register(trivial(name)).unwrap();
        }
        assert_eq!(registry.names(), vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = CandidateRegistry::new();
        registry.register(trivial("dup")).unwrap();
        assert!(registry.register(trivial("dup")).is_err());
        assert!(registry.register(trivial("  ")).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_active_filters_by_mode() {
        let mut registry = CandidateRegistry::new();
        registry.register(trivial("fast")).unwrap();
        registry.register(trivial("slow").verbose_only()).unwrap();

        let table: Vec<_> = registry
            .active_mut(OutputMode::Table)
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(table, vec!["fast"]);
        assert_eq!(registry.active_mut(OutputMode::Verbose).count(), 2);
    }
}
