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

//! Mutable scratch buffer for in-place candidates.

use super::corpus::Corpus;

/// A reusable mutable copy of the corpus.
///
/// Holds `volume + 1` bytes once restored: the corpus contents followed by a
/// NUL terminator. The allocation is kept across restores, so only the first
/// restore for a given corpus size allocates.
#[derive(Debug, Default, Clone)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
}

impl ScratchBuffer {
    /// Creates an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scratch buffer already holding a copy of `corpus`.
    pub fn for_corpus(corpus: &Corpus) -> Self {
        let mut scratch = Self {
            bytes: Vec::with_capacity(corpus.volume() + 1),
        };
        scratch.restore_from(corpus);
        scratch
    }

    /// Overwrites the buffer with the pristine corpus contents and a NUL terminator.
    pub fn restore_from(&mut self, corpus: &Corpus) {
        self.bytes.clear();
        self.bytes.extend_from_slice(corpus.as_bytes());
        self.bytes.push(0);
    }

    /// Returns the copied contents, excluding the terminator.
    pub fn contents(&self) -> &[u8] {
        &self.bytes[..self.logical_len()]
    }

    /// Returns the copied contents mutably, excluding the terminator.
    pub fn contents_mut(&mut self) -> &mut [u8] {
        let len = self.logical_len();
        &mut self.bytes[..len]
    }

    /// Returns the whole buffer including the NUL terminator.
    pub fn as_terminated(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns whether the contents are byte-identical to `corpus`.
    pub fn matches(&self, corpus: &Corpus) -> bool {
        self.contents() == corpus.as_bytes()
    }

    fn logical_len(&self) -> usize {
        self.bytes.len().saturating_sub(1)
    }
}

/// Reset action that restores the scratch buffer from the corpus.
///
/// This is the reset every in-place candidate needs; pass it to
/// `Candidate::with_reset`.
pub fn restore_scratch(corpus: &Corpus, scratch: &mut ScratchBuffer) {
    scratch.restore_from(corpus);
}
