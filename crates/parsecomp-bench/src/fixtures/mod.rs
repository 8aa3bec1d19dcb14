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

//! Benchmark inputs.
//!
//! - `corpus`: padded, immutable input buffers loaded from disk
//! - `scratch`: resettable mutable copies for in-place candidates

pub mod corpus;
pub mod scratch;

pub use corpus::{size_label, Corpus, CORPUS_PADDING, DEFAULT_MAX_CORPUS_SIZE};
pub use scratch::{restore_scratch, ScratchBuffer};
