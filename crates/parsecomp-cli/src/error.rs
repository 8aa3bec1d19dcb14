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

//! Structured error types for the parsecomp CLI.

use parsecomp_bench::BenchError;
use thiserror::Error;

/// The main error type for CLI operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CliError {
    /// A command-line value was syntactically valid but unusable.
    #[error("Invalid value for '{argument}': {reason}")]
    InvalidArgument {
        /// Argument name
        argument: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Error raised by the benchmark library.
    #[error(transparent)]
    Bench(#[from] BenchError),
}

impl CliError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}
