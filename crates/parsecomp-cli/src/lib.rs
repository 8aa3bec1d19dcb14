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

//! parsecomp CLI library.
//!
//! Argument parsing, the built-in candidate set and execution of a
//! benchmark run. The `parsecomp` binary is a thin wrapper that installs
//! logging and maps the run summary to an exit status.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use parsecomp_cli::Cli;
//!
//! let cli = Cli::parse_from(["parsecomp", "-t", "twitter.json"]);
//! let summary = cli.execute()?;
//! assert!(summary.exit_success());
//! # Ok::<(), parsecomp_cli::error::CliError>(())
//! ```

pub mod candidates;
pub mod cli;
pub mod error;

pub use cli::{CacheBasisArg, Cli};
pub use error::CliError;
