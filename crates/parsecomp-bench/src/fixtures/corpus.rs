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

//! Input corpus loading.
//!
//! A [`Corpus`] is the immutable byte buffer every candidate of one file's
//! benchmark is measured against. The buffer carries [`CORPUS_PADDING`]
//! zeroed bytes past its logical end so that candidates reading ahead in
//! wide blocks never run off the allocation.

use crate::error::{BenchError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of zeroed guard bytes appended after the logical corpus contents.
pub const CORPUS_PADDING: usize = 64;

/// Default maximum corpus size (1 GB).
///
/// Can be overridden through `BenchConfig::with_max_corpus_size`.
pub const DEFAULT_MAX_CORPUS_SIZE: u64 = 1024 * 1024 * 1024;

/// An immutable, padded input buffer.
#[derive(Debug, Clone)]
pub struct Corpus {
    path: PathBuf,
    bytes: Vec<u8>,
    volume: usize,
}

impl Corpus {
    /// Builds a corpus from in-memory bytes.
    pub fn from_bytes(path: impl Into<PathBuf>, data: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(data.len() + CORPUS_PADDING);
        bytes.extend_from_slice(data);
        bytes.resize(data.len() + CORPUS_PADDING, 0);
        Self {
            path: path.into(),
            bytes,
            volume: data.len(),
        }
    }

    /// Loads a corpus from disk.
    ///
    /// The file size is checked against `max_size` before any memory is
    /// allocated for its contents.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::CorpusLoad`] if the file cannot be read and
    /// [`BenchError::CorpusTooLarge`] if it exceeds `max_size`.
    pub fn load(path: impl AsRef<Path>, max_size: u64) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| BenchError::corpus_load(path, e))?;

        if !metadata.is_file() {
            return Err(BenchError::CorpusLoad {
                path: path.to_path_buf(),
                message: "not a regular file".to_string(),
            });
        }

        if metadata.len() > max_size {
            return Err(BenchError::CorpusTooLarge {
                path: path.to_path_buf(),
                actual: metadata.len(),
                max: max_size,
            });
        }

        let data = fs::read(path).map_err(|e| BenchError::corpus_load(path, e))?;
        Ok(Self::from_bytes(path, &data))
    }

    /// Returns the path the corpus was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the logical contents, without padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.volume]
    }

    /// Returns the contents followed by the zeroed padding.
    pub fn padded(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the logical size in bytes.
    pub fn volume(&self) -> usize {
        self.volume
    }

    /// Returns whether the corpus has no logical contents.
    pub fn is_empty(&self) -> bool {
        self.volume == 0
    }

    /// Human-readable size classification, e.g. `"3 MB"`, `"12 KB"`, `"512 B"`.
    pub fn size_label(&self) -> String {
        size_label(self.volume)
    }
}

/// Classifies a byte count the way the narrative report prints it.
///
/// Sizes strictly above one binary megabyte are printed in MB, sizes strictly
/// above one binary kilobyte in KB, everything else in bytes.
pub fn size_label(volume: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;

    if volume > MB {
        format!("{} MB", volume / MB)
    } else if volume > KB {
        format!("{} KB", volume / KB)
    } else {
        format!("{} B", volume)
    }
}
