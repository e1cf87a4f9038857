// Dweve OSMStat - OpenStreetMap archive statistics
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
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

//! Run configuration.

use crate::error::{StatsError, StatsResult};
use std::path::{Path, PathBuf};

/// Default read buffer size for the archive and the decoded stream (64KB).
pub const DEFAULT_BUFFER_SIZE: usize = 65536;

/// Configuration for one analysis run.
///
/// Produced once by the command-line layer and never mutated afterwards.
///
/// # Examples
///
/// ```rust
/// use osmstat::Config;
///
/// let config = Config::new("planet.osm.bz2", Some("report.txt"));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.result_path().unwrap().to_str(), Some("report.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    archive_path: PathBuf,
    result_path: Option<PathBuf>,
    buffer_size: usize,
}

impl Config {
    /// Create a configuration with the default buffer size.
    pub fn new(archive_path: impl Into<PathBuf>, result_path: Option<impl Into<PathBuf>>) -> Self {
        Self {
            archive_path: archive_path.into(),
            result_path: result_path.map(Into::into),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Override the read buffer size.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Path of the bzip2-compressed archive.
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Path of the report file, if one was requested.
    pub fn result_path(&self) -> Option<&Path> {
        self.result_path.as_deref()
    }

    /// Read buffer size in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Check the configuration before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Configuration`] if the archive path or a given
    /// result path is empty, or the buffer size is zero.
    pub fn validate(&self) -> StatsResult<()> {
        if self.archive_path.as_os_str().is_empty() {
            return Err(StatsError::configuration("archive path is empty"));
        }
        if matches!(&self.result_path, Some(p) if p.as_os_str().is_empty()) {
            return Err(StatsError::configuration("result path is empty"));
        }
        if self.buffer_size == 0 {
            return Err(StatsError::configuration("buffer size must be greater than zero"));
        }
        Ok(())
    }
}
