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

//! Error types for archive statistics.
//!
//! Every stage of the pipeline reports failures through [`StatsError`]. The
//! variants mirror the failure taxonomy of the pipeline: configuration
//! problems, unreadable archives, malformed XML and unwritable result files.
//! A sink error on the configured result file is recovered by the driver,
//! which falls back to standard output.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors produced while reading an archive and emitting its report.
///
/// # Examples
///
/// ```rust
/// use osmstat::StatsError;
///
/// let err = StatsError::scan(42, "unexpected end of file");
/// assert_eq!(err.to_string(), "XML scan error at position 42: unexpected end of file");
/// assert!(err.is_fatal());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The run configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The archive is missing, unreadable, or not a valid bzip2 stream.
    #[error("Archive error for '{path}': {message}")]
    Source {
        /// Archive path that failed
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// The decompressed content is not well-formed XML.
    #[error("XML scan error at position {position}: {message}")]
    Scan {
        /// Byte offset in the decompressed stream
        position: usize,
        /// Description of the syntax problem
        message: String,
    },

    /// The configured result file could not be opened or written.
    #[error("Cannot write report to '{path}': {message}")]
    Sink {
        /// Result path that failed
        path: PathBuf,
        /// Underlying error message
        message: String,
    },
}

impl StatsError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a source error from an I/O failure on the archive.
    ///
    /// ```rust
    /// use osmstat::StatsError;
    /// use std::io;
    ///
    /// let err = StatsError::source_io(
    ///     "planet.osm.bz2",
    ///     io::Error::new(io::ErrorKind::NotFound, "No such file"),
    /// );
    /// assert!(err.to_string().contains("planet.osm.bz2"));
    /// ```
    pub fn source_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Source {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a source error with a custom message.
    pub fn source(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Source {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a scan error at a byte offset of the decoded stream.
    pub fn scan(position: usize, msg: impl Into<String>) -> Self {
        Self::Scan {
            position,
            message: msg.into(),
        }
    }

    /// Create a sink error from an I/O failure on the result file.
    pub fn sink_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Sink {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Whether the error aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Sink { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = StatsError::configuration("archive path is empty");
        assert_eq!(err.to_string(), "Configuration error: archive path is empty");
    }

    #[test]
    fn test_source_io_display() {
        let err = StatsError::source_io(
            "missing.osm.bz2",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.osm.bz2"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_scan_display() {
        let err = StatsError::scan(17, "mismatched end tag");
        assert_eq!(err.to_string(), "XML scan error at position 17: mismatched end tag");
    }

    #[test]
    fn test_sink_is_not_fatal() {
        let err = StatsError::sink_io(
            "/readonly/out.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_errors() {
        assert!(StatsError::configuration("x").is_fatal());
        assert!(StatsError::source("a.bz2", "bad magic").is_fatal());
        assert!(StatsError::scan(0, "bad").is_fatal());
    }

    #[test]
    fn test_error_cloning() {
        let err = StatsError::source("a.bz2", "bad magic");
        assert_eq!(err.clone(), err);
    }
}
