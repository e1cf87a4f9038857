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

//! Command-line arguments.

use crate::error::CliError;
use clap::{ArgAction, Parser};
use osmstat::{pipeline, Config, ReportDestination, DEFAULT_BUFFER_SIZE};
use std::path::PathBuf;
use tracing::info;

/// OSMStat - node user and tag key statistics for OpenStreetMap archives
///
/// Reads a bzip2-compressed OSM XML export and reports how many nodes each
/// user contributed (most active first) and how often each tag key is used
/// on nodes (in order of first appearance).
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "osmstat")]
#[command(author, version, about = "OSMStat - node user and tag key statistics for OpenStreetMap archives", long_about = None)]
pub struct Cli {
    /// Archive containing osm file for analysis
    #[arg(short = 'a', long = "archive-file", value_name = "FILE")]
    pub archive_file: PathBuf,

    /// The file where you want to save the result (defaults to stdout)
    #[arg(short = 'r', long = "result-file", value_name = "FILE")]
    pub result_file: Option<PathBuf>,

    /// Read buffer size in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Run configuration described by the arguments.
    pub fn config(&self) -> Config {
        Config::new(&self.archive_file, self.result_file.as_ref()).with_buffer_size(self.buffer_size)
    }

    /// Run the analysis and emit the report.
    ///
    /// # Errors
    ///
    /// Returns `Err` on any fatal pipeline error. An unwritable result file
    /// is not fatal; the report goes to stdout instead.
    pub fn execute(&self) -> Result<(), CliError> {
        let config = self.config();
        if let ReportDestination::File(path) = pipeline::run(&config)? {
            info!(path = %path.display(), "Report saved");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::path::Path;

    #[test]
    fn test_short_options() {
        let cli = Cli::try_parse_from(["osmstat", "-a", "map.osm.bz2", "-r", "out.txt"]).unwrap();
        assert_eq!(cli.archive_file, PathBuf::from("map.osm.bz2"));
        assert_eq!(cli.result_file, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_long_options() {
        let cli = Cli::try_parse_from([
            "osmstat",
            "--archive-file",
            "map.osm.bz2",
            "--result-file",
            "out.txt",
            "--buffer-size",
            "4096",
            "-vv",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.archive_path(), Path::new("map.osm.bz2"));
        assert_eq!(config.result_path(), Some(Path::new("out.txt")));
        assert_eq!(config.buffer_size(), 4096);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_result_file_is_optional() {
        let cli = Cli::try_parse_from(["osmstat", "-a", "map.osm.bz2"]).unwrap();
        assert!(cli.config().result_path().is_none());
    }

    #[test]
    fn test_archive_file_is_required() {
        let err = Cli::try_parse_from(["osmstat", "-r", "out.txt"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_buffer_size_must_be_numeric() {
        let err = Cli::try_parse_from(["osmstat", "-a", "x", "--buffer-size", "big"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
