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

//! Pipeline driver: archive in, report out.
//!
//! The stages run in lock-step on one thread. The scanner pulls decoded bytes
//! from the archive on demand and the aggregator consumes each event before
//! the next one is read. Every failure except an unwritable result file ends
//! the run without writing a report.

use crate::aggregate::OsmAggregator;
use crate::config::Config;
use crate::error::{StatsError, StatsResult};
use crate::report::Report;
use crate::scanner::EventScanner;
use crate::source::open_archive;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where a report was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    /// No result file was configured.
    Stdout,
    /// The configured result file.
    File(PathBuf),
    /// The result file failed; the report went to standard output instead.
    StdoutFallback(StatsError),
}

/// Read an archive and aggregate its statistics.
///
/// # Errors
///
/// - [`StatsError::Configuration`] if `config` does not validate
/// - [`StatsError::Source`] if the archive cannot be opened or decoded
/// - [`StatsError::Scan`] if the decoded XML is malformed
pub fn analyze(config: &Config) -> StatsResult<Report> {
    config.validate()?;

    debug!(archive = %config.archive_path().display(), "Start reading archive");
    let archive = open_archive(config.archive_path(), config.buffer_size())?;
    let report = analyze_reader(archive, config.archive_path())?;
    debug!("End reading archive");

    Ok(report)
}

/// Aggregate statistics from an already decoded XML stream.
///
/// `origin` names the stream in decoder error messages.
///
/// # Examples
///
/// ```rust
/// use osmstat::pipeline::analyze_reader;
/// use std::io::Cursor;
/// use std::path::Path;
///
/// let xml = r#"<osm><node user="alice"><tag k="name"/></node></osm>"#;
/// let report = analyze_reader(Cursor::new(xml), Path::new("inline"))?;
///
/// assert_eq!(report.user_counts().count("alice"), 1);
/// assert_eq!(report.tag_key_counts().count("name"), 1);
/// # Ok::<(), osmstat::StatsError>(())
/// ```
pub fn analyze_reader<R: BufRead>(reader: R, origin: &Path) -> StatsResult<Report> {
    debug!("Start parsing xml");
    let mut scanner = EventScanner::new(reader).with_origin(origin);
    let mut aggregator = OsmAggregator::new();
    aggregator.consume(&mut scanner)?;
    debug!(bytes = scanner.position(), "End parsing xml");

    info!(
        nodes = aggregator.nodes_seen(),
        tags = aggregator.tags_seen(),
        users = aggregator.user_counts().len(),
        tag_keys = aggregator.tag_key_counts().len(),
        "Archive aggregated"
    );

    Ok(aggregator.into_report())
}

/// Write a report to the result file, or to `stdout` if none is configured.
///
/// If the result file cannot be created or written, a warning is logged and
/// the full report is written to `stdout` instead.
///
/// # Errors
///
/// Returns [`StatsError::Sink`] only if writing to `stdout` itself fails.
pub fn emit_report<W: Write>(
    report: &Report,
    result_path: Option<&Path>,
    stdout: &mut W,
) -> StatsResult<ReportDestination> {
    debug!("Start printing report");
    let rendered = report.to_string();

    let destination = match result_path {
        None => {
            write_stdout(stdout, &rendered)?;
            ReportDestination::Stdout
        }
        Some(path) => match write_file(path, &rendered) {
            Ok(()) => ReportDestination::File(path.to_path_buf()),
            Err(err) => {
                warn!(error = %err, "Falling back to standard output");
                write_stdout(stdout, &rendered)?;
                ReportDestination::StdoutFallback(err)
            }
        },
    };

    debug!("End printing report");
    Ok(destination)
}

/// Run the whole pipeline for one configuration.
///
/// # Errors
///
/// Returns the first fatal error. A failing result file is not an error; see
/// [`emit_report`].
pub fn run(config: &Config) -> StatsResult<ReportDestination> {
    let report = analyze(config)?;
    let mut stdout = io::stdout().lock();
    emit_report(&report, config.result_path(), &mut stdout)
}

fn write_file(path: &Path, content: &str) -> StatsResult<()> {
    let file = File::create(path).map_err(|e| StatsError::sink_io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| StatsError::sink_io(path, e))
}

fn write_stdout<W: Write>(stdout: &mut W, content: &str) -> StatsResult<()> {
    stdout
        .write_all(content.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| StatsError::sink_io("<stdout>", e))
}
