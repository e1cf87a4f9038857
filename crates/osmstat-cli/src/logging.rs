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

//! Log subscriber setup.
//!
//! Logs go to stderr so the report on stdout stays clean. `RUST_LOG`, when
//! set, replaces the verbosity chosen on the command line.

use crate::error::CliError;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Filter directives for a `-v` count.
pub fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "osmstat=info,osmstat_cli=info",
        1 => "osmstat=debug,osmstat_cli=debug",
        _ => "osmstat=trace,osmstat_cli=trace",
    }
}

/// Install the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`CliError::Logging`] if a subscriber is already installed.
pub fn init(verbose: u8) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
