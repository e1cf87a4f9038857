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

//! OSMStat command-line interface.
//!
//! Thin wrapper around the `osmstat` library: argument parsing, logging
//! setup and exit codes.
//!
//! # Usage
//!
//! ```bash
//! # Print the report to stdout
//! osmstat -a RU-NVS.osm.bz2
//!
//! # Save the report to a file, with debug logging
//! osmstat -a RU-NVS.osm.bz2 -r report.txt -v
//!
//! # Fine-grained logging
//! RUST_LOG=osmstat=trace osmstat -a RU-NVS.osm.bz2
//! ```
//!
//! # Exit codes
//!
//! - `0`: report written (possibly to stdout after a result file failure)
//! - `1`: invalid command line, unreadable archive, or malformed XML

pub mod cli;
pub mod error;
pub mod logging;

pub use cli::Cli;
pub use error::CliError;
