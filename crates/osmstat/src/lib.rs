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

//! OSMStat - node-user and tag-key statistics for OpenStreetMap exports
//!
//! Reads a bzip2-compressed OpenStreetMap XML export in a single streaming
//! pass and reports:
//!
//! - how many `node` elements each contributing `user` created, sorted by
//!   count, highest first;
//! - how many `tag` elements inside nodes use each tag key `k`, in the order
//!   the keys were first seen.
//!
//! # Pipeline
//!
//! ```text
//! archive ─► source (bzip2) ─► scanner (XML events) ─► aggregator ─► report
//! ```
//!
//! - [`source`]: decompression of the archive into a forward-only byte stream
//! - [`scanner`]: pull-based [`StructuralEvent`] iterator over decoded XML
//! - [`aggregate`]: the node/tag nesting rule and the [`FrequencyCounter`]s
//! - [`report`]: text rendering of the counters
//! - [`pipeline`]: composition, sink selection and fallback
//!
//! Memory use is bounded by the number of distinct users and tag keys, not by
//! the size of the archive.
//!
//! # Examples
//!
//! ```rust,no_run
//! use osmstat::{pipeline, Config};
//!
//! let config = Config::new("region.osm.bz2", Some("report.txt"));
//! pipeline::run(&config)?;
//! # Ok::<(), osmstat::StatsError>(())
//! ```
//!
//! Logging goes through `tracing`; installing a subscriber is left to the
//! binary.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod source;

pub use aggregate::{FrequencyCounter, OsmAggregator};
pub use config::{Config, DEFAULT_BUFFER_SIZE};
pub use error::{StatsError, StatsResult};
pub use pipeline::{analyze, run, ReportDestination};
pub use report::Report;
pub use scanner::{EventScanner, StructuralEvent};
