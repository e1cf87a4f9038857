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

//! Text report of the two frequency counters.
//!
//! Layout:
//!
//! ```text
//! ***************Node users statistic***************
//! alice 2
//! bob 1
//!
//! ***************Tag keys statistic***************
//! name 2
//! ```
//!
//! The user block is sorted by count, highest first (stable, so ties keep
//! first-seen order). The tag-key block is emitted in first-seen order.

use crate::aggregate::FrequencyCounter;
use std::fmt;
use std::io::{self, Write};

/// Header preceding the user block.
pub const USER_HEADER: &str = "***************Node users statistic***************";
/// Header preceding the tag-key block.
pub const TAG_HEADER: &str = "***************Tag keys statistic***************";

/// Final counters of one run, ready to be written out.
///
/// # Examples
///
/// ```rust
/// use osmstat::{FrequencyCounter, Report};
///
/// let mut users = FrequencyCounter::new();
/// users.increment("alice");
/// let report = Report::new(users, FrequencyCounter::new());
///
/// let text = report.to_string();
/// assert!(text.contains("alice 1\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    user_counts: FrequencyCounter,
    tag_key_counts: FrequencyCounter,
}

impl Report {
    /// Bundle the two counters.
    pub fn new(user_counts: FrequencyCounter, tag_key_counts: FrequencyCounter) -> Self {
        Self {
            user_counts,
            tag_key_counts,
        }
    }

    /// Node counts per user.
    pub fn user_counts(&self) -> &FrequencyCounter {
        &self.user_counts
    }

    /// Tag counts per key.
    pub fn tag_key_counts(&self) -> &FrequencyCounter {
        &self.tag_key_counts
    }

    /// Write the report to a sink.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error raised by the sink.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", USER_HEADER)?;
        for (user, count) in self.user_counts.sorted_by_count() {
            writeln!(f, "{} {}", user, count)?;
        }

        writeln!(f)?;

        writeln!(f, "{}", TAG_HEADER)?;
        for (key, count) in self.tag_key_counts.iter() {
            writeln!(f, "{} {}", key, count)?;
        }
        Ok(())
    }
}
