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

//! Error types for the OSMStat CLI.

use osmstat::StatsError;
use thiserror::Error;

/// Errors that end a CLI run.
#[derive(Error, Debug)]
pub enum CliError {
    /// The analysis pipeline failed.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// The log subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
