// ace - object ingestion toolkit for the ACE text format
//
// Copyright (c) 2025 The ace contributors.
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

//! Structured error types for the `ace` CLI.

use std::path::PathBuf;
use thiserror::Error;

/// All error conditions the CLI can surface to the user.
#[derive(Error, Debug)]
pub enum CliError {
    /// I/O failure, with the file it concerned.
    #[error("I/O error for '{path}': {message}")]
    Io {
        path: PathBuf,
        message: String,
    },

    /// A model description file did not parse.
    #[error("model error in '{path}' at line {line}: {message}")]
    Model {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The ingestion run observed errors.
    #[error("{count} error(s) during ingestion")]
    Ingest { count: u64 },
}

impl CliError {
    pub fn io_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
