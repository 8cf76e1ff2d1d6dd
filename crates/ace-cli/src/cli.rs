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

//! CLI command definitions and argument parsing.

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Top-level `ace` commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Ingest an ACE file against a model
    Ingest(IngestArgs),
    /// Validate a model description file and print its class table
    Model {
        /// Model description file
        file: PathBuf,
    },
}

/// Arguments for `ace ingest`.
#[derive(Args)]
pub struct IngestArgs {
    /// ACE file to ingest
    pub file: PathBuf,

    /// Model description file declaring classes and tags
    #[arg(short, long)]
    pub model: PathBuf,

    /// Continue after errors instead of stopping at the first one
    #[arg(long)]
    pub keep_going: bool,

    /// Suppress per-error diagnostics and the summary line
    #[arg(long)]
    pub quiet: bool,

    /// Append the per-outcome and per-category breakdown to the summary
    #[arg(long)]
    pub full_stats: bool,

    /// Allow edits to protected classes
    #[arg(long)]
    pub allow_protected: bool,

    /// Array class targeted by the '>' FASTA-style shorthand
    #[arg(long)]
    pub fasta_class: Option<String>,
}

impl Commands {
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Ingest(args) => commands::ingest(args),
            Commands::Model { file } => commands::model(&file),
        }
    }
}
