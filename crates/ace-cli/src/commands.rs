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

//! Command implementations.

use crate::cli::IngestArgs;
use crate::error::CliError;
use crate::model_file;
use ace_core::{ClassKind, Database, Key};
use ace_ingest::{
    ArrayOutcome, ArrayRegistry, ParseContext, ParseOptions, StepMode, TokenSource,
};
use colored::Colorize;
use std::fs::File;
use std::path::Path;

/// `ace ingest`: build a database from the model file, ingest the ACE file,
/// print diagnostics and the summary.
pub fn ingest(args: IngestArgs) -> Result<(), CliError> {
    let mut db = model_file::load_model(&args.model)?;
    let registry = raw_array_registry(&db);

    let file = File::open(&args.file).map_err(|e| CliError::io_error(&args.file, e))?;
    let declared = file
        .metadata()
        .map_err(|e| CliError::io_error(&args.file, e))?
        .len();
    let source = TokenSource::new(Box::new(file)).with_declared_len(declared);

    let mut options = ParseOptions::builder()
        .keep_going(args.keep_going)
        .quiet(args.quiet)
        .full_stats(args.full_stats)
        .allow_protected(args.allow_protected);
    if let Some(class) = args.fasta_class {
        options = options.fasta_class(class);
    }

    let mut ctx = ParseContext::new(source, options.build());
    ctx.step(&mut db, &registry, StepMode::Full);

    if !args.quiet {
        eprintln!("{}", ctx.stats().summary(args.full_stats));
    }
    let errors = ctx.stats().nerr;
    if errors > 0 && !args.keep_going {
        return Err(CliError::Ingest { count: errors });
    }
    println!(
        "{} {} paragraph(s) processed, {} object(s) committed",
        "done:".green().bold(),
        ctx.stats().nob,
        ctx.touched().len()
    );
    Ok(())
}

/// `ace model`: validate a model description file and print the class table.
pub fn model(path: &Path) -> Result<(), CliError> {
    let db = model_file::load_model(path)?;
    for (id, def) in db.classes() {
        let kind = match def.kind {
            ClassKind::Tree => "tree",
            ClassKind::Array => "array",
        };
        let mut flags = Vec::new();
        if def.protected {
            flags.push("protected");
        }
        if def.known_only {
            flags.push("known-only");
        }
        let tags = def.model.as_ref().map_or(0, |m| m.tags.len());
        println!(
            "{:>3}  {:<20} {:<6} tags: {:<3} {}",
            id,
            def.name,
            kind,
            tags,
            flags.join(" ")
        );
    }
    Ok(())
}

/// The CLI's array parsers: every array class gets a raw-text parser storing
/// the paragraph body verbatim. Domain-specific formats belong to library
/// callers who register their own.
fn raw_array_registry(db: &Database) -> ArrayRegistry {
    let mut registry = ArrayRegistry::new();
    for (id, def) in db.classes() {
        if def.kind != ClassKind::Array {
            continue;
        }
        registry.register(
            id,
            Box::new(|source: &mut TokenSource, db: &mut Database, key: Key| {
                let mut data = String::new();
                loop {
                    match source.next_line() {
                        Ok(Some((_, line))) => {
                            if line.trim().is_empty() {
                                break;
                            }
                            data.push_str(line.trim());
                            data.push('\n');
                        }
                        Ok(None) => break,
                        Err(e) => return ArrayOutcome::Err(format!("read failed: {}", e)),
                    }
                }
                if data.is_empty() {
                    ArrayOutcome::Empty
                } else {
                    db.put_array(key, data.into_bytes());
                    ArrayOutcome::Ok
                }
            }),
        );
    }
    registry
}
