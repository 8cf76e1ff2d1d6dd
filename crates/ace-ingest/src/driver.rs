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

//! The state-machine driver.
//!
//! One [`advance`](ParseContext::advance) call makes one transition: scan a
//! head, acquire a checkout, walk one body line, or commit.
//! [`step`](ParseContext::step) composes transitions per [`StepMode`]. Failures are
//! classified and recorded, never returned: after any failure the scanner
//! resyncs at the next paragraph boundary, treating verb-prefixed lines as
//! implicit boundaries so batched directives after a bad paragraph are not
//! lost. The single exception is a commit-time failure, where the scanner is
//! already at a boundary and must not re-scan.

use crate::context::{ParseContext, ParseOptions, ParseState, StepMode};
use crate::diagnostic::{Diagnostic, Failure};
use crate::dispatch::{dispatch_head, HeadAction, VerbOutcome};
use crate::lex::split_words;
use crate::registry::{ArrayOutcome, ArrayRegistry};
use crate::source::TokenSource;
use crate::stats::ParseStats;
use crate::walker::walk_line;
use ace_core::{Database, Key};
use std::io::Read;

/// The finished state of one `parse_stream`/`parse_text` run.
#[derive(Debug)]
pub struct ParseReport {
    /// True when no error was observed.
    pub ok: bool,
    pub stats: ParseStats,
    /// Keys committed, in commit order.
    pub touched: Vec<Key>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Ingest a whole stream against a database.
pub fn parse_stream(
    db: &mut Database,
    registry: &ArrayRegistry,
    reader: Box<dyn Read>,
    options: ParseOptions,
) -> ParseReport {
    run(ParseContext::new(TokenSource::new(reader), options), db, registry)
}

/// Ingest in-memory ACE text against a database.
pub fn parse_text(
    db: &mut Database,
    registry: &ArrayRegistry,
    text: &str,
    options: ParseOptions,
) -> ParseReport {
    run(ParseContext::from_text(text, options), db, registry)
}

fn run(mut ctx: ParseContext, db: &mut Database, registry: &ArrayRegistry) -> ParseReport {
    ctx.step(db, registry, StepMode::Full);
    if !ctx.options.quiet {
        eprintln!("{}", ctx.stats.summary(ctx.options.full_stats));
    }
    ParseReport {
        ok: !ctx.error_seen,
        stats: ctx.stats,
        touched: ctx.touched,
        diagnostics: ctx.diagnostics,
    }
}

impl ParseContext {
    /// Drive the machine per `mode`. See [`StepMode`] for granularity;
    /// failures land in the statistics and diagnostics, never in a return
    /// value.
    pub fn step(&mut self, db: &mut Database, registry: &ArrayRegistry, mode: StepMode) {
        match mode {
            StepMode::Abort => self.abort(db),
            StepMode::SkipCurrentObject => {
                if let Some(cursor) = self.cursor.take() {
                    db.discard(cursor);
                }
                if matches!(self.state, ParseState::Inside | ParseState::RefBlocked) {
                    self.skip_to_boundary();
                    self.clear_object();
                    self.state = ParseState::Outside;
                }
            }
            StepMode::UntilObjectBoundary => {
                if self.state == ParseState::Done {
                    return;
                }
                loop {
                    self.advance(db, registry);
                    if matches!(self.state, ParseState::Outside | ParseState::Done) {
                        break;
                    }
                }
            }
            StepMode::Full => {
                while self.state != ParseState::Done
                    && !(self.error_seen && !self.options.keep_going)
                {
                    self.advance(db, registry);
                }
                if self.state != ParseState::Done {
                    // Stopping at the first error still releases everything.
                    self.abort(db);
                }
            }
        }
    }

    /// Make exactly one state transition: scan one head, acquire one
    /// checkout, walk one body line, or commit one object. Exposed for
    /// interactive callers that need line-level granularity.
    pub fn advance(&mut self, db: &mut Database, registry: &ArrayRegistry) {
        match self.state {
            ParseState::Done => {}
            ParseState::Outside => self.advance_outside(db, registry),
            ParseState::RefBlocked => self.advance_checkout(db),
            ParseState::Inside => self.advance_inside(db),
        }
    }

    // ==================== transitions ====================

    fn advance_outside(&mut self, db: &mut Database, registry: &ArrayRegistry) {
        let (line_number, line) = match self.source.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                self.finish(db);
                return;
            }
            Err(e) => {
                self.fail(Failure::fatal(format!("read failed: {}", e)), db);
                return;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        if trimmed.starts_with('!') {
            // Comment paragraph, skipped wholesale.
            self.skip_to_boundary();
            return;
        }

        self.stats.nob += 1;
        self.obj_head = trimmed.to_string();
        self.obj_line = line_number;

        let words = match split_words(trimmed) {
            Ok(words) => words,
            Err(msg) => {
                self.fail(Failure::general(msg), db);
                self.skip_to_boundary();
                return;
            }
        };
        if words.is_empty() {
            return;
        }

        match dispatch_head(db, &self.options, &words) {
            Ok(HeadAction::Verb(outcome)) => {
                match outcome {
                    VerbOutcome::Deleted => self.stats.ndeleted += 1,
                    VerbOutcome::Renamed => self.stats.nrenamed += 1,
                    VerbOutcome::Aliased => self.stats.naliased += 1,
                }
                self.stats.nok += 1;
            }
            Ok(HeadAction::Array { key }) => self.run_array_parser(db, registry, key),
            Ok(HeadAction::Tree { key, is_new, stamp }) => {
                self.obj_key = Some(key);
                self.is_new = is_new;
                self.stamp = stamp;
                self.state = ParseState::RefBlocked;
            }
            Err(failure) => {
                let fatal = failure.fatal;
                self.fail(failure, db);
                if !fatal {
                    self.skip_to_boundary();
                }
            }
        }
    }

    fn run_array_parser(&mut self, db: &mut Database, registry: &ArrayRegistry, key: Key) {
        let Some(parser) = registry.get(key.class) else {
            self.fail(
                Failure::array(format!("no parser available for class {}", key.class)),
                db,
            );
            self.skip_to_boundary();
            return;
        };
        match parser.parse(&mut self.source, db, key) {
            ArrayOutcome::Ok => {
                self.stats.narray_added += 1;
                self.stats.nok += 1;
                self.touched.push(key);
            }
            ArrayOutcome::Empty => {
                self.stats.narray_empty += 1;
                self.stats.nok += 1;
            }
            // The parser consumed its own paragraph; no re-scan.
            ArrayOutcome::Err(msg) => self.fail(Failure::array(msg), db),
        }
    }

    fn advance_checkout(&mut self, db: &mut Database) {
        let Some(key) = self.obj_key else {
            self.state = ParseState::Outside;
            return;
        };
        match db.checkout(key) {
            Ok(cursor) => {
                self.cursor = Some(cursor);
                self.state = ParseState::Inside;
            }
            Err(e) => {
                self.fail(Failure::object(e.message), db);
                self.skip_to_boundary();
                self.clear_object();
                self.state = ParseState::Outside;
            }
        }
    }

    fn advance_inside(&mut self, db: &mut Database) {
        let line = match self.source.next_line() {
            Ok(line) => line,
            Err(e) => {
                self.fail(Failure::fatal(format!("read failed: {}", e)), db);
                return;
            }
        };
        let at_end = match &line {
            None => true,
            // A comment line terminates the paragraph without being parsed.
            Some((_, text)) => text.trim().is_empty() || text.trim_start().starts_with('!'),
        };
        if at_end {
            self.commit_object(db);
            return;
        }

        let (_, text) = match line {
            Some(l) => l,
            None => return,
        };
        let words = match split_words(&text) {
            Ok(words) => words,
            Err(msg) => {
                self.fail_object(Failure::object(msg), db);
                return;
            }
        };
        if words.is_empty() {
            return;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            self.state = ParseState::Outside;
            return;
        };
        if let Err(failure) = walk_line(db, cursor, &words) {
            self.fail_object(failure, db);
        }
    }

    fn commit_object(&mut self, db: &mut Database) {
        let Some(cursor) = self.cursor.take() else {
            self.clear_object();
            self.state = ParseState::Outside;
            return;
        };
        let key = cursor.key();
        // An explicit timestamp override only applies to objects created by
        // this paragraph.
        let stamp = if self.is_new { self.stamp } else { None };
        match db.commit(cursor, stamp) {
            Ok(outcome) => {
                use ace_core::CommitOutcome;
                match outcome {
                    CommitOutcome::Added => self.stats.nadded += 1,
                    CommitOutcome::Edited => self.stats.nedited += 1,
                    CommitOutcome::Unchanged => self.stats.nunchanged += 1,
                }
                self.stats.nok += 1;
                self.touched.push(key);
            }
            Err(e) => {
                // Commit-time failure: the scanner is already at a paragraph
                // boundary, so no re-scan here.
                self.fail(Failure::object(e.message), db);
            }
        }
        self.clear_object();
        self.state = ParseState::Outside;
    }

    // ==================== recovery ====================

    /// Record an object failure mid-body: discard the cursor, resync, and
    /// return to scanning.
    fn fail_object(&mut self, failure: Failure, db: &mut Database) {
        if let Some(cursor) = self.cursor.take() {
            db.discard(cursor);
        }
        let fatal = failure.fatal;
        self.fail(failure, db);
        if !fatal {
            self.skip_to_boundary();
            self.clear_object();
            self.state = ParseState::Outside;
        }
    }

    /// Record a failure in the statistics and diagnostics. Fatal failures
    /// abort the whole run.
    fn fail(&mut self, failure: Failure, db: &mut Database) {
        // The last line handed out is where the failure was observed; for
        // head errors that is the head line itself.
        let line = match self.source.line_number() {
            0 => self.obj_line,
            n => n,
        };
        let diag = Diagnostic::parse(failure.category, line, &self.obj_head, failure.message);
        if !self.options.quiet {
            eprintln!("{}", diag);
        }
        self.diagnostics.push(diag);
        self.stats.record_error(failure.category);
        self.error_seen = true;
        if failure.fatal {
            self.abort(db);
        }
    }

    /// Consume lines until a paragraph boundary: a blank line, end of
    /// stream, or a verb-prefixed or `>` head, which is pushed back so the
    /// next scan sees it. Comment lines are consumed.
    fn skip_to_boundary(&mut self) {
        loop {
            match self.source.next_line() {
                Ok(Some((n, line))) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        return;
                    }
                    if trimmed.starts_with('!') {
                        continue;
                    }
                    let first = trimmed.split_whitespace().next().unwrap_or("");
                    if matches!(first, "-D" | "-R" | "-A") || first.starts_with('>') {
                        self.source.push_back(n, line);
                        return;
                    }
                }
                Ok(None) | Err(_) => return,
            }
        }
    }

    /// Natural end of stream: release the source, surface the truncation
    /// warning if the byte accounting came up short.
    fn finish(&mut self, db: &mut Database) {
        if let Some(cursor) = self.cursor.take() {
            db.discard(cursor);
        }
        if self.source.truncated() {
            let diag = Diagnostic::Truncated {
                consumed: self.source.consumed(),
                declared: self.source.declared(),
            };
            if !self.options.quiet {
                eprintln!("{}", diag);
            }
            self.diagnostics.push(diag);
        }
        self.source.release();
        self.clear_object();
        self.state = ParseState::Done;
    }

    /// Cancel the run: uncommitted edits are discarded and the checkout is
    /// released, never left dangling.
    fn abort(&mut self, db: &mut Database) {
        if let Some(cursor) = self.cursor.take() {
            db.discard(cursor);
        }
        self.source.release();
        self.clear_object();
        self.state = ParseState::Done;
    }
}
