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

//! The resumable parse context and its configuration.

use crate::diagnostic::Diagnostic;
use crate::source::TokenSource;
use crate::stats::ParseStats;
use ace_core::{Cursor, Key};

/// Lifecycle state of a [`ParseContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Between paragraphs, scanning for the next head.
    Outside,
    /// A tree object's key is resolved; the checkout has not happened yet.
    RefBlocked,
    /// A cursor is open and body lines are being walked.
    Inside,
    /// The stream is exhausted and released. Terminal.
    Done,
}

/// How much work one [`ParseContext::step`] call does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Drive the machine to `Done` (or to the first error when `keep_going`
    /// is off).
    Full,
    /// Return after the current object is closed (committed or failed).
    UntilObjectBoundary,
    /// Discard the current object without committing and resync.
    SkipCurrentObject,
    /// Discard any open cursor, release the stream, go to `Done`.
    Abort,
}

/// Configuration for one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Continue after errors instead of stopping at the first one.
    pub keep_going: bool,
    /// Suppress stderr diagnostics; they are still collected.
    pub quiet: bool,
    /// Include the per-outcome breakdown in the summary line.
    pub full_stats: bool,
    /// Allow edits to protected classes.
    pub allow_protected: bool,
    /// Class named by the `>` FASTA-style shorthand, if enabled.
    pub fasta_class: Option<String>,
}

impl ParseOptions {
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::default()
    }
}

/// Builder for [`ParseOptions`].
#[derive(Debug, Default)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    pub fn keep_going(mut self, yes: bool) -> Self {
        self.options.keep_going = yes;
        self
    }

    pub fn quiet(mut self, yes: bool) -> Self {
        self.options.quiet = yes;
        self
    }

    pub fn full_stats(mut self, yes: bool) -> Self {
        self.options.full_stats = yes;
        self
    }

    pub fn allow_protected(mut self, yes: bool) -> Self {
        self.options.allow_protected = yes;
        self
    }

    pub fn fasta_class(mut self, class: impl Into<String>) -> Self {
        self.options.fasta_class = Some(class.into());
        self
    }

    pub fn build(self) -> ParseOptions {
        self.options
    }
}

/// The parser's complete resumable state.
///
/// No work happens between [`step`](ParseContext::step) calls: the token
/// source and any open cursor stay exactly as left. Invariants: a cursor is
/// open if and only if the state is [`ParseState::Inside`];
/// [`ParseState::Done`] implies the source has been released.
pub struct ParseContext {
    pub(crate) source: TokenSource,
    pub(crate) state: ParseState,
    pub(crate) options: ParseOptions,
    pub(crate) stats: ParseStats,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) error_seen: bool,
    /// Keys committed this run, in commit order. Duplicate-tolerant.
    pub(crate) touched: Vec<Key>,

    // Object in flight, valid in RefBlocked and Inside.
    pub(crate) cursor: Option<Cursor>,
    pub(crate) obj_key: Option<Key>,
    pub(crate) obj_head: String,
    pub(crate) obj_line: usize,
    pub(crate) is_new: bool,
    pub(crate) stamp: Option<Key>,
}

impl ParseContext {
    /// A context over an arbitrary reader.
    pub fn new(source: TokenSource, options: ParseOptions) -> Self {
        Self {
            source,
            state: ParseState::Outside,
            options,
            stats: ParseStats::new(),
            diagnostics: Vec::new(),
            error_seen: false,
            touched: Vec::new(),
            cursor: None,
            obj_key: None,
            obj_head: String::new(),
            obj_line: 0,
            is_new: false,
            stamp: None,
        }
    }

    /// A context over in-memory text.
    pub fn from_text(text: &str, options: ParseOptions) -> Self {
        Self::new(TokenSource::from_text(text), options)
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any error has been observed this run.
    pub fn error_seen(&self) -> bool {
        self.error_seen
    }

    /// Keys committed so far, in commit order.
    pub fn touched(&self) -> &[Key] {
        &self.touched
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub(crate) fn clear_object(&mut self) {
        self.cursor = None;
        self.obj_key = None;
        self.obj_head.clear();
        self.obj_line = 0;
        self.is_new = false;
        self.stamp = None;
    }
}
