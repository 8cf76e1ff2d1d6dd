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

//! Resumable ingestion parser for the ACE paragraph text format.
//!
//! The ACE format is line-oriented: blank-line-delimited paragraphs each
//! describe one object creation, edit, deletion, rename, or alias against an
//! [`ace_core::Database`]. A paragraph head names a class and an object
//! (`Gene : "abc"`), optionally prefixed with a verb (`-D`, `-R`, `-A`); the
//! body lines walk the class's tag model one tag expression per line.
//!
//! Parsing is a resumable state machine. The usual entry points drive it to
//! completion:
//!
//! ```no_run
//! use ace_core::Database;
//! use ace_ingest::{parse_text, ArrayRegistry, ParseOptions};
//!
//! let mut db = Database::new();
//! let registry = ArrayRegistry::new();
//! let report = parse_text(
//!     &mut db,
//!     &registry,
//!     "Gene : \"abc\"\nTitle \"hello\"\n\n",
//!     ParseOptions::default(),
//! );
//! assert!(report.ok);
//! ```
//!
//! Interactive callers instead hold a [`ParseContext`] and call
//! [`ParseContext::step`] with a [`StepMode`], getting control back after one
//! object (or one skipped object, or an abort). Errors never cross the step
//! boundary as `Err`: they are classified, counted in [`ParseStats`], and
//! collected as [`Diagnostic`]s, and the `keep_going` option decides whether
//! a full run stops at the first failure.

mod context;
mod diagnostic;
mod dispatch;
mod driver;
mod lex;
mod registry;
mod source;
mod stats;
mod walker;

pub use context::{ParseContext, ParseOptions, ParseOptionsBuilder, ParseState, StepMode};
pub use diagnostic::{Diagnostic, ErrorCategory};
pub use driver::{parse_stream, parse_text, ParseReport};
pub use registry::{ArrayOutcome, ArrayParser, ArrayRegistry};
pub use source::TokenSource;
pub use stats::ParseStats;
