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

//! Object store, lexicon, and class models for the ACE text format.
//!
//! This crate provides the collaborators the ACE ingestion parser edits
//! against:
//!
//! - a [`Lexicon`] resolving human-readable names to stable, class-scoped
//!   [`Key`]s, with alias and rename primitives;
//! - class metadata ([`ClassDef`]) and per-class tag models ([`Model`],
//!   [`TagSpec`]) constraining which tags and typed values an object may
//!   carry;
//! - an [`ObjectStore`] of tree-shaped objects with exclusive checkout
//!   ([`Cursor`]), atomic commit through a constraint gate, and per-object
//!   creation stamps;
//! - the [`Database`] facade tying the three together under one session.
//!
//! The parser lives in the `ace-ingest` crate; everything here is usable on
//! its own for programmatic edits.

mod cursor;
mod database;
mod error;
mod key;
mod lexicon;
mod model;
mod store;
mod tree;
mod value;

pub use cursor::Cursor;
pub use database::Database;
pub use error::{AceError, AceErrorKind, AceResult};
pub use key::{ClassId, Key};
pub use lexicon::Lexicon;
pub use model::{ClassDef, ClassKind, ColumnType, Model, TagSpec};
pub use store::{CommitOutcome, Constraint, ObjectStore};
pub use tree::{ObjectTree, TreeNode};
pub use value::{canonical_float, parse_ace_date, Value, FLOAT_EPSILON};
