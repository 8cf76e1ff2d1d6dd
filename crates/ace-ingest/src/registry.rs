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

//! The array-class parser registry.
//!
//! Array-typed classes bypass the tree model entirely: their paragraph
//! bodies are handed to whichever parser is registered for the class. The
//! registry is populated before parsing starts and read-only during it.
//!
//! A registered parser owns its paragraph: it must consume the body up to
//! and including the terminating blank line (or end of stream), even when it
//! reports an error. The driver does not re-scan after an array parser runs.

use crate::source::TokenSource;
use ace_core::{ClassId, Database, Key};
use std::collections::HashMap;

/// What an array parser did with its paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayOutcome {
    /// Data parsed and stored.
    Ok,
    /// The paragraph was well-formed but carried no data.
    Empty,
    /// Parse failure, with a reason.
    Err(String),
}

/// A pluggable parser for one array-typed class.
pub trait ArrayParser: Send + Sync {
    fn parse(&self, source: &mut TokenSource, db: &mut Database, key: Key) -> ArrayOutcome;
}

impl<F> ArrayParser for F
where
    F: Fn(&mut TokenSource, &mut Database, Key) -> ArrayOutcome + Send + Sync,
{
    fn parse(&self, source: &mut TokenSource, db: &mut Database, key: Key) -> ArrayOutcome {
        self(source, db, key)
    }
}

/// Class-indexed table of array parsers.
#[derive(Default)]
pub struct ArrayRegistry {
    parsers: HashMap<u8, Box<dyn ArrayParser>>,
}

impl ArrayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parser for a class, replacing any previous one.
    pub fn register(&mut self, class: ClassId, parser: Box<dyn ArrayParser>) {
        self.parsers.insert(class.0, parser);
    }

    /// The parser for a class, if one is registered.
    pub fn get(&self, class: ClassId) -> Option<&dyn ArrayParser> {
        self.parsers.get(&class.0).map(|b| b.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}
