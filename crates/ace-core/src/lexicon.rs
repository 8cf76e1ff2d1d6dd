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

//! Per-class name tables.
//!
//! Every object name lives in its class's table exactly once; the table
//! index is the object's [`Key`] id, so a key stays valid for the lifetime
//! of the database no matter how the object is later renamed or aliased.
//! Name lookup is case-insensitive but the table preserves the case of the
//! first spelling seen.

use crate::error::{AceError, AceResult};
use crate::key::{ClassId, Key};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct LexEntry {
    /// Canonical (display) name. Mutated by rename.
    name: String,
}

#[derive(Debug, Default)]
struct LexTable {
    entries: Vec<LexEntry>,
    /// Lowercased name -> entry id. Holds alias bindings too.
    index: HashMap<String, u32>,
}

/// Name tables for all classes of one database.
#[derive(Debug, Default)]
pub struct Lexicon {
    tables: HashMap<ClassId, LexTable>,
    /// Set while a rename is being applied, to catch re-entrant renames of
    /// the same lexicon from a constraint or array parser.
    renaming: bool,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a name without creating it.
    pub fn resolve(&self, class: ClassId, name: &str) -> Option<Key> {
        let table = self.tables.get(&class)?;
        let id = *table.index.get(&name.to_lowercase())?;
        Some(Key::new(class, id))
    }

    /// Look up a name, creating a fresh key if the name is unknown.
    pub fn resolve_or_create(&mut self, class: ClassId, name: &str) -> AceResult<Key> {
        if !is_valid_name(name) {
            return Err(AceError::lexicon(format!("invalid object name {:?}", name)));
        }
        let table = self.tables.entry(class).or_default();
        let lower = name.to_lowercase();
        if let Some(&id) = table.index.get(&lower) {
            return Ok(Key::new(class, id));
        }
        let id = u32::try_from(table.entries.len())
            .map_err(|_| AceError::lexicon("lexicon table full"))?;
        table.entries.push(LexEntry {
            name: name.to_string(),
        });
        table.index.insert(lower, id);
        Ok(Key::new(class, id))
    }

    /// Whether a name is already bound in a class.
    pub fn has(&self, class: ClassId, name: &str) -> bool {
        self.resolve(class, name).is_some()
    }

    /// The canonical name behind a key.
    pub fn name(&self, key: Key) -> Option<&str> {
        let table = self.tables.get(&key.class)?;
        table.entries.get(key.id as usize).map(|e| e.name.as_str())
    }

    /// Rename (or alias) the object behind `old` to `new_name`. The key is
    /// unchanged; only the name bindings move. With `keep_old` the previous
    /// name stays bound to the same key as an alias.
    ///
    /// Fails fatally if called while a rename is already in progress, and
    /// non-fatally if `new_name` is invalid or already bound to a different
    /// key.
    pub fn alias(&mut self, old: Key, new_name: &str, keep_old: bool) -> AceResult<Key> {
        if self.renaming {
            return Err(AceError::fatal("re-entrant rename on lexicon"));
        }
        if !is_valid_name(new_name) {
            return Err(AceError::lexicon(format!(
                "invalid object name {:?}",
                new_name
            )));
        }
        self.renaming = true;
        let result = self.alias_inner(old, new_name, keep_old);
        self.renaming = false;
        result
    }

    fn alias_inner(&mut self, old: Key, new_name: &str, keep_old: bool) -> AceResult<Key> {
        let table = self
            .tables
            .get_mut(&old.class)
            .ok_or_else(|| AceError::lexicon(format!("no such key {}", old)))?;
        let old_name = table
            .entries
            .get(old.id as usize)
            .map(|e| e.name.clone())
            .ok_or_else(|| AceError::lexicon(format!("no such key {}", old)))?;

        let new_lower = new_name.to_lowercase();
        if let Some(&id) = table.index.get(&new_lower) {
            if id != old.id {
                return Err(AceError::lexicon(format!(
                    "name {:?} is already in use",
                    new_name
                )));
            }
            // Same key, possibly a case change of the canonical name.
            table.entries[old.id as usize].name = new_name.to_string();
            return Ok(old);
        }

        let old_lower = old_name.to_lowercase();
        if !keep_old {
            table.index.remove(&old_lower);
        }
        table.entries[old.id as usize].name = new_name.to_string();
        table.index.insert(new_lower, old.id);
        Ok(old)
    }

    /// Whether a bound name is an alias: it resolves to a key whose canonical
    /// name spells differently.
    pub fn is_alias_binding(&self, class: ClassId, name: &str) -> bool {
        let Some(table) = self.tables.get(&class) else {
            return false;
        };
        let Some(&id) = table.index.get(&name.to_lowercase()) else {
            return false;
        };
        match table.entries.get(id as usize) {
            Some(entry) => !entry.name.eq_ignore_ascii_case(name),
            None => false,
        }
    }

    /// Drop one name binding. The entry (and its key) stays.
    pub fn remove_binding(&mut self, class: ClassId, name: &str) -> bool {
        match self.tables.get_mut(&class) {
            Some(table) => table.index.remove(&name.to_lowercase()).is_some(),
            None => false,
        }
    }

    /// Number of keys handed out in a class.
    pub fn count(&self, class: ClassId) -> usize {
        self.tables.get(&class).map_or(0, |t| t.entries.len())
    }
}

/// Object names must be non-blank, printable, and not start with an option
/// marker.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
        && !name.starts_with('-')
        && !name.chars().any(|c| c.is_control())
}
