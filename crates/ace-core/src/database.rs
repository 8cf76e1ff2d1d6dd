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

//! The database facade: classes, lexicon, store, and the current session.

use crate::cursor::Cursor;
use crate::error::{AceError, AceResult};
use crate::key::{ClassId, Key};
use crate::lexicon::Lexicon;
use crate::model::{ClassDef, ClassKind, Model};
use crate::store::{CommitOutcome, Constraint, ObjectStore};
use crate::tree::ObjectTree;
use std::sync::Arc;

/// The built-in session class. Registered first, so always class 0.
pub const SESSION_CLASS: ClassId = ClassId(0);

/// One in-memory ACE database: registered classes, the name lexicon, the
/// object store, and a session counter used for creation stamps.
#[derive(Debug)]
pub struct Database {
    classes: Vec<ClassDef>,
    lexicon: Lexicon,
    store: ObjectStore,
    session: u32,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// An empty database with only the built-in `Session` class.
    pub fn new() -> Self {
        let mut db = Self {
            classes: Vec::new(),
            lexicon: Lexicon::new(),
            store: ObjectStore::new(),
            session: 1,
        };
        // Session objects carry timestamps, never user edits.
        db.classes.push(ClassDef::tree("Session").protected());
        db
    }

    // ==================== classes ====================

    /// Register a class, returning its id.
    pub fn register_class(&mut self, def: ClassDef) -> AceResult<ClassId> {
        if self.class_by_name(&def.name).is_some() {
            return Err(AceError::model(format!(
                "class {:?} is already registered",
                def.name
            )));
        }
        let id = u8::try_from(self.classes.len())
            .map_err(|_| AceError::model("class table full"))?;
        self.classes.push(def);
        Ok(ClassId(id))
    }

    /// Replace the tag model of a tree class.
    pub fn set_model(&mut self, class: ClassId, model: Model) -> AceResult<()> {
        let def = self
            .classes
            .get_mut(class.0 as usize)
            .ok_or_else(|| AceError::model(format!("no such class {}", class)))?;
        if def.kind != ClassKind::Tree {
            return Err(AceError::model(format!(
                "class {:?} is not a tree class",
                def.name
            )));
        }
        def.model = Some(Arc::new(model));
        Ok(())
    }

    pub fn class(&self, class: ClassId) -> Option<&ClassDef> {
        self.classes.get(class.0 as usize)
    }

    /// All registered classes in id order.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, def)| (ClassId(i as u8), def))
    }

    /// Look a class up by name, case-insensitively.
    pub fn class_by_name(&self, name: &str) -> Option<(ClassId, &ClassDef)> {
        self.classes
            .iter()
            .enumerate()
            .find(|(_, def)| def.name.eq_ignore_ascii_case(name))
            .map(|(i, def)| (ClassId(i as u8), def))
    }

    // ==================== names ====================

    pub fn resolve(&self, class: ClassId, name: &str) -> Option<Key> {
        self.lexicon.resolve(class, name)
    }

    pub fn resolve_or_create(&mut self, class: ClassId, name: &str) -> AceResult<Key> {
        self.lexicon.resolve_or_create(class, name)
    }

    pub fn name(&self, key: Key) -> Option<&str> {
        self.lexicon.name(key)
    }

    /// Rename or alias the object behind `old`; see [`Lexicon::alias`].
    pub fn alias(&mut self, old: Key, new_name: &str, keep_old: bool) -> AceResult<Key> {
        self.lexicon.alias(old, new_name, keep_old)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Whether a bound name is an alias for a differently-spelled canonical
    /// name.
    pub fn is_alias_binding(&self, class: ClassId, name: &str) -> bool {
        self.lexicon.is_alias_binding(class, name)
    }

    /// Drop one name binding without touching the object behind it.
    pub fn remove_binding(&mut self, class: ClassId, name: &str) -> bool {
        self.lexicon.remove_binding(class, name)
    }

    /// Intern a timestamp name in the session class.
    pub fn session_key(&mut self, name: &str) -> AceResult<Key> {
        self.lexicon.resolve_or_create(SESSION_CLASS, name)
    }

    // ==================== objects ====================

    /// Check out a tree object for exclusive editing.
    pub fn checkout(&mut self, key: Key) -> AceResult<Cursor> {
        let def = self
            .class(key.class)
            .ok_or_else(|| AceError::model(format!("no such class {}", key.class)))?;
        let model = def
            .model
            .clone()
            .ok_or_else(|| AceError::model(format!("class {:?} has no tag model", def.name)))?;
        self.store.checkout(key, model)
    }

    /// Commit a cursor with an optional creation stamp.
    pub fn commit(&mut self, cursor: Cursor, stamp: Option<Key>) -> AceResult<CommitOutcome> {
        self.store.commit(cursor, stamp, self.session)
    }

    pub fn discard(&mut self, cursor: Cursor) {
        self.store.discard(cursor);
    }

    pub fn kill(&mut self, cursor: Cursor) {
        self.store.kill(cursor);
    }

    pub fn exists(&self, key: Key) -> bool {
        self.store.exists(key)
    }

    pub fn object(&self, key: Key) -> Option<&ObjectTree> {
        self.store.object(key)
    }

    pub fn is_locked(&self, key: Key) -> bool {
        self.store.is_locked(key)
    }

    pub fn stamp(&self, key: Key) -> Option<Key> {
        self.store.stamp(key)
    }

    // ==================== arrays ====================

    pub fn put_array(&mut self, key: Key, data: Vec<u8>) {
        self.store.put_array(key, data);
    }

    pub fn get_array(&self, key: Key) -> Option<&[u8]> {
        self.store.get_array(key)
    }

    pub fn destroy_array(&mut self, key: Key) -> bool {
        self.store.destroy_array(key)
    }

    // ==================== constraints and sessions ====================

    pub fn add_constraint(&mut self, class: ClassId, constraint: Box<dyn Constraint>) {
        self.store.add_constraint(class, constraint);
    }

    /// The current session number.
    pub fn session(&self) -> u32 {
        self.session
    }

    /// Start a new session. Objects created from now on stamp against it.
    pub fn begin_session(&mut self) -> u32 {
        self.session += 1;
        self.session
    }

    /// Number of stored tree objects.
    pub fn object_count(&self) -> usize {
        self.store.len()
    }
}
