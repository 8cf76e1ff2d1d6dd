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

//! The object store: checkout, constraint-gated commit, and array blobs.
//!
//! Tree objects are edited through an exclusive [`Cursor`]: checkout locks
//! the key and hands out a working copy; commit re-validates against the
//! class constraints and swaps the tree in atomically. Concurrent checkouts
//! of the same key fail with a `Locked` error until the first cursor is
//! committed or discarded.

use crate::cursor::Cursor;
use crate::error::{AceError, AceResult};
use crate::key::{ClassId, Key};
use crate::model::Model;
use crate::tree::ObjectTree;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// What a commit did to the stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The key had no stored tree before.
    Added,
    /// The stored tree changed.
    Edited,
    /// The working copy was identical to the stored tree.
    Unchanged,
}

/// A commit-time validation hook attached to a class.
pub trait Constraint: Send + Sync {
    /// Return `Err` with a reason to reject the tree.
    fn check(&self, tree: &ObjectTree) -> Result<(), String>;
}

impl<F> Constraint for F
where
    F: Fn(&ObjectTree) -> Result<(), String> + Send + Sync,
{
    fn check(&self, tree: &ObjectTree) -> Result<(), String> {
        self(tree)
    }
}

/// Bookkeeping kept per stored object.
#[derive(Debug, Clone)]
struct ObjectMeta {
    /// Session that created the object.
    session: u32,
    /// Creation stamp, set on first commit within the creating session.
    stamp: Option<Key>,
}

/// Storage for all objects of one database.
#[derive(Default)]
pub struct ObjectStore {
    objects: HashMap<Key, ObjectTree>,
    arrays: HashMap<Key, Vec<u8>>,
    locked: HashSet<Key>,
    meta: HashMap<Key, ObjectMeta>,
    constraints: HashMap<ClassId, Vec<Box<dyn Constraint>>>,
}

// Constraints are opaque closures, so Debug skips them.
impl fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("objects", &self.objects)
            .field("arrays", &self.arrays)
            .field("locked", &self.locked)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out a tree object for exclusive editing. The cursor starts from
    /// a copy of the stored tree, or from an empty tree for a new key.
    pub fn checkout(&mut self, key: Key, model: Arc<Model>) -> AceResult<Cursor> {
        if !self.locked.insert(key) {
            return Err(AceError::locked(format!(
                "object {} is already checked out",
                key
            )));
        }
        let tree = self.objects.get(&key).cloned().unwrap_or_default();
        Ok(Cursor::new(key, model, tree))
    }

    /// Whether a key is currently checked out.
    pub fn is_locked(&self, key: Key) -> bool {
        self.locked.contains(&key)
    }

    /// Commit a cursor: run the class constraints, then atomically replace
    /// the stored tree. The checkout lock is released whether or not the
    /// constraints pass; a rejected working copy is discarded.
    pub fn commit(
        &mut self,
        cursor: Cursor,
        stamp: Option<Key>,
        session: u32,
    ) -> AceResult<CommitOutcome> {
        let key = cursor.key();
        self.locked.remove(&key);
        let tree = cursor.into_tree();

        if let Some(checks) = self.constraints.get(&key.class) {
            for check in checks {
                if let Err(reason) = check.check(&tree) {
                    return Err(AceError::constraint(format!("object {}: {}", key, reason)));
                }
            }
        }

        let outcome = match self.objects.get(&key) {
            None => CommitOutcome::Added,
            Some(old) if *old == tree => CommitOutcome::Unchanged,
            Some(_) => CommitOutcome::Edited,
        };
        self.objects.insert(key, tree);

        let meta = self.meta.entry(key).or_insert(ObjectMeta {
            session,
            stamp: None,
        });
        // The stamp records creation, so it only sticks within the session
        // that first committed the object.
        if meta.stamp.is_none() && meta.session == session {
            meta.stamp = stamp;
        }
        Ok(outcome)
    }

    /// Release a checkout without committing.
    pub fn discard(&mut self, cursor: Cursor) {
        self.locked.remove(&cursor.key());
    }

    /// Delete the object behind a cursor and release the checkout.
    pub fn kill(&mut self, cursor: Cursor) {
        let key = cursor.key();
        self.locked.remove(&key);
        self.objects.remove(&key);
        self.meta.remove(&key);
    }

    /// Whether a key has a stored tree.
    pub fn exists(&self, key: Key) -> bool {
        self.objects.contains_key(&key)
    }

    /// Read-only view of a stored tree.
    pub fn object(&self, key: Key) -> Option<&ObjectTree> {
        self.objects.get(&key)
    }

    /// The creation stamp of a stored object.
    pub fn stamp(&self, key: Key) -> Option<Key> {
        self.meta.get(&key).and_then(|m| m.stamp)
    }

    /// Store an array blob, replacing any previous contents.
    pub fn put_array(&mut self, key: Key, data: Vec<u8>) {
        self.arrays.insert(key, data);
    }

    /// Read an array blob.
    pub fn get_array(&self, key: Key) -> Option<&[u8]> {
        self.arrays.get(&key).map(|v| v.as_slice())
    }

    /// Delete an array blob. Returns whether one existed.
    pub fn destroy_array(&mut self, key: Key) -> bool {
        self.arrays.remove(&key).is_some()
    }

    /// Attach a commit-time constraint to a class.
    pub fn add_constraint(&mut self, class: ClassId, constraint: Box<dyn Constraint>) {
        self.constraints.entry(class).or_default().push(constraint);
    }

    /// Number of stored tree objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
