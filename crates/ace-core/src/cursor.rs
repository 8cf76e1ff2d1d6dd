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

//! Exclusive edit cursor over one checked-out object.
//!
//! A cursor owns a private working copy of the object tree. Nothing touches
//! the store until the cursor goes back through
//! [`ObjectStore::commit`](crate::ObjectStore::commit); discarding a cursor
//! loses the edits and releases the checkout, so a failed edit can never
//! corrupt committed data.
//!
//! Positioning is line-oriented to match the ace text format: call
//! [`begin_line`](Cursor::begin_line), then [`add_tag`](Cursor::add_tag) to
//! descend to a tag, then [`add_value`](Cursor::add_value) once per value
//! column. `add_tag` and `add_value` return `false` when the model forbids
//! the edit; the cursor never bypasses model validation.

use crate::key::Key;
use crate::model::{find_chain_in, ColumnType, Model, TagSpec};
use crate::tree::{ObjectTree, TreeNode};
use crate::value::Value;
use std::sync::Arc;

/// An exclusive, mutable handle onto one object's in-progress edit.
#[derive(Debug)]
pub struct Cursor {
    key: Key,
    model: Arc<Model>,
    tree: ObjectTree,
    /// Node path from the root to the current cell.
    path: Vec<usize>,
    /// Spec of the tag the cursor last descended into.
    cur: Option<TagSpec>,
    /// Column index within `cur`.
    col: usize,
    /// Sub-object scopes opened on the current line.
    scopes: Vec<Vec<TagSpec>>,
    replace_next: bool,
}

impl Cursor {
    pub(crate) fn new(key: Key, model: Arc<Model>, tree: ObjectTree) -> Self {
        Self {
            key,
            model,
            tree,
            path: Vec::new(),
            cur: None,
            col: 0,
            scopes: Vec::new(),
            replace_next: false,
        }
    }

    /// The key of the checked-out object.
    pub fn key(&self) -> Key {
        self.key
    }

    /// The working copy being edited.
    pub fn tree(&self) -> &ObjectTree {
        &self.tree
    }

    pub(crate) fn into_tree(self) -> ObjectTree {
        self.tree
    }

    /// Reset positioning for a new logical line.
    pub fn begin_line(&mut self) {
        self.path.clear();
        self.scopes.clear();
        self.cur = None;
        self.col = 0;
        self.replace_next = false;
    }

    /// Descend to a tag, materialising intermediate tag nodes as declared by
    /// the model. Returns `false` if the tag is not legal at the current
    /// scope. Mid-line, after a previous tag on the same line, the name
    /// resolves within that tag's subtags and nests at the current position,
    /// so `Map Position` and a bare `Position` build the same tree.
    pub fn add_tag(&mut self, name: &str) -> bool {
        let chain = match &self.cur {
            Some(spec) => find_chain_in(&spec.subtags, name),
            None => match self.scopes.last() {
                Some(scope) => find_chain_in(scope, name),
                None => self.model.find_chain(name),
            },
        };
        let chain = match chain {
            Some(c) => c,
            None => return false,
        };
        for spec in &chain {
            let level = self.level_mut();
            let idx = match level
                .iter()
                .position(|n| n.tag_name().is_some_and(|t| t.eq_ignore_ascii_case(&spec.name)))
            {
                Some(i) => i,
                None => {
                    level.push(TreeNode::new(Value::Tag(spec.name.clone())));
                    level.len() - 1
                }
            };
            self.path.push(idx);
        }
        self.cur = chain.into_iter().next_back();
        self.col = 0;
        true
    }

    /// The model type at the current column, if any column remains.
    pub fn expected(&self) -> Option<&ColumnType> {
        self.cur.as_ref()?.columns.get(self.col)
    }

    /// Append (or upsert) one typed value at the current position and advance
    /// one column. Returns `false` on any model violation: no tag selected,
    /// no column left, or a type mismatch.
    pub fn add_value(&mut self, value: Value) -> bool {
        let (unique, ok) = match &self.cur {
            Some(spec) => match spec.columns.get(self.col) {
                Some(ct) => (spec.unique, ct.accepts(&value)),
                None => return false,
            },
            None => return false,
        };
        if !ok {
            return false;
        }
        let replace = self.replace_next || unique;
        self.replace_next = false;

        let level = self.level_mut();
        let idx = if replace {
            match level.iter().position(|n| !n.value.is_tag()) {
                Some(i) => {
                    level[i].value = value;
                    i
                }
                None => {
                    level.push(TreeNode::new(value));
                    level.len() - 1
                }
            }
        } else {
            match level.iter().position(|n| n.value == value) {
                Some(i) => i,
                None => {
                    level.push(TreeNode::new(value));
                    level.len() - 1
                }
            }
        };
        self.path.push(idx);
        self.col += 1;
        true
    }

    /// Open the sub-object scope declared at the current column. Returns
    /// `false` if the current column is not a sub-object type.
    pub fn push_sub_object(&mut self) -> bool {
        let specs = match self.expected() {
            Some(ColumnType::SubModel(s)) => s.clone(),
            _ => return false,
        };
        self.scopes.push(specs);
        self.cur = None;
        self.col = 0;
        true
    }

    /// Close the innermost sub-object scope.
    pub fn pop_sub_object(&mut self) -> bool {
        self.scopes.pop().is_some()
    }

    /// Attach a structural comment to the current cell.
    pub fn add_comment(&mut self, text: &str) -> bool {
        match self.current_mut() {
            Some(node) => {
                node.comment = Some(text.to_string());
                true
            }
            None => false,
        }
    }

    /// Attach a timestamp reference to the current cell.
    pub fn add_stamp(&mut self, stamp: Key) -> bool {
        match self.current_mut() {
            Some(node) => {
                node.stamp = Some(stamp);
                true
            }
            None => false,
        }
    }

    /// The next `add_value` replaces the value at the current position
    /// instead of appending.
    pub fn set_replace(&mut self) {
        self.replace_next = true;
    }

    /// Delete the tree from the current position. At the root this empties
    /// the whole object.
    pub fn prune(&mut self) {
        match self.path.last().copied() {
            Some(last) => {
                let depth = self.path.len() - 1;
                let level = self.level_at_mut(depth);
                level.remove(last);
                self.path.pop();
                // Positioning below the removed node is gone
                self.cur = None;
                self.col = 0;
            }
            None => self.tree.root.clear(),
        }
    }

    /// Empty the working copy entirely.
    pub fn clear(&mut self) {
        self.begin_line();
        self.tree.root.clear();
    }

    fn current_mut(&mut self) -> Option<&mut TreeNode> {
        let (&last, rest) = self.path.split_last()?;
        let mut nodes = &mut self.tree.root;
        for &i in rest {
            nodes = &mut nodes[i].children;
        }
        nodes.get_mut(last)
    }

    fn level_mut(&mut self) -> &mut Vec<TreeNode> {
        let depth = self.path.len();
        self.level_at_mut(depth)
    }

    fn level_at_mut(&mut self, depth: usize) -> &mut Vec<TreeNode> {
        let mut nodes = &mut self.tree.root;
        for &i in &self.path[..depth] {
            nodes = &mut nodes[i].children;
        }
        nodes
    }
}
