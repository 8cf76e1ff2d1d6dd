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

//! The tree representation of one stored object.
//!
//! Each node holds one cell (a tag label or a data value) and the cells to
//! its right as children. A line like `Position 1.5 2.5` becomes the chain
//! `Tag(Position) -> Float(1.5) -> Float(2.5)`; repeated non-unique values
//! under the same tag become sibling children.

use crate::key::Key;
use crate::value::Value;

/// One cell of an object tree, with optional comment and timestamp
/// annotations attached by the `-C` / `-O` qualifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// The cell itself.
    pub value: Value,
    /// Structural comment annotation.
    pub comment: Option<String>,
    /// Timestamp reference (a session-class key).
    pub stamp: Option<Key>,
    /// Cells to the right of this one.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            comment: None,
            stamp: None,
            children: Vec::new(),
        }
    }

    /// The tag name, if this node is a tag cell.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.value {
            Value::Tag(t) => Some(t),
            _ => None,
        }
    }
}

/// The full contents of one tree-typed object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectTree {
    /// Top-level nodes. Usually tag cells.
    pub root: Vec<TreeNode>,
}

impl ObjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Find a tag node anywhere in the tree, depth first.
    pub fn find_tag(&self, name: &str) -> Option<&TreeNode> {
        find_tag_in(&self.root, name)
    }

    /// The direct data values under a tag, skipping nested tag cells.
    pub fn values(&self, tag: &str) -> Vec<&Value> {
        match self.find_tag(tag) {
            Some(node) => node
                .children
                .iter()
                .filter(|n| !n.value.is_tag())
                .map(|n| &n.value)
                .collect(),
            None => Vec::new(),
        }
    }

    /// The first data value under a tag.
    pub fn first(&self, tag: &str) -> Option<&Value> {
        self.values(tag).into_iter().next()
    }

    /// Number of nodes in the whole tree.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[TreeNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.root)
    }
}

fn find_tag_in<'a>(nodes: &'a [TreeNode], name: &str) -> Option<&'a TreeNode> {
    for node in nodes {
        if let Some(tag) = node.tag_name() {
            if tag.eq_ignore_ascii_case(name) {
                return Some(node);
            }
        }
        if let Some(found) = find_tag_in(&node.children, name) {
            return Some(found);
        }
    }
    None
}
