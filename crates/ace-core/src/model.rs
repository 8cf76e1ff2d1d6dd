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

//! Class metadata and per-class tag models.
//!
//! A tree-typed class carries a [`Model`]: a tree of [`TagSpec`]s naming the
//! legal tags, the typed columns following each tag, and whether a tag is
//! unique (values replace) or multi-valued (values accumulate as a set).
//! Array-typed classes have no model; their contents are owned by whichever
//! array parser is registered for them.

use crate::key::ClassId;
use crate::value::Value;
use std::sync::Arc;

/// Structural kind of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Model-constrained hierarchical objects, edited through cursors.
    Tree,
    /// Flat objects handled by a registered array parser.
    Array,
}

/// The declared type of one value column following a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Int,
    Float,
    Date,
    Text,
    /// A reference into another class.
    KeyOf(ClassId),
    /// A nested object scope with its own tag tree.
    SubModel(Vec<TagSpec>),
}

impl ColumnType {
    /// Whether a coerced value is acceptable in this column.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Int, Value::Int(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Date, Value::Date(_)) => true,
            (Self::Text, Value::Text(_)) => true,
            (Self::KeyOf(class), Value::Key(k)) => k.class == *class,
            _ => false,
        }
    }
}

/// One legal tag in a class model.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSpec {
    /// Tag name as it appears in ace text.
    pub name: String,
    /// Typed columns following the tag, in order.
    pub columns: Vec<ColumnType>,
    /// Tags nested under this one.
    pub subtags: Vec<TagSpec>,
    /// Unique tags hold a single value chain; adding replaces.
    pub unique: bool,
}

impl TagSpec {
    /// A leaf tag with typed columns.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnType>) -> Self {
        Self {
            name: name.into(),
            columns,
            subtags: Vec::new(),
            unique: false,
        }
    }

    /// A structural tag grouping nested tags, with no columns of its own.
    pub fn group(name: impl Into<String>, subtags: Vec<TagSpec>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            subtags,
            unique: false,
        }
    }

    /// Mark the tag unique: a new value replaces the old one.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Add nested tags to a leaf tag.
    pub fn with_subtags(mut self, subtags: Vec<TagSpec>) -> Self {
        self.subtags = subtags;
        self
    }
}

/// The tag model of one tree-typed class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    /// Top-level tags.
    pub tags: Vec<TagSpec>,
}

impl Model {
    pub fn new(tags: Vec<TagSpec>) -> Self {
        Self { tags }
    }

    /// An empty model: no tag is legal.
    pub fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    /// Find a tag anywhere in the model, returning the chain of specs from a
    /// top-level tag down to the match. Ace text names a tag without spelling
    /// out its ancestors; the chain tells the cursor which intermediate tag
    /// nodes to materialise.
    pub fn find_chain(&self, name: &str) -> Option<Vec<TagSpec>> {
        find_chain_in(&self.tags, name)
    }
}

/// Depth-first tag search over a spec scope. Also used for sub-object scopes.
pub(crate) fn find_chain_in(scope: &[TagSpec], name: &str) -> Option<Vec<TagSpec>> {
    for spec in scope {
        if spec.name.eq_ignore_ascii_case(name) {
            return Some(vec![spec.clone()]);
        }
        if let Some(mut chain) = find_chain_in(&spec.subtags, name) {
            chain.insert(0, spec.clone());
            return Some(chain);
        }
    }
    None
}

/// Metadata for one registered class.
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Class name, matched case-insensitively in ace text.
    pub name: String,
    /// Structural kind.
    pub kind: ClassKind,
    /// Protected classes may not be edited from ace text without explicitly
    /// elevated privilege.
    pub protected: bool,
    /// Known-only classes never create keys as a side effect of being
    /// referenced; the name must already exist.
    pub known_only: bool,
    /// Tag model. `None` for array classes.
    pub model: Option<Arc<Model>>,
}

impl ClassDef {
    /// A tree-typed class with an empty model.
    pub fn tree(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Tree,
            protected: false,
            known_only: false,
            model: Some(Arc::new(Model::empty())),
        }
    }

    /// An array-typed class.
    pub fn array(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Array,
            protected: false,
            known_only: false,
            model: None,
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    pub fn known_only(mut self) -> Self {
        self.known_only = true;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(Arc::new(model));
        self
    }
}
