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

//! Error types for store and lexicon operations.

use std::fmt;
use thiserror::Error;

/// The kind of error raised by a store or lexicon operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AceErrorKind {
    /// Name resolution, alias, or rename problem.
    Lexicon,
    /// Class or tag model violation.
    Model,
    /// Object is already checked out elsewhere.
    Locked,
    /// A model-declared constraint rejected the object at commit.
    Constraint,
    /// Operation invalid in the current state.
    State,
    /// Non-recoverable misuse, e.g. re-entering the rename primitive.
    Fatal,
    /// I/O error.
    Io,
}

impl fmt::Display for AceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicon => write!(f, "LexiconError"),
            Self::Model => write!(f, "ModelError"),
            Self::Locked => write!(f, "LockedError"),
            Self::Constraint => write!(f, "ConstraintError"),
            Self::State => write!(f, "StateError"),
            Self::Fatal => write!(f, "FatalError"),
            Self::Io => write!(f, "IOError"),
        }
    }
}

/// An error from the object store, lexicon, or model layer.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct AceError {
    /// The kind of error.
    pub kind: AceErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl AceError {
    /// Create a new error.
    pub fn new(kind: AceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn lexicon(message: impl Into<String>) -> Self {
        Self::new(AceErrorKind::Lexicon, message)
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::new(AceErrorKind::Model, message)
    }

    pub fn locked(message: impl Into<String>) -> Self {
        Self::new(AceErrorKind::Locked, message)
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(AceErrorKind::Constraint, message)
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::new(AceErrorKind::State, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(AceErrorKind::Fatal, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(AceErrorKind::Io, message)
    }

    /// True for errors the caller must not recover from.
    pub fn is_fatal(&self) -> bool {
        self.kind == AceErrorKind::Fatal
    }
}

/// Result type for store and lexicon operations.
pub type AceResult<T> = Result<T, AceError>;
