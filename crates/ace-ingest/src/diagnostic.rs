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

//! Error classification and user-visible diagnostics.
//!
//! Parse failures never cross the `step`/`parse*` boundary as `Err`; they are
//! classified into a category, counted, and collected as [`Diagnostic`]s.

use std::fmt;
use thiserror::Error;

/// Paragraph heads keep at most this many characters in diagnostics.
const HEAD_PREVIEW: usize = 50;

/// Which statistics bucket a failure lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed paragraph head: unknown or protected class, bad object
    /// name, missing verb argument. Raised before any checkout.
    General,
    /// Tag, value, or model violation, failed checkout, failed constraint
    /// check, or delete of a missing key. Aborts only the current object.
    Object,
    /// Array parser failure or missing parser.
    Array,
    /// Rename or alias failure.
    Update,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// An internal failure record, produced by the dispatcher, walker, or driver
/// and consumed by the driver's recovery point.
#[derive(Debug, Clone)]
pub(crate) struct Failure {
    pub category: ErrorCategory,
    pub message: String,
    /// Fatal failures abort the whole run regardless of `keep_going`.
    pub fatal: bool,
}

impl Failure {
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::General,
            message: message.into(),
            fatal: false,
        }
    }

    pub fn object(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::Object,
            message: message.into(),
            fatal: false,
        }
    }

    pub fn array(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::Array,
            message: message.into(),
            fatal: false,
        }
    }

    pub fn update(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::Update,
            message: message.into(),
            fatal: false,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::General,
            message: message.into(),
            fatal: true,
        }
    }
}

/// A user-visible diagnostic collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// One classified parse failure.
    #[error("{category} parse error, near line {line} while parsing \"{head}\", error was: {message}")]
    Parse {
        category: ErrorCategory,
        /// Line number near which the failure was observed.
        line: usize,
        /// Start of the offending paragraph, truncated to 50 characters.
        head: String,
        message: String,
    },
    /// The stream ended before its declared length, or contained an embedded
    /// NUL byte. A warning, not a failure.
    #[error("{}", truncation_message(.consumed, .declared))]
    Truncated {
        consumed: u64,
        declared: Option<u64>,
    },
}

fn truncation_message(consumed: &u64, declared: &Option<u64>) -> String {
    match declared {
        Some(declared) => format!(
            "warning: stream truncated, consumed {} of {} declared bytes",
            consumed, declared
        ),
        None => format!(
            "warning: stream truncated after {} bytes (embedded NUL)",
            consumed
        ),
    }
}

impl Diagnostic {
    pub(crate) fn parse(
        category: ErrorCategory,
        line: usize,
        head: &str,
        message: impl Into<String>,
    ) -> Self {
        let head = if head.chars().count() > HEAD_PREVIEW {
            head.chars().take(HEAD_PREVIEW).collect()
        } else {
            head.to_string()
        };
        Self::Parse {
            category,
            line,
            head,
            message: message.into(),
        }
    }

    /// Whether this diagnostic is a warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Parse { category, .. } => Some(*category),
            Self::Truncated { .. } => None,
        }
    }
}
