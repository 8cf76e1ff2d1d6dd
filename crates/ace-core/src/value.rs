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

//! The tag-value union carried inside tree objects.

use crate::key::Key;
use time::macros::format_description;
use time::Date;

/// Floats closer to zero than this are snapped to exactly zero when
/// canonicalised, so representation noise does not survive round-trips.
pub const FLOAT_EPSILON: f64 = 1.0e-10;

/// A discriminated value at one cell of an object tree.
///
/// `Tag` cells label positions in the tree; the remaining variants are data
/// produced by coercing raw words against the class model.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A reference to another object.
    Key(Key),
    /// Signed integer.
    Int(i64),
    /// Canonicalised floating-point number (see [`canonical_float`]).
    Float(f64),
    /// Calendar date.
    Date(Date),
    /// Free text.
    Text(String),
    /// A tag label. Structural, never produced by value coercion.
    Tag(String),
}

impl Value {
    /// Returns true if this cell is a tag label rather than data.
    pub fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_))
    }

    pub fn as_key(&self) -> Option<Key> {
        match self {
            Self::Key(k) => Some(*k),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{}", k),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Date(d) => write!(f, "{}", d),
            Self::Text(s) => write!(f, "{}", s),
            Self::Tag(t) => write!(f, "{}", t),
        }
    }
}

/// Canonicalise a float the way the ACE format stores it: rendered through
/// 7 significant digits and re-parsed, with values inside [`FLOAT_EPSILON`]
/// of zero snapped to exactly zero.
pub fn canonical_float(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    if x.abs() < FLOAT_EPSILON {
        return 0.0;
    }
    format!("{:.6e}", x).parse().unwrap_or(x)
}

/// Parse an ACE date of the form `YYYY-MM-DD` (or `YYYY/MM/DD`).
pub fn parse_ace_date(s: &str) -> Option<Date> {
    let normalized = s.replace('/', "-");
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(&normalized, fmt).ok()
}
