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

//! Class identifiers and class-scoped object keys.

use std::fmt;

/// A class identifier. Classes are numbered 0-255 in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u8);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stable, class-scoped object key.
///
/// Keys are handed out by the [`Lexicon`](crate::Lexicon) and survive renames
/// and aliases: renaming an object changes which names resolve to the key,
/// never the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    /// The owning class.
    pub class: ClassId,
    /// Index within the class's lexicon table.
    pub id: u32,
}

impl Key {
    /// Create a key. Normally only the lexicon does this.
    pub fn new(class: ClassId, id: u32) -> Self {
        Self { class, id }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.class, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_display() {
        let k = Key::new(ClassId(3), 17);
        assert_eq!(format!("{}", k), "3:17");
    }

    #[test]
    fn test_key_equality_is_class_scoped() {
        let a = Key::new(ClassId(1), 5);
        let b = Key::new(ClassId(2), 5);
        assert_ne!(a, b);
        assert_eq!(a, Key::new(ClassId(1), 5));
    }

    #[test]
    fn test_key_hashable() {
        let mut set = HashSet::new();
        set.insert(Key::new(ClassId(0), 0));
        set.insert(Key::new(ClassId(0), 0));
        set.insert(Key::new(ClassId(0), 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_key_ordering() {
        let a = Key::new(ClassId(0), 9);
        let b = Key::new(ClassId(1), 0);
        assert!(a < b);
    }
}
