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

//! The tag-body walker.
//!
//! Consumes one logical body line of the form `[-D] TAG[:] VALUE...`,
//! descends the cursor to the tag, and appends typed values coerced against
//! the class model. Qualifiers, in precedence order per token: `-C text`
//! attaches a comment (only `-O` may follow), `-O key` attaches a timestamp
//! reference, `-R` makes the next value replace instead of append. A leading
//! `-D` prunes the tree at the final cursor position after an otherwise
//! successful walk.
//!
//! Every model refusal from the cursor is a per-object failure; the walker
//! never bypasses validation.

use crate::diagnostic::Failure;
use ace_core::{canonical_float, parse_ace_date, ColumnType, Cursor, Database, Value};

/// Walk one body line. The words come pre-tokenised and non-empty.
pub(crate) fn walk_line(
    db: &mut Database,
    cursor: &mut Cursor,
    words: &[String],
) -> Result<(), Failure> {
    cursor.begin_line();

    let (prune, words) = match words[0].as_str() {
        "-D" => (true, &words[1..]),
        _ => (false, words),
    };
    if words.is_empty() {
        return Err(Failure::object("missing tag after -D"));
    }

    let tag = words[0].trim_end_matches(':');
    if !cursor.add_tag(tag) {
        return Err(Failure::object(format!("tag {:?} is not legal here", tag)));
    }

    let mut rest = words[1..].iter();
    let mut after_comment = false;
    while let Some(word) = rest.next() {
        if after_comment && word != "-O" {
            return Err(Failure::object("-C may only be followed by -O"));
        }
        match word.as_str() {
            "-C" => {
                let text = rest
                    .next()
                    .ok_or_else(|| Failure::object("missing comment text after -C"))?;
                if !cursor.add_comment(text) {
                    return Err(Failure::object("no position to attach a comment to"));
                }
                after_comment = true;
            }
            "-O" => {
                let ts = rest
                    .next()
                    .ok_or_else(|| Failure::object("missing timestamp after -O"))?;
                let stamp = db.session_key(ts).map_err(|e| Failure::object(e.message))?;
                if !cursor.add_stamp(stamp) {
                    return Err(Failure::object("no position to attach a timestamp to"));
                }
                after_comment = false;
            }
            "-R" => cursor.set_replace(),
            _ => add_one_value(db, cursor, word)?,
        }
    }

    if prune {
        cursor.prune();
    }
    Ok(())
}

/// Coerce one word against the model type at the cursor and insert it.
fn add_one_value(db: &mut Database, cursor: &mut Cursor, word: &str) -> Result<(), Failure> {
    let expected = cursor.expected().cloned();
    let value = match &expected {
        Some(ColumnType::Int) => {
            let n = word
                .parse::<i64>()
                .map_err(|_| Failure::object(format!("{:?} is not an integer", word)))?;
            Value::Int(n)
        }
        Some(ColumnType::Float) => {
            let x = word
                .parse::<f64>()
                .map_err(|_| Failure::object(format!("{:?} is not a number", word)))?;
            Value::Float(canonical_float(x))
        }
        Some(ColumnType::Date) => {
            let d = parse_ace_date(word)
                .ok_or_else(|| Failure::object(format!("{:?} is not a date", word)))?;
            Value::Date(d)
        }
        Some(ColumnType::Text) => Value::Text(word.to_string()),
        Some(ColumnType::KeyOf(class)) => {
            let known_only = db.class(*class).is_some_and(|def| def.known_only);
            if known_only && db.resolve(*class, word).is_none() {
                return Err(Failure::object(format!(
                    "{:?} is not a known name in a known-only class",
                    word
                )));
            }
            let key = db
                .resolve_or_create(*class, word)
                .map_err(|e| Failure::object(e.message))?;
            Value::Key(key)
        }
        Some(ColumnType::SubModel(_)) => {
            // The word heads a nested paragraph: open the sub-object and
            // re-scan it as a tag.
            if !cursor.push_sub_object() {
                return Err(Failure::object("cannot open a sub-object here"));
            }
            let tag = word.trim_end_matches(':');
            if !cursor.add_tag(tag) {
                return Err(Failure::object(format!(
                    "tag {:?} is not legal in this sub-object",
                    tag
                )));
            }
            return Ok(());
        }
        None => {
            // No column left: the word may name a nested tag.
            let tag = word.trim_end_matches(':');
            if !cursor.add_tag(tag) {
                return Err(Failure::object(format!("unexpected value {:?}", word)));
            }
            return Ok(());
        }
    };
    if !cursor.add_value(value) {
        return Err(Failure::object(format!(
            "value {:?} is not legal at this position",
            word
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ErrorCategory;
    use crate::lex::split_words;
    use ace_core::{ClassDef, Model, TagSpec};

    fn test_db() -> Database {
        let mut db = Database::new();
        let model = Model::new(vec![
            TagSpec::new("Title", vec![ColumnType::Text]).unique(),
            TagSpec::new("Count", vec![ColumnType::Int]),
            TagSpec::group(
                "Map",
                vec![TagSpec::new(
                    "Position",
                    vec![ColumnType::Float, ColumnType::Float],
                )],
            ),
            TagSpec::new("Born", vec![ColumnType::Date]),
            TagSpec::new("Locus", vec![ColumnType::KeyOf(ace_core::ClassId(2))]),
            TagSpec::new(
                "Contains",
                vec![ColumnType::SubModel(vec![TagSpec::new(
                    "Copies",
                    vec![ColumnType::Int],
                )])],
            ),
        ]);
        db.register_class(ClassDef::tree("Gene").with_model(model))
            .unwrap();
        db.register_class(ClassDef::tree("Locus").known_only())
            .unwrap();
        db
    }

    fn walk(db: &mut Database, cursor: &mut Cursor, line: &str) -> Result<(), Failure> {
        let words = split_words(line).unwrap();
        walk_line(db, cursor, &words)
    }

    fn checkout(db: &mut Database) -> Cursor {
        let (gene, _) = db.class_by_name("Gene").unwrap();
        let key = db.resolve_or_create(gene, "abc").unwrap();
        db.checkout(key).unwrap()
    }

    // ==================== basic walking tests ====================

    #[test]
    fn test_text_value() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Title \"hello world\"").unwrap();
        assert_eq!(
            c.tree().first("Title").and_then(|v| v.as_text()),
            Some("hello world")
        );
    }

    #[test]
    fn test_tag_colon_suffix() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Title: hello").unwrap();
        assert!(c.tree().find_tag("Title").is_some());
    }

    #[test]
    fn test_unknown_tag_fails() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        let err = walk(&mut db, &mut c, "Bogus x").unwrap_err();
        assert_eq!(err.category, ErrorCategory::Object);
    }

    #[test]
    fn test_multi_column_floats() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Position 1.5 2.5").unwrap();
        assert_eq!(c.tree().first("Position").and_then(|v| v.as_float()), Some(1.5));
    }

    #[test]
    fn test_spelled_intermediate_tag_nests_once() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Map Position 1.5 2.5").unwrap();
        let map = c.tree().find_tag("Map").unwrap();
        assert_eq!(map.children.len(), 1);
        assert_eq!(map.children[0].tag_name(), Some("Position"));
    }

    #[test]
    fn test_spelled_and_bare_tag_paths_match() {
        let mut db1 = test_db();
        let mut c1 = checkout(&mut db1);
        walk(&mut db1, &mut c1, "Map Position 1.5 2.5").unwrap();

        let mut db2 = test_db();
        let mut c2 = checkout(&mut db2);
        walk(&mut db2, &mut c2, "Position 1.5 2.5").unwrap();

        assert_eq!(c1.tree(), c2.tree());
    }

    // ==================== coercion tests ====================

    #[test]
    fn test_int_must_parse_fully() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        assert!(walk(&mut db, &mut c, "Count 42").is_ok());
        assert!(walk(&mut db, &mut c, "Count 42x").is_err());
        assert!(walk(&mut db, &mut c, "Count 4.2").is_err());
    }

    #[test]
    fn test_float_canonicalised() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Position 0.00000000001 1.0").unwrap();
        assert_eq!(c.tree().first("Position").and_then(|v| v.as_float()), Some(0.0));
    }

    #[test]
    fn test_date_value() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        assert!(walk(&mut db, &mut c, "Born 1998-03-01").is_ok());
        assert!(walk(&mut db, &mut c, "Born yesterday").is_err());
    }

    #[test]
    fn test_key_value_creates_in_open_class() {
        // Locus is known-only, so a fresh name must fail
        let mut db = test_db();
        let mut c = checkout(&mut db);
        let err = walk(&mut db, &mut c, "Locus nosuch").unwrap_err();
        assert_eq!(err.category, ErrorCategory::Object);

        let (locus, _) = db.class_by_name("Locus").unwrap();
        db.resolve_or_create(locus, "known").unwrap();
        walk(&mut db, &mut c, "Locus known").unwrap();
        assert!(c.tree().first("Locus").and_then(|v| v.as_key()).is_some());
    }

    #[test]
    fn test_sub_object() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Contains Copies 3").unwrap();
        assert_eq!(c.tree().first("Copies").and_then(|v| v.as_int()), Some(3));
    }

    // ==================== qualifier tests ====================

    #[test]
    fn test_comment_qualifier() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Title hello -C \"a remark\"").unwrap();
        let node = c.tree().find_tag("Title").unwrap();
        assert_eq!(node.children[0].comment.as_deref(), Some("a remark"));
    }

    #[test]
    fn test_comment_then_stamp_allowed() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Title hello -C remark -O 2025-01-01_00:00:00").unwrap();
        let node = c.tree().find_tag("Title").unwrap();
        assert!(node.children[0].stamp.is_some());
    }

    #[test]
    fn test_comment_followed_by_value_fails() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        let err = walk(&mut db, &mut c, "Title hello -C remark extra").unwrap_err();
        assert!(err.message.contains("-C may only be followed by -O"));
    }

    #[test]
    fn test_replace_qualifier() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Count 1").unwrap();
        walk(&mut db, &mut c, "Count -R 2").unwrap();
        let values = c.tree().values("Count");
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_int(), Some(2));
    }

    #[test]
    fn test_prune_qualifier() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        walk(&mut db, &mut c, "Title hello").unwrap();
        walk(&mut db, &mut c, "-D Title").unwrap();
        assert!(c.tree().find_tag("Title").is_none());
    }

    #[test]
    fn test_dangling_d_fails() {
        let mut db = test_db();
        let mut c = checkout(&mut db);
        assert!(walk(&mut db, &mut c, "-D").is_err());
    }
}
