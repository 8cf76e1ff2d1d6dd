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

//! Model description files.
//!
//! A small line-oriented format declaring the classes and tag models an
//! ingestion run parses against:
//!
//! ```text
//! # comment
//! class Gene
//! class Sequence array
//! class Locus known-only
//! tag Gene unique Title text
//! tag Gene Map.Position float float
//! tag Gene Locus key:Locus
//! ```
//!
//! `class NAME [array|protected|known-only]...` declares a class; `tag CLASS
//! [unique] TAGPATH TYPE...` declares one tag, where dots in the path create
//! intermediate structural tags and the types are `int`, `float`, `date`,
//! `text`, or `key:CLASS`. Classes are declared before tags; the file is read
//! in two passes so `key:` references may point forward.

use crate::error::CliError;
use ace_core::{ClassDef, ClassKind, ColumnType, Database, Model, TagSpec};
use std::collections::HashMap;
use std::path::Path;

/// Load a model description file into a fresh database.
pub fn load_model(path: &Path) -> Result<Database, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))?;
    parse_model(&text).map_err(|(line, message)| CliError::Model {
        path: path.to_path_buf(),
        line,
        message,
    })
}

/// Parse model description text. Errors carry the offending line number.
pub fn parse_model(text: &str) -> Result<Database, (usize, String)> {
    let mut db = Database::new();

    // Pass one: classes.
    for (n, line) in directives(text) {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words[0] != "class" {
            continue;
        }
        let name = *words.get(1).ok_or((n, "class needs a name".to_string()))?;
        let mut def = ClassDef::tree(name);
        for flag in &words[2..] {
            match *flag {
                "array" => def = ClassDef::array(name),
                "protected" => def = def.protected(),
                "known-only" => def = def.known_only(),
                other => return Err((n, format!("unknown class flag {:?}", other))),
            }
        }
        db.register_class(def).map_err(|e| (n, e.message))?;
    }

    // Pass two: tags, accumulated per class then installed as models.
    let mut roots: HashMap<String, Vec<TagSpec>> = HashMap::new();
    for (n, line) in directives(text) {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words[0] {
            "class" => {}
            "tag" => {
                let class = *words.get(1).ok_or((n, "tag needs a class".to_string()))?;
                let (_, def) = db
                    .class_by_name(class)
                    .ok_or((n, format!("unknown class {:?}", class)))?;
                if def.kind != ClassKind::Tree {
                    return Err((n, format!("class {:?} is not a tree class", class)));
                }
                let mut rest = &words[2..];
                let unique = rest.first() == Some(&"unique");
                if unique {
                    rest = &rest[1..];
                }
                let path = *rest.first().ok_or((n, "tag needs a path".to_string()))?;
                let columns = rest[1..]
                    .iter()
                    .map(|w| parse_column(&db, w).map_err(|m| (n, m)))
                    .collect::<Result<Vec<_>, _>>()?;

                let class_name = def.name.clone();
                let segments: Vec<&str> = path.split('.').collect();
                insert_path(
                    roots.entry(class_name).or_default(),
                    &segments,
                    columns,
                    unique,
                );
            }
            other => return Err((n, format!("unknown directive {:?}", other))),
        }
    }

    for (class_name, tags) in roots {
        let (class, _) = match db.class_by_name(&class_name) {
            Some(found) => found,
            None => continue,
        };
        db.set_model(class, Model::new(tags))
            .map_err(|e| (0, e.message))?;
    }
    Ok(db)
}

fn directives(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_column(db: &Database, word: &str) -> Result<ColumnType, String> {
    match word {
        "int" => Ok(ColumnType::Int),
        "float" => Ok(ColumnType::Float),
        "date" => Ok(ColumnType::Date),
        "text" => Ok(ColumnType::Text),
        _ => match word.strip_prefix("key:") {
            Some(class) => {
                let (id, _) = db
                    .class_by_name(class)
                    .ok_or_else(|| format!("unknown class {:?} in key type", class))?;
                Ok(ColumnType::KeyOf(id))
            }
            None => Err(format!("unknown column type {:?}", word)),
        },
    }
}

/// Descend (creating structural group tags as needed) and attach the leaf.
fn insert_path(specs: &mut Vec<TagSpec>, path: &[&str], columns: Vec<ColumnType>, unique: bool) {
    let head = path[0];
    if path.len() == 1 {
        let mut leaf = TagSpec::new(head, columns);
        if unique {
            leaf = leaf.unique();
        }
        specs.push(leaf);
        return;
    }
    let idx = match specs.iter().position(|s| s.name == head) {
        Some(i) => i,
        None => {
            specs.push(TagSpec::group(head, Vec::new()));
            specs.len() - 1
        }
    };
    insert_path(&mut specs[idx].subtags, &path[1..], columns, unique);
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "\
# gene model
class Gene
class Sequence array
class Locus known-only

tag Gene unique Title text
tag Gene Synonym text
tag Gene Map.Position float float
tag Gene Locus key:Locus
";

    #[test]
    fn test_classes_registered() {
        let db = parse_model(MODEL).unwrap();
        let (_, gene) = db.class_by_name("Gene").unwrap();
        assert_eq!(gene.kind, ClassKind::Tree);
        let (_, seq) = db.class_by_name("Sequence").unwrap();
        assert_eq!(seq.kind, ClassKind::Array);
        let (_, locus) = db.class_by_name("Locus").unwrap();
        assert!(locus.known_only);
    }

    #[test]
    fn test_tags_and_dotted_paths() {
        let db = parse_model(MODEL).unwrap();
        let (_, gene) = db.class_by_name("Gene").unwrap();
        let model = gene.model.as_ref().unwrap();

        let title = model.find_chain("Title").unwrap();
        assert_eq!(title.len(), 1);
        assert!(title[0].unique);
        assert_eq!(title[0].columns, vec![ColumnType::Text]);

        let position = model.find_chain("Position").unwrap();
        assert_eq!(position.len(), 2);
        assert_eq!(position[0].name, "Map");
        assert_eq!(position[1].columns.len(), 2);
    }

    #[test]
    fn test_key_column_resolves_forward() {
        let text = "tag Gene Locus key:Locus\n";
        // Locus declared after Gene, referenced from a tag: two passes
        let full = format!("class Gene\n{}class Locus\n", text);
        let db = parse_model(&full).unwrap();
        let (locus, _) = db.class_by_name("Locus").unwrap();
        let (_, gene) = db.class_by_name("Gene").unwrap();
        let chain = gene.model.as_ref().unwrap().find_chain("Locus").unwrap();
        assert_eq!(chain[0].columns, vec![ColumnType::KeyOf(locus)]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_model("class Gene\nbogus directive\n").unwrap_err();
        assert_eq!(err.0, 2);

        let err = parse_model("tag Gene Title text\n").unwrap_err();
        assert!(err.1.contains("unknown class"));

        let err = parse_model("class Gene\ntag Gene Title nonsense\n").unwrap_err();
        assert!(err.1.contains("unknown column type"));
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        let db = parse_model("# nothing\n\nclass Gene\n").unwrap();
        assert!(db.class_by_name("Gene").is_some());
    }
}
