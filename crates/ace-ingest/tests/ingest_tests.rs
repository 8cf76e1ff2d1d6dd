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

//! End-to-end ingestion tests: recovery, idempotence, resumability, and
//! checkout contention.

use ace_core::{ClassDef, ClassId, ColumnType, Database, Key, Model, ObjectTree, TagSpec};
use ace_ingest::{
    parse_stream, parse_text, ArrayOutcome, ArrayRegistry, Diagnostic, ErrorCategory,
    ParseContext, ParseOptions, ParseState, StepMode, TokenSource,
};

fn test_db() -> Database {
    let mut db = Database::new();
    let model = Model::new(vec![
        TagSpec::new("Title", vec![ColumnType::Text]).unique(),
        TagSpec::new("Synonym", vec![ColumnType::Text]),
        TagSpec::group(
            "Map",
            vec![TagSpec::new(
                "Position",
                vec![ColumnType::Float, ColumnType::Float],
            )],
        ),
    ]);
    db.register_class(ClassDef::tree("Gene").with_model(model))
        .unwrap();
    db.register_class(ClassDef::array("Sequence")).unwrap();
    db
}

fn seq_registry() -> ArrayRegistry {
    let mut registry = ArrayRegistry::new();
    registry.register(
        ClassId(2),
        Box::new(|source: &mut TokenSource, db: &mut Database, key: Key| {
            let mut data = String::new();
            while let Ok(Some((_, line))) = source.next_line() {
                if line.trim().is_empty() {
                    break;
                }
                data.push_str(line.trim());
            }
            if data.is_empty() {
                ArrayOutcome::Empty
            } else if data.chars().all(|c| "acgtn".contains(c)) {
                db.put_array(key, data.into_bytes());
                ArrayOutcome::Ok
            } else {
                ArrayOutcome::Err("bad base in sequence".to_string())
            }
        }),
    );
    registry
}

fn quiet() -> ParseOptions {
    ParseOptions::builder().quiet(true).keep_going(true).build()
}

fn gene_key(db: &Database, name: &str) -> Option<Key> {
    let (gene, _) = db.class_by_name("Gene").unwrap();
    db.resolve(gene, name)
}

// ==================== concrete scenarios ====================

#[test]
fn test_simple_gene_commit() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let report = parse_text(
        &mut db,
        &registry,
        "Gene : \"abc\"\nTitle  \"hello\"\n\n",
        quiet(),
    );
    assert!(report.ok);
    assert_eq!(report.stats.nadded, 1);
    assert_eq!(report.stats.nok, 1);

    let key = gene_key(&db, "abc").unwrap();
    let tree = db.object(key).unwrap();
    assert_eq!(tree.first("Title").and_then(|v| v.as_text()), Some("hello"));
}

#[test]
fn test_delete_missing_object() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let report = parse_text(&mut db, &registry, "-D Gene : \"abc\"\n\n", quiet());
    assert!(!report.ok);
    assert_eq!(report.stats.nerr, 1);
    assert_eq!(report.stats.nobj_err, 1);
    assert_eq!(report.stats.nadded, 0);
    assert!(gene_key(&db, "abc").is_none());
}

#[test]
fn test_unknown_class_recovers() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let report = parse_text(
        &mut db,
        &registry,
        "Bogus : \"x\"\n\nGene : abc\nTitle t\n\n",
        quiet(),
    );
    assert!(!report.ok);
    assert_eq!(report.stats.ngen_err, 1);
    assert_eq!(report.stats.nadded, 1);
    assert!(gene_key(&db, "abc").is_some());
}

// ==================== idempotence ====================

#[test]
fn test_reingest_is_idempotent() {
    let text = "Gene : abc\n\
                Title \"hello\"\n\
                Synonym first\n\
                Synonym second\n\
                Position 1.5 2.5\n\
                \n\
                Gene : def\n\
                Title \"other\"\n\
                \n";
    let mut db = test_db();
    let registry = ArrayRegistry::new();

    let first = parse_text(&mut db, &registry, text, quiet());
    assert!(first.ok);
    assert_eq!(first.stats.nadded, 2);
    let snapshot: Vec<ObjectTree> = first
        .touched
        .iter()
        .map(|k| db.object(*k).unwrap().clone())
        .collect();

    let second = parse_text(&mut db, &registry, text, quiet());
    assert!(second.ok);
    assert_eq!(second.stats.nadded, 0);
    assert_eq!(second.stats.nedited, 0);
    assert_eq!(second.stats.nunchanged, 2);

    let after: Vec<ObjectTree> = second
        .touched
        .iter()
        .map(|k| db.object(*k).unwrap().clone())
        .collect();
    assert_eq!(snapshot, after);
}

#[test]
fn test_spelled_tag_path_is_idempotent() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let first = parse_text(
        &mut db,
        &registry,
        "Gene : g\nMap Position 1.5 2.5\n\n",
        quiet(),
    );
    assert!(first.ok);
    assert_eq!(first.stats.nadded, 1);

    let key = gene_key(&db, "g").unwrap();
    let map = db.object(key).unwrap().find_tag("Map").unwrap();
    assert_eq!(map.children.len(), 1);
    assert_eq!(map.children[0].tag_name(), Some("Position"));

    // The bare spelling of the same line changes nothing
    let second = parse_text(&mut db, &registry, "Gene : g\nPosition 1.5 2.5\n\n", quiet());
    assert!(second.ok);
    assert_eq!(second.stats.nunchanged, 1);
}

// ==================== boundary skipping ====================

#[test]
fn test_recovery_over_blank_line_boundary() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    // Body error mid-object; next paragraph must still parse
    let report = parse_text(
        &mut db,
        &registry,
        "Gene : bad\nNotATag x\nSynonym lost\n\nGene : good\nTitle t\n\n",
        quiet(),
    );
    assert_eq!(report.stats.nobj_err, 1);
    assert_eq!(report.stats.nadded, 1);
    assert!(gene_key(&db, "good").is_some());
    // The failed object was discarded, not partially committed
    let bad = gene_key(&db, "bad").unwrap();
    assert!(db.object(bad).is_none());
}

#[test]
fn test_verb_line_is_implicit_boundary() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let (gene, _) = db.class_by_name("Gene").unwrap();
    db.resolve_or_create(gene, "victim").unwrap();
    let mut c = db.checkout(gene_key(&db, "victim").unwrap()).unwrap();
    c.begin_line();
    c.add_tag("Title");
    c.add_value(ace_core::Value::Text("t".to_string()));
    db.commit(c, None).unwrap();

    // No blank line between the failing paragraph and the -R directive
    let report = parse_text(
        &mut db,
        &registry,
        "Gene : bad\nNotATag x\n-R Gene : victim renamed\n\n",
        quiet(),
    );
    assert_eq!(report.stats.nobj_err, 1);
    assert_eq!(report.stats.nrenamed, 1);
    assert!(gene_key(&db, "renamed").is_some());
    assert!(gene_key(&db, "victim").is_none());
}

#[test]
fn test_general_error_skips_whole_paragraph() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let report = parse_text(
        &mut db,
        &registry,
        "Bogus : x\nTitle \"swallowed with the bad head\"\n\nGene : abc\nTitle t\n\n",
        quiet(),
    );
    assert_eq!(report.stats.ngen_err, 1);
    assert_eq!(report.stats.nob, 2);
    assert_eq!(report.stats.nadded, 1);
}

// ==================== commit gate ====================

#[test]
fn test_constraint_gate_failure_recovers() {
    let mut db = test_db();
    let (gene, _) = db.class_by_name("Gene").unwrap();
    db.add_constraint(
        gene,
        Box::new(|tree: &ObjectTree| {
            if tree.find_tag("Title").is_some() {
                Ok(())
            } else {
                Err("a Gene requires a Title".to_string())
            }
        }),
    );

    let registry = ArrayRegistry::new();
    let report = parse_text(
        &mut db,
        &registry,
        "Gene : bad\nSynonym nick\n\nGene : good\nTitle t\n\n",
        quiet(),
    );
    assert!(!report.ok);
    assert_eq!(report.stats.nobj_err, 1);
    assert_eq!(report.diagnostics[0].category(), Some(ErrorCategory::Object));

    // The rejected tree was dropped and the lock released
    let bad = gene_key(&db, "bad").unwrap();
    assert!(!db.exists(bad));
    assert!(!db.is_locked(bad));
    // The scanner was already at the boundary; the next paragraph parsed
    assert_eq!(report.stats.nadded, 1);
    assert!(gene_key(&db, "good").is_some());
}

// ==================== verbs ====================

#[test]
fn test_batched_verbs() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    parse_text(
        &mut db,
        &registry,
        "Gene : a\nTitle t\n\nGene : b\nTitle u\n\n",
        quiet(),
    );

    let report = parse_text(
        &mut db,
        &registry,
        "-R Gene : a a2\n-A Gene : b b2\n-D Gene : a2\n\n",
        quiet(),
    );
    assert!(report.ok);
    assert_eq!(report.stats.nrenamed, 1);
    assert_eq!(report.stats.naliased, 1);
    assert_eq!(report.stats.ndeleted, 1);
    assert!(gene_key(&db, "a2").is_none() || !db.exists(gene_key(&db, "a2").unwrap()));
    let b = gene_key(&db, "b").unwrap();
    assert_eq!(gene_key(&db, "b2"), Some(b));
}

// ==================== arrays ====================

#[test]
fn test_array_paragraph_roundtrip() {
    let mut db = test_db();
    let registry = seq_registry();
    let report = parse_text(
        &mut db,
        &registry,
        "Sequence : s1\nacgt\nacgt\n\n",
        quiet(),
    );
    assert!(report.ok);
    assert_eq!(report.stats.narray_added, 1);
    let (seq, _) = db.class_by_name("Sequence").unwrap();
    let key = db.resolve(seq, "s1").unwrap();
    assert_eq!(db.get_array(key), Some(b"acgtacgt".as_slice()));
}

#[test]
fn test_fasta_shorthand() {
    let mut db = test_db();
    let registry = seq_registry();
    let options = ParseOptions::builder()
        .quiet(true)
        .keep_going(true)
        .fasta_class("Sequence")
        .build();
    let report = parse_text(&mut db, &registry, ">s2\nacgtn\n\n", options);
    assert!(report.ok);
    assert_eq!(report.stats.narray_added, 1);
}

#[test]
fn test_array_parser_error_does_not_lose_next_paragraph() {
    let mut db = test_db();
    let registry = seq_registry();
    let report = parse_text(
        &mut db,
        &registry,
        "Sequence : s1\nacgtXXX\n\nGene : abc\nTitle t\n\n",
        quiet(),
    );
    assert_eq!(report.stats.narr_err, 1);
    assert_eq!(report.stats.nadded, 1);
}

#[test]
fn test_missing_array_parser() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let report = parse_text(
        &mut db,
        &registry,
        "Sequence : s1\nacgt\n\nGene : abc\nTitle t\n\n",
        quiet(),
    );
    assert_eq!(report.stats.narr_err, 1);
    assert_eq!(report.stats.nadded, 1);
}

// ==================== checkout contention ====================

#[test]
fn test_interleaved_contexts_one_locked() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();

    // First context opens the object and pauses inside it
    let mut first = ParseContext::from_text("Gene : abc\nTitle t\n\n", quiet());
    first.advance(&mut db, &registry); // head -> RefBlocked
    first.advance(&mut db, &registry); // checkout -> Inside
    assert_eq!(first.state(), ParseState::Inside);

    // Second context targets the same key while it is checked out
    let mut second = ParseContext::from_text("Gene : abc\nSynonym s\n\n", quiet());
    second.step(&mut db, &registry, StepMode::Full);
    assert!(second.error_seen());
    assert_eq!(second.stats().nobj_err, 1);
    assert_eq!(second.stats().nok, 0);

    // First context still completes normally
    first.step(&mut db, &registry, StepMode::Full);
    assert!(!first.error_seen());
    assert_eq!(first.stats().nadded, 1);

    let key = gene_key(&db, "abc").unwrap();
    let tree = db.object(key).unwrap();
    assert_eq!(tree.first("Title").and_then(|v| v.as_text()), Some("t"));
    // The locked attempt left no partial data
    assert!(tree.find_tag("Synonym").is_none());
}

// ==================== resumability ====================

#[test]
fn test_stepwise_equals_full_run() {
    let text = "Gene : a\nTitle t\n\n\
                ! comment\n\n\
                Gene : b\nTitle u\nSynonym s\n\n\
                -R Gene : a a2\n\n\
                Gene : c\nTitle v\n\n";
    let registry = ArrayRegistry::new();

    let mut full_db = test_db();
    let mut full_ctx = ParseContext::from_text(text, quiet());
    full_ctx.step(&mut full_db, &registry, StepMode::Full);

    let mut step_db = test_db();
    let mut step_ctx = ParseContext::from_text(text, quiet());
    while step_ctx.state() != ParseState::Done {
        step_ctx.step(&mut step_db, &registry, StepMode::UntilObjectBoundary);
    }

    assert_eq!(full_ctx.stats(), step_ctx.stats());
    assert_eq!(full_ctx.touched(), step_ctx.touched());
}

// ==================== truncation ====================

#[test]
fn test_embedded_nul_warns_but_does_not_fail() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let source = TokenSource::new(Box::new(std::io::Cursor::new(
        b"Gene : abc\nTitle t\n\n\0trailing garbage".to_vec(),
    )));
    let mut ctx = ParseContext::new(source, quiet());
    ctx.step(&mut db, &registry, StepMode::Full);

    assert!(!ctx.error_seen());
    assert_eq!(ctx.stats().nadded, 1);
    assert!(ctx
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::Truncated { .. })));
}

// ==================== diagnostics ====================

#[test]
fn test_diagnostic_categories_and_format() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let report = parse_text(&mut db, &registry, "Bogus : x\n\n", quiet());
    let diag = &report.diagnostics[0];
    assert_eq!(diag.category(), Some(ErrorCategory::General));
    let rendered = format!("{}", diag);
    assert!(rendered.starts_with("general parse error, near line 1 while parsing \"Bogus : x\""));
    assert!(rendered.contains("error was:"));
}

#[test]
fn test_diagnostic_points_at_failing_line() {
    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let report = parse_text(
        &mut db,
        &registry,
        "Gene : abc\nTitle t\nNotATag x\n\n",
        quiet(),
    );
    match &report.diagnostics[0] {
        Diagnostic::Parse { line, head, .. } => {
            assert_eq!(*line, 3);
            assert_eq!(head, "Gene : abc");
        }
        other => panic!("unexpected diagnostic {:?}", other),
    }
}

// ==================== stream entry point ====================

#[test]
fn test_parse_stream_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.ace");
    std::fs::write(&path, "Gene : abc\nTitle t\n\n").unwrap();

    let mut db = test_db();
    let registry = ArrayRegistry::new();
    let file = std::fs::File::open(&path).unwrap();
    let report = parse_stream(&mut db, &registry, Box::new(file), quiet());
    assert!(report.ok);
    assert_eq!(report.stats.nadded, 1);
    assert!(gene_key(&db, "abc").is_some());
}
