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

//! Integration tests for the `ace` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MODEL: &str = "\
class Gene
class Sequence array
tag Gene unique Title text
tag Gene Synonym text
";

fn write_files(model: &str, ace: &str) -> (TempDir, String, String) {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("model.def");
    let ace_path = dir.path().join("input.ace");
    fs::write(&model_path, model).unwrap();
    fs::write(&ace_path, ace).unwrap();
    let m = model_path.to_string_lossy().into_owned();
    let a = ace_path.to_string_lossy().into_owned();
    (dir, m, a)
}

fn ace() -> Command {
    Command::cargo_bin("ace").unwrap()
}

#[test]
fn test_ingest_success() {
    let (_dir, model, input) = write_files(MODEL, "Gene : abc\nTitle \"hello\"\n\n");
    ace()
        .args(["ingest", &input, "--model", &model])
        .assert()
        .success()
        .stderr(predicate::str::contains("objects found: 1, ok: 1, failed: 0"))
        .stdout(predicate::str::contains("1 object(s) committed"));
}

#[test]
fn test_ingest_error_fails_without_keep_going() {
    let (_dir, model, input) = write_files(MODEL, "Bogus : x\n\n");
    ace()
        .args(["ingest", &input, "--model", &model])
        .assert()
        .failure()
        .stderr(predicate::str::contains("general parse error"))
        .stderr(predicate::str::contains("unknown class"));
}

#[test]
fn test_ingest_keep_going_succeeds_despite_errors() {
    let (_dir, model, input) = write_files(MODEL, "Bogus : x\n\nGene : abc\nTitle t\n\n");
    ace()
        .args(["ingest", &input, "--model", &model, "--keep-going"])
        .assert()
        .success()
        .stderr(predicate::str::contains("failed: 1"));
}

#[test]
fn test_ingest_quiet_suppresses_diagnostics() {
    let (_dir, model, input) = write_files(MODEL, "Bogus : x\n\n");
    ace()
        .args(["ingest", &input, "--model", &model, "--keep-going", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse error").not());
}

#[test]
fn test_ingest_full_stats() {
    let (_dir, model, input) = write_files(MODEL, "Gene : abc\nTitle t\n\n");
    ace()
        .args(["ingest", &input, "--model", &model, "--full-stats"])
        .assert()
        .success()
        .stderr(predicate::str::contains("added 1"));
}

#[test]
fn test_ingest_fasta_shorthand() {
    let (_dir, model, input) = write_files(MODEL, ">s1\nacgt\n\n");
    ace()
        .args([
            "ingest",
            &input,
            "--model",
            &model,
            "--fasta-class",
            "Sequence",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("ok: 1"));
}

#[test]
fn test_model_prints_class_table() {
    let (_dir, model, _input) = write_files(MODEL, "");
    ace()
        .args(["model", &model])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gene"))
        .stdout(predicate::str::contains("Sequence"))
        .stdout(predicate::str::contains("array"));
}

#[test]
fn test_model_rejects_bad_file() {
    let (_dir, model, _input) = write_files("class Gene\nnonsense here\n", "");
    ace()
        .args(["model", &model])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_missing_input_file() {
    let (_dir, model, _input) = write_files(MODEL, "");
    ace()
        .args(["ingest", "/no/such/file.ace", "--model", &model])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}
