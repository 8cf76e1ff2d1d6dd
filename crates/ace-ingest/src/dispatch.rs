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

//! The paragraph dispatcher.
//!
//! Given the tokenised head line of a paragraph, decide what the paragraph
//! is: a synchronous verb command (`-D` delete, `-R` rename, `-A` alias), an
//! array-class paragraph, or a tree-class paragraph to be walked body
//! line by body line. Verb commands execute here and never enter the tree
//! walker.

use crate::context::ParseOptions;
use crate::diagnostic::Failure;
use ace_core::{AceErrorKind, ClassId, ClassKind, Database, Key};

/// Outcome of head dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeadAction {
    /// A verb command was executed synchronously.
    Verb(VerbOutcome),
    /// An array-class paragraph; the body belongs to the registry.
    Array { key: Key },
    /// A tree-class paragraph; the driver proceeds to checkout.
    Tree {
        key: Key,
        is_new: bool,
        stamp: Option<Key>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerbOutcome {
    Deleted,
    Renamed,
    Aliased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    None,
    Delete,
    Rename,
    /// Alias is a rename that keeps the old name bound.
    Alias,
}

/// Dispatch one paragraph head. `words` is the tokenised head line,
/// guaranteed non-empty by the driver.
pub(crate) fn dispatch_head(
    db: &mut Database,
    options: &ParseOptions,
    words: &[String],
) -> Result<HeadAction, Failure> {
    let (verb, rest) = match words[0].as_str() {
        "-D" => (Verb::Delete, &words[1..]),
        "-R" => (Verb::Rename, &words[1..]),
        "-A" => (Verb::Alias, &words[1..]),
        _ => (Verb::None, words),
    };
    if rest.is_empty() {
        return Err(Failure::general("missing verb argument"));
    }

    let (class_name, name, rest) = parse_target(options, rest)?;

    let (class, def) = db
        .class_by_name(&class_name)
        .ok_or_else(|| Failure::general(format!("unknown class {:?}", class_name)))?;
    if def.protected && !options.allow_protected {
        return Err(Failure::general(format!(
            "class {:?} is protected",
            class_name
        )));
    }
    let kind = def.kind;

    match verb {
        Verb::None => dispatch_edit(db, class, kind, &name, rest),
        Verb::Delete => execute_delete(db, class, kind, &name),
        Verb::Rename | Verb::Alias => {
            let keep_old = verb == Verb::Alias;
            execute_rename(db, class, kind, &name, rest, keep_old)
        }
    }
}

/// Extract `(class, name, remaining words)` from a head. Accepted shapes:
/// `Class:Name`, `Class: Name`, `Class : Name`, `Class Name`, and the `>`
/// FASTA shorthand where the class comes from configuration.
fn parse_target<'a>(
    options: &ParseOptions,
    words: &'a [String],
) -> Result<(String, String, &'a [String]), Failure> {
    let first = &words[0];

    if let Some(rest_of_token) = first.strip_prefix('>') {
        let class = options
            .fasta_class
            .clone()
            .ok_or_else(|| Failure::general("no class configured for '>' shorthand"))?;
        if !rest_of_token.is_empty() {
            return Ok((class, rest_of_token.to_string(), &words[1..]));
        }
        let name = words
            .get(1)
            .ok_or_else(|| Failure::general("missing object name after '>'"))?;
        return Ok((class, name.clone(), &words[2..]));
    }

    if let Some((class, after)) = first.split_once(':') {
        if !after.is_empty() {
            return Ok((class.to_string(), after.to_string(), &words[1..]));
        }
        let name = words
            .get(1)
            .ok_or_else(|| Failure::general("missing object name"))?;
        return Ok((class.to_string(), name.clone(), &words[2..]));
    }

    // `Class : Name` tokenises the colon separately.
    let mut idx = 1;
    if words.get(idx).map(String::as_str) == Some(":") {
        idx += 1;
    }
    let name = words
        .get(idx)
        .ok_or_else(|| Failure::general("missing object name"))?;
    Ok((first.clone(), name.clone(), &words[idx + 1..]))
}

fn dispatch_edit(
    db: &mut Database,
    class: ClassId,
    kind: ClassKind,
    name: &str,
    rest: &[String],
) -> Result<HeadAction, Failure> {
    let is_new = db.resolve(class, name).is_none();
    let key = db
        .resolve_or_create(class, name)
        .map_err(|e| Failure::general(e.message))?;

    match kind {
        ClassKind::Array => Ok(HeadAction::Array { key }),
        ClassKind::Tree => {
            let mut stamp = None;
            if rest.first().map(String::as_str) == Some("-O") {
                let ts = rest
                    .get(1)
                    .ok_or_else(|| Failure::general("missing timestamp after -O"))?;
                stamp = Some(
                    db.session_key(ts)
                        .map_err(|e| Failure::general(e.message))?,
                );
            }
            Ok(HeadAction::Tree { key, is_new, stamp })
        }
    }
}

fn execute_delete(
    db: &mut Database,
    class: ClassId,
    kind: ClassKind,
    name: &str,
) -> Result<HeadAction, Failure> {
    let key = db
        .resolve(class, name)
        .ok_or_else(|| Failure::object(format!("object {:?} does not exist", name)))?;

    // Deleting an alias binding removes only the name, never the object.
    if db.is_alias_binding(class, name) {
        db.remove_binding(class, name);
        return Ok(HeadAction::Verb(VerbOutcome::Deleted));
    }

    match kind {
        ClassKind::Array => {
            db.destroy_array(key);
            Ok(HeadAction::Verb(VerbOutcome::Deleted))
        }
        ClassKind::Tree => {
            let cursor = db.checkout(key).map_err(|e| Failure::object(e.message))?;
            db.kill(cursor);
            Ok(HeadAction::Verb(VerbOutcome::Deleted))
        }
    }
}

fn execute_rename(
    db: &mut Database,
    class: ClassId,
    kind: ClassKind,
    old_name: &str,
    rest: &[String],
    keep_old: bool,
) -> Result<HeadAction, Failure> {
    let key = db
        .resolve(class, old_name)
        .ok_or_else(|| Failure::update(format!("object {:?} does not exist", old_name)))?;
    let new_name = rest
        .first()
        .ok_or_else(|| Failure::general("missing new name"))?;

    db.alias(key, new_name, keep_old).map_err(|e| {
        if e.kind == AceErrorKind::Fatal {
            Failure::fatal(e.message)
        } else {
            Failure::update(e.message)
        }
    })?;

    // The renamed object goes back through the constraint gate exactly like
    // a normal edit.
    if kind == ClassKind::Tree {
        let cursor = db.checkout(key).map_err(|e| Failure::update(e.message))?;
        db.commit(cursor, None)
            .map_err(|e| Failure::update(e.message))?;
    }

    Ok(HeadAction::Verb(if keep_old {
        VerbOutcome::Aliased
    } else {
        VerbOutcome::Renamed
    }))
}
