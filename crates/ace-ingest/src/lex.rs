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

//! Word tokenisation for ACE lines.
//!
//! Words are whitespace-separated. Double quotes group a word containing
//! whitespace; inside quotes `\"` and `\\` escape. Quote state is per line;
//! a quote left open at the end of the line is an error.

/// Split a line into words, honouring double quotes and escapes.
pub(crate) fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => in_quotes = false,
                '\\' => match chars.next() {
                    Some(escaped) => word.push(escaped),
                    None => return Err("dangling backslash in quoted string".to_string()),
                },
                _ => word.push(c),
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut word));
                        in_word = false;
                    }
                }
                _ => {
                    in_word = true;
                    word.push(c);
                }
            }
        }
    }
    if in_quotes {
        return Err("unterminated quoted string".to_string());
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}
