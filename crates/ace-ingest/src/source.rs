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

//! The token source: buffered line reading with line numbers, push-back,
//! byte accounting, and truncation detection.
//!
//! End of stream is an observable state, not a side effect of a read: the
//! driver calls [`TokenSource::release`] when it transitions to done, and
//! byte accounting stays valid until then. An embedded NUL byte ends the
//! stream early and marks it truncated; the driver reports that as a warning
//! distinct from parse errors.

use memchr::memchr;
use std::io::{BufRead, BufReader, Read};

/// Buffered line source over an arbitrary reader.
pub struct TokenSource {
    reader: BufReader<Box<dyn Read>>,
    line_number: usize,
    /// Declared stream length, when the caller knows it.
    declared: Option<u64>,
    /// Bytes consumed from the underlying reader, line endings included.
    consumed: u64,
    pushed: Option<(usize, String)>,
    truncated: bool,
    eof: bool,
    released: bool,
}

impl TokenSource {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            declared: None,
            consumed: 0,
            pushed: None,
            truncated: false,
            eof: false,
            released: false,
        }
    }

    /// A source over in-memory text. The declared length is known.
    pub fn from_text(text: &str) -> Self {
        let declared = text.len() as u64;
        let cursor = std::io::Cursor::new(text.as_bytes().to_vec());
        let mut src = Self::new(Box::new(cursor));
        src.declared = Some(declared);
        src
    }

    /// Set the declared stream length for truncation accounting.
    pub fn with_declared_len(mut self, len: u64) -> Self {
        self.declared = Some(len);
        self
    }

    /// Read the next line, stripping the line ending. Returns the 1-based
    /// line number with the text, or `None` at end of stream. I/O failures
    /// surface as `Err`; the driver classifies them.
    pub fn next_line(&mut self) -> std::io::Result<Option<(usize, String)>> {
        if let Some(line) = self.pushed.take() {
            return Ok(Some(line));
        }
        if self.eof {
            return Ok(None);
        }
        let mut raw = Vec::new();
        let n = self.reader.read_until(b'\n', &mut raw)?;
        if n == 0 {
            self.eof = true;
            return Ok(None);
        }
        self.consumed += n as u64;

        // An embedded NUL means the stream was cut short by whatever wrote
        // it. Stop at the NUL and flag the truncation.
        if let Some(pos) = memchr(0, &raw) {
            self.consumed -= (raw.len() - pos) as u64;
            raw.truncate(pos);
            self.truncated = true;
            self.eof = true;
            if raw.is_empty() {
                return Ok(None);
            }
        }

        let mut text = String::from_utf8_lossy(&raw).into_owned();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        self.line_number += 1;
        Ok(Some((self.line_number, text)))
    }

    /// Put a line back; the next `next_line` returns it again.
    pub fn push_back(&mut self, line_number: usize, text: String) {
        self.pushed = Some((line_number, text));
    }

    /// Look at the next line without consuming it.
    pub fn peek_line(&mut self) -> std::io::Result<Option<&(usize, String)>> {
        if self.pushed.is_none() {
            if let Some((n, text)) = self.next_line()? {
                self.pushed = Some((n, text));
            }
        }
        Ok(self.pushed.as_ref())
    }

    /// The line number of the last line handed out.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Declared stream length, if known.
    pub fn declared(&self) -> Option<u64> {
        self.declared
    }

    /// Whether the stream ended early (embedded NUL or short read against
    /// the declared length).
    pub fn truncated(&self) -> bool {
        self.truncated || self.declared.is_some_and(|d| self.eof && self.consumed < d)
    }

    /// Mark the source released. Reading past this point is a driver bug and
    /// returns end of stream.
    pub fn release(&mut self) {
        self.released = true;
        self.eof = true;
        self.pushed = None;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}
