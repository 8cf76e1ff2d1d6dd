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

//! Running statistics for one ingestion run.

use crate::diagnostic::ErrorCategory;

/// Counters accumulated across one run. Error counts are disjoint by
/// category; outcome counts are disjoint by what the commit did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Non-comment paragraphs found.
    pub nob: u64,
    /// Paragraphs fully processed without error.
    pub nok: u64,
    /// Paragraphs that failed, any category.
    pub nerr: u64,

    /// Malformed paragraph heads.
    pub ngen_err: u64,
    /// Per-object failures (tags, values, checkout, constraints, deletes).
    pub nobj_err: u64,
    /// Array parser failures and missing parsers.
    pub narr_err: u64,
    /// Rename and alias failures.
    pub nupd_err: u64,

    /// Tree objects created.
    pub nadded: u64,
    /// Tree objects changed.
    pub nedited: u64,
    /// Tree commits that left the object identical.
    pub nunchanged: u64,
    /// Objects and alias bindings deleted.
    pub ndeleted: u64,
    /// Objects renamed.
    pub nrenamed: u64,
    /// Objects aliased.
    pub naliased: u64,
    /// Array paragraphs stored.
    pub narray_added: u64,
    /// Array paragraphs that carried no data.
    pub narray_empty: u64,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_error(&mut self, category: ErrorCategory) {
        self.nerr += 1;
        match category {
            ErrorCategory::General => self.ngen_err += 1,
            ErrorCategory::Object => self.nobj_err += 1,
            ErrorCategory::Array => self.narr_err += 1,
            ErrorCategory::Update => self.nupd_err += 1,
        }
    }

    /// The end-of-run summary line. With `full` set, the per-outcome and
    /// per-category breakdown is appended.
    pub fn summary(&self, full: bool) -> String {
        let mut line = format!(
            "objects found: {}, ok: {}, failed: {}",
            self.nob, self.nok, self.nerr
        );
        if full {
            line.push_str(&format!(
                " (added {}, edited {}, unchanged {}, deleted {}, renamed {}, \
                 aliased {}, arrays {}, empty arrays {}; errors: general {}, \
                 object {}, array {}, update {})",
                self.nadded,
                self.nedited,
                self.nunchanged,
                self.ndeleted,
                self.nrenamed,
                self.naliased,
                self.narray_added,
                self.narray_empty,
                self.ngen_err,
                self.nobj_err,
                self.narr_err,
                self.nupd_err,
            ));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_buckets() {
        let mut stats = ParseStats::new();
        stats.record_error(ErrorCategory::General);
        stats.record_error(ErrorCategory::Object);
        stats.record_error(ErrorCategory::Object);
        stats.record_error(ErrorCategory::Array);
        stats.record_error(ErrorCategory::Update);
        assert_eq!(stats.nerr, 5);
        assert_eq!(stats.ngen_err, 1);
        assert_eq!(stats.nobj_err, 2);
        assert_eq!(stats.narr_err, 1);
        assert_eq!(stats.nupd_err, 1);
    }

    #[test]
    fn test_summary_short() {
        let mut stats = ParseStats::new();
        stats.nob = 3;
        stats.nok = 2;
        stats.nerr = 1;
        assert_eq!(stats.summary(false), "objects found: 3, ok: 2, failed: 1");
    }

    #[test]
    fn test_summary_full_breakdown() {
        let mut stats = ParseStats::new();
        stats.nob = 2;
        stats.nok = 2;
        stats.nadded = 1;
        stats.nedited = 1;
        let s = stats.summary(true);
        assert!(s.contains("added 1"));
        assert!(s.contains("edited 1"));
        assert!(s.contains("errors: general 0"));
    }
}
