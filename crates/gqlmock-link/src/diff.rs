//! Request rendering and textual diff for no-match diagnostics.
//!
//! Both the diagnostic path and the registration path render requests
//! through [`RenderedRequest`], so the two sides of every diff follow
//! identical canonicalization rules.

use std::fmt;

use gqlmock_document::{Document, OperationKind};
use serde_json::Value;

/// A request rendered for diagnostics: operation kind, canonical query
/// text, and pretty-printed variables.
pub(crate) struct RenderedRequest {
    kind: OperationKind,
    query: String,
    variables: String,
}

impl RenderedRequest {
    pub(crate) fn new(document: &Document, variables: &Value) -> Self {
        Self {
            kind: document.operation_kind(),
            query: document.to_query_string(),
            variables: serde_json::to_string_pretty(variables)
                .unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

impl fmt::Display for RenderedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The canonical query text ends in a newline.
        write!(f, "{}:\n{}variables:\n{}", self.kind, self.query, self.variables)
    }
}

/// Line-oriented diff between two renderings.
///
/// Returns the empty string when the inputs are equal. Differing lines
/// carry `- ` (expected) and `+ ` (actual) markers; shared lines keep a
/// two-space prefix.
pub(crate) fn line_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::new();
    }

    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let max_lines = expected_lines.len().max(actual_lines.len());

    let mut diff = String::new();
    for index in 0..max_lines {
        let expected_line = expected_lines.get(index).copied().unwrap_or("");
        let actual_line = actual_lines.get(index).copied().unwrap_or("");
        if expected_line == actual_line {
            diff.push_str("  ");
            diff.push_str(expected_line);
            diff.push('\n');
        } else {
            if !expected_line.is_empty() {
                diff.push_str("- ");
                diff.push_str(expected_line);
                diff.push('\n');
            }
            if !actual_line.is_empty() {
                diff.push_str("+ ");
                diff.push_str(actual_line);
                diff.push('\n');
            }
        }
    }
    diff
}
