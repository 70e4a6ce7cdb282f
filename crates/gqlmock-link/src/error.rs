//! Error types for the mock link.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GraphQL error location (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the query.
    pub line: u32,
    /// Column number in the query.
    pub column: u32,
}

/// GraphQL error path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    /// Field name.
    Key(String),
    /// Array index.
    Index(i64),
}

/// GraphQL error (per GraphQL spec), carried inside a mocked response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// Location(s) within the query.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Path within the response where the error occurred.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<GraphqlPathSegment>,
    /// Extensions metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlError {
    /// Create an error with a message only.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }
    }
}

/// Simulated transport failure declared on a mocked response.
///
/// This is the non-fatal outcome: it flows through the replay channel the
/// way a real failed network call would, and never aborts the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("network error: {message}")]
pub struct NetworkError {
    /// What the simulated transport reported.
    pub message: String,
}

impl NetworkError {
    /// Create a simulated transport error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fatal mock-setup failure, surfaced synchronously from
/// [`MockLink::request`](crate::MockLink::request).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MockLinkError {
    /// No registered mocked response matched the incoming request.
    ///
    /// The message embeds the rendered request plus a diff against every
    /// registered candidate, for test diagnosis only.
    #[error("{message}")]
    NoMatch {
        /// Full diagnostic text.
        message: String,
    },

    /// A matched mocked response declared neither `result` nor `error`.
    #[error("mocked response must declare `result` or `error` for {request_key}")]
    MalformedResponse {
        /// Fingerprint of the offending mocked response.
        request_key: String,
    },
}
