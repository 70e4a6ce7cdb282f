//! Request and response payload types.

use gqlmock_document::{Document, ParseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphqlError;

/// An outgoing GraphQL request: an operation document plus optional
/// variables.
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// Operation document.
    pub document: Document,
    /// Variables payload; `None` and `{}` are equivalent for matching.
    pub variables: Option<Value>,
}

impl MockRequest {
    /// Create a request with no variables.
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self {
            document,
            variables: None,
        }
    }

    /// Parse the operation from source text.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Self::new(Document::parse(source)?))
    }

    /// Attach variables, usually via `serde_json::json!`.
    #[must_use]
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Variables normalized for matching: absent and `null` both become
    /// an empty object, so `{}`-vs-missing never breaks a match.
    #[must_use]
    pub(crate) fn normalized_variables(&self) -> Value {
        match &self.variables {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(value) => value.clone(),
        }
    }
}

/// A GraphQL response payload replayed by the mock link.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MockResponse {
    /// Response data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// GraphQL errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
    /// Extensions payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl MockResponse {
    /// Response carrying data only.
    #[must_use]
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Response carrying a single GraphQL error.
    #[must_use]
    pub fn graphql_error(error: GraphqlError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }

    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
