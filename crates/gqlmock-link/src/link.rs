//! The mock link: fingerprint lookup, variable disambiguation, and replay
//! scheduling.

use gqlmock_document::with_typename;
use serde_json::Value;
use tracing::debug;

use crate::diff::{line_diff, RenderedRequest};
use crate::error::MockLinkError;
use crate::mocked::MockedResponse;
use crate::operation::MockRequest;
use crate::registry::{request_key, ResponseRegistry};
use crate::replay::{MockReplay, ReplayPayload};

/// Deterministic test double for a GraphQL request layer.
///
/// Register mocked responses up front (or via [`register`](Self::register)),
/// then issue requests through [`request`](Self::request). Each request is
/// matched synchronously against the registered script; the outcome is
/// replayed asynchronously after the mocked delay.
pub struct MockLink {
    registry: ResponseRegistry,
}

impl MockLink {
    /// Create a link with `__typename` injection enabled, the default of
    /// the client behaviour under test.
    #[must_use]
    pub fn new(mocks: Vec<MockedResponse>) -> Self {
        Self::with_add_typename(mocks, true)
    }

    /// Create a link with explicit `__typename` configuration.
    #[must_use]
    pub fn with_add_typename(mocks: Vec<MockedResponse>, add_typename: bool) -> Self {
        let registry = ResponseRegistry::new(add_typename);
        for mocked in mocks {
            registry.register(mocked);
        }
        Self { registry }
    }

    /// Register one more mocked response after construction.
    pub fn register(&self, mocked: MockedResponse) {
        self.registry.register(mocked);
    }

    /// Intercept an outgoing request.
    ///
    /// Matching, queue mutation, and setup validation run synchronously;
    /// only delivery is deferred. Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`MockLinkError::NoMatch`] when no registered response has this
    /// request's fingerprint and variables;
    /// [`MockLinkError::MalformedResponse`] when the matched response
    /// declares neither `result` nor `error`.
    pub fn request(&self, request: &MockRequest) -> Result<MockReplay, MockLinkError> {
        let key = request_key(&request.document, self.registry.add_typename());
        let variables = request.normalized_variables();

        let Some(mocked) = self.registry.take_match(&key, &variables) else {
            return Err(self.no_match_error(request, &variables));
        };
        debug!(key = %key, delay = ?mocked.delay, "matched mocked response");

        let payload = if let Some(error) = mocked.error {
            ReplayPayload::Error(error)
        } else if let Some(result) = mocked.result {
            ReplayPayload::Result(result)
        } else {
            return Err(MockLinkError::MalformedResponse { request_key: key });
        };
        Ok(MockReplay::schedule(mocked.delay, payload))
    }

    /// Build the no-match diagnostic.
    ///
    /// The incoming request renders without `__typename` injection while
    /// every candidate renders with the link's configuration applied. The
    /// asymmetry mirrors the client behaviour under test (the incoming
    /// request is pre-transformation) and is kept as-is.
    fn no_match_error(&self, request: &MockRequest, variables: &Value) -> MockLinkError {
        let incoming = RenderedRequest::new(&request.document, variables).to_string();
        let mut message = format!("no more mocked responses for {incoming}");
        self.registry.for_each(|candidate| {
            let document = if self.registry.add_typename() {
                with_typename(&candidate.request.document)
            } else {
                candidate.request.document.clone()
            };
            let rendered =
                RenderedRequest::new(&document, &candidate.request.normalized_variables())
                    .to_string();
            let diff = line_diff(&incoming, &rendered);
            if !diff.is_empty() {
                message.push_str("\n\npossible matching mock:\n");
                message.push_str(&diff);
            }
        });
        debug!("no mocked response matched");
        MockLinkError::NoMatch { message }
    }
}
