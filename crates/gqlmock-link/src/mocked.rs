//! Declared mocked responses.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::NetworkError;
use crate::operation::{MockRequest, MockResponse};

/// Zero-argument producer of a response payload.
pub type ResponseFn = Arc<dyn Fn() -> MockResponse + Send + Sync>;

/// Source of a mocked result: a literal payload or a producer invoked at
/// delivery time (fresh payload per delivery).
#[derive(Clone)]
pub enum ResponseSource {
    /// Literal response payload.
    Value(MockResponse),
    /// Producer invoked when the replay fires.
    Producer(ResponseFn),
}

impl ResponseSource {
    /// Resolve the payload to deliver.
    #[must_use]
    pub fn resolve(&self) -> MockResponse {
        match self {
            Self::Value(response) => response.clone(),
            Self::Producer(producer) => producer(),
        }
    }
}

impl fmt::Debug for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(response) => f.debug_tuple("Value").field(response).finish(),
            Self::Producer(_) => f.debug_tuple("Producer").field(&"<fn>").finish(),
        }
    }
}

/// A declared expectation: one request the test expects, and the outcome
/// to replay for it.
///
/// Exactly one of `result` / `error` must be set; a response with neither
/// fails the request with
/// [`MockLinkError::MalformedResponse`](crate::MockLinkError::MalformedResponse)
/// when matched.
#[derive(Clone)]
pub struct MockedResponse {
    /// The expected request.
    pub request: MockRequest,
    /// Result to replay on a match.
    pub result: Option<ResponseSource>,
    /// Simulated transport error to replay instead of a result.
    pub error: Option<NetworkError>,
    /// Delay before delivery.
    pub delay: Duration,
    /// When set, the response regenerates after each match: the producer
    /// supplies a fresh `result` and the response is re-enqueued.
    pub new_data: Option<ResponseFn>,
}

impl MockedResponse {
    /// Create a mocked response for a request. Attach an outcome with
    /// [`with_result`](Self::with_result) or [`with_error`](Self::with_error).
    #[must_use]
    pub const fn new(request: MockRequest) -> Self {
        Self {
            request,
            result: None,
            error: None,
            delay: Duration::ZERO,
            new_data: None,
        }
    }

    /// Set a literal result payload.
    #[must_use]
    pub fn with_result(mut self, response: MockResponse) -> Self {
        self.result = Some(ResponseSource::Value(response));
        self
    }

    /// Set a result producer, invoked at delivery time.
    #[must_use]
    pub fn with_result_producer(
        mut self,
        producer: impl Fn() -> MockResponse + Send + Sync + 'static,
    ) -> Self {
        self.result = Some(ResponseSource::Producer(Arc::new(producer)));
        self
    }

    /// Set a simulated transport error.
    #[must_use]
    pub fn with_error(mut self, error: NetworkError) -> Self {
        self.error = Some(error);
        self
    }

    /// Set the delivery delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make the response self-replenishing: after each match the producer
    /// regenerates `result` and the response goes back to the end of its
    /// queue.
    #[must_use]
    pub fn with_new_data(
        mut self,
        producer: impl Fn() -> MockResponse + Send + Sync + 'static,
    ) -> Self {
        self.new_data = Some(Arc::new(producer));
        self
    }
}

impl fmt::Debug for MockedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockedResponse")
            .field("request", &self.request)
            .field("result", &self.result)
            .field("error", &self.error)
            .field("delay", &self.delay)
            .field("new_data", &self.new_data.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
