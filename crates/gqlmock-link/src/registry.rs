//! Fingerprint computation and per-fingerprint response queues.

use std::collections::HashMap;
use std::collections::VecDeque;

use gqlmock_document::{strip_client_selections, strip_connection_directive, with_typename, Document};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::mocked::{MockedResponse, ResponseSource};

/// Compute the fingerprint for a document.
///
/// The fingerprint is the deterministic serialization of
/// `{"query": <canonical text>}`, with `__typename` injected first when
/// the link is configured for it. Variables are deliberately excluded:
/// responses for the same operation with different variables share one
/// queue and are disambiguated at match time.
pub(crate) fn request_key(document: &Document, add_typename: bool) -> String {
    let printed = if add_typename {
        with_typename(document).to_query_string()
    } else {
        document.to_query_string()
    };
    let mut key = serde_json::Map::new();
    key.insert("query".to_string(), Value::String(printed));
    Value::Object(key).to_string()
}

/// Ordered queues of normalized mocked responses, bucketed by fingerprint.
///
/// The single mutex spans the whole scan-remove-reappend sequence, so two
/// concurrent requests for one fingerprint can never both claim the same
/// response.
pub(crate) struct ResponseRegistry {
    add_typename: bool,
    queues: Mutex<HashMap<String, VecDeque<MockedResponse>>>,
}

impl ResponseRegistry {
    pub(crate) fn new(add_typename: bool) -> Self {
        Self {
            add_typename,
            queues: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) const fn add_typename(&self) -> bool {
        self.add_typename
    }

    /// Normalize a mocked response and append it to its fingerprint queue.
    ///
    /// Normalization happens exactly once, here: the `@connection`
    /// directive is removed, then `@client` selections are stripped. When
    /// stripping would empty the document (a client-only query), the
    /// unstripped document is kept so the response stays matchable.
    pub(crate) fn register(&self, mocked: MockedResponse) {
        let normalized = normalize(mocked);
        let key = request_key(&normalized.request.document, self.add_typename);
        debug!(key = %key, "registering mocked response");
        self.queues
            .lock()
            .entry(key)
            .or_default()
            .push_back(normalized);
    }

    /// Remove and return the first queued response whose variables match.
    ///
    /// A response carrying `new_data` regenerates: its `result` is replaced
    /// by a fresh payload and a copy goes back to the end of the queue, so
    /// the queue length is invariant across the match. The returned
    /// response carries the regenerated result.
    pub(crate) fn take_match(&self, key: &str, variables: &Value) -> Option<MockedResponse> {
        let mut queues = self.queues.lock();
        let queue = queues.get_mut(key)?;
        let position = queue
            .iter()
            .position(|candidate| candidate.request.normalized_variables() == *variables)?;
        let mut mocked = queue.remove(position)?;
        if let Some(new_data) = mocked.new_data.clone() {
            mocked.result = Some(ResponseSource::Value(new_data()));
            queue.push_back(mocked.clone());
        }
        Some(mocked)
    }

    /// Visit every registered response across all queues.
    pub(crate) fn for_each(&self, mut visit: impl FnMut(&MockedResponse)) {
        let queues = self.queues.lock();
        for queue in queues.values() {
            for mocked in queue {
                visit(mocked);
            }
        }
    }

    /// Queue length for a fingerprint.
    pub(crate) fn queue_len(&self, key: &str) -> usize {
        self.queues.lock().get(key).map_or(0, VecDeque::len)
    }
}

fn normalize(mut mocked: MockedResponse) -> MockedResponse {
    let document = strip_connection_directive(&mocked.request.document);
    mocked.request.document = strip_client_selections(&document).unwrap_or(document);
    mocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{MockRequest, MockResponse};
    use serde_json::json;

    fn mocked(source: &str) -> MockedResponse {
        MockedResponse::new(MockRequest::parse(source).unwrap())
            .with_result(MockResponse::data(json!({"ok": true})))
    }

    #[test]
    fn fingerprint_is_stable_across_formatting() {
        let spaced = Document::parse("query Q { user { id  name } }").unwrap();
        let compact = Document::parse("query Q{user{id,name}}").unwrap();
        assert_eq!(request_key(&spaced, true), request_key(&compact, true));
    }

    #[test]
    fn fingerprint_reflects_typename_configuration() {
        let document = Document::parse("{ user { id } }").unwrap();
        let with_marker = request_key(&document, true);
        let without_marker = request_key(&document, false);
        assert_ne!(with_marker, without_marker);
        assert!(with_marker.contains("__typename"));
    }

    #[test]
    fn fingerprint_excludes_variables() {
        let registry = ResponseRegistry::new(true);
        let source = "query Q($id: ID!) { user(id: $id) { id } }";
        let request = MockRequest::parse(source)
            .unwrap()
            .with_variables(json!({"id": "1"}));
        registry.register(
            MockedResponse::new(request).with_result(MockResponse::data(json!({"ok": true}))),
        );
        // The key computed without any variables still reaches that queue.
        let key = request_key(&Document::parse(source).unwrap(), true);
        assert_eq!(registry.queue_len(&key), 1);
    }

    #[test]
    fn registration_strips_connection_directive() {
        let registry = ResponseRegistry::new(false);
        registry.register(mocked("{ feed @connection(key: \"feed\") { id } }"));
        let stripped = Document::parse("{ feed { id } }").unwrap();
        assert_eq!(registry.queue_len(&request_key(&stripped, false)), 1);
    }

    #[test]
    fn registration_strips_client_selections() {
        let registry = ResponseRegistry::new(false);
        registry.register(mocked("{ user { id local @client } }"));
        let stripped = Document::parse("{ user { id } }").unwrap();
        assert_eq!(registry.queue_len(&request_key(&stripped, false)), 1);
    }

    #[test]
    fn client_only_document_keeps_unstripped_form() {
        let registry = ResponseRegistry::new(false);
        let source = "{ settings @client { theme } }";
        registry.register(mocked(source));
        let original = Document::parse(source).unwrap();
        assert_eq!(registry.queue_len(&request_key(&original, false)), 1);
    }

    #[test]
    fn take_match_consumes_in_insertion_order() {
        let registry = ResponseRegistry::new(false);
        let source = "{ counter }";
        registry.register(mocked(source).with_delay(std::time::Duration::from_millis(1)));
        registry.register(mocked(source).with_delay(std::time::Duration::from_millis(2)));
        let key = request_key(&Document::parse(source).unwrap(), false);
        let first = registry.take_match(&key, &json!({})).unwrap();
        assert_eq!(first.delay, std::time::Duration::from_millis(1));
        assert_eq!(registry.queue_len(&key), 1);
    }

    #[test]
    fn new_data_keeps_queue_length_invariant() {
        let registry = ResponseRegistry::new(false);
        let source = "{ counter }";
        registry.register(
            MockedResponse::new(MockRequest::parse(source).unwrap())
                .with_new_data(|| MockResponse::data(json!({"counter": 1}))),
        );
        let key = request_key(&Document::parse(source).unwrap(), false);
        for _ in 0..3 {
            let taken = registry.take_match(&key, &json!({})).unwrap();
            assert!(taken.result.is_some());
            assert_eq!(registry.queue_len(&key), 1);
        }
    }
}
