use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gqlmock_link::{
    MockLink, MockLinkError, MockRequest, MockResponse, MockedResponse, NetworkError,
};

const GET_USER: &str = "query GetUser($id: ID!) { user(id: $id) { id name } }";
const GET_FEED: &str = "query GetFeed { feed { id } }";

static INIT: Once = Once::new();

fn init_test_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .compact(),
            )
            .init();
    });
}

fn user_request(id: &str) -> MockRequest {
    MockRequest::parse(GET_USER)
        .unwrap()
        .with_variables(json!({ "id": id }))
}

fn user_response(id: &str, name: &str) -> MockResponse {
    MockResponse::data(json!({ "user": { "id": id, "name": name } }))
}

#[tokio::test]
async fn matching_request_yields_registered_result_once() {
    init_test_tracing();
    let link = MockLink::new(vec![
        MockedResponse::new(user_request("1")).with_result(user_response("1", "Ann")),
    ]);

    let outcome = link
        .request(&user_request("1"))
        .expect("first request should match")
        .recv()
        .await
        .expect("delivery should not be cancelled")
        .expect("mock declared a result, not an error");
    assert_eq!(outcome.data, Some(json!({"user": {"id": "1", "name": "Ann"}})));

    // The queue is consumed; the identical request no longer matches.
    let err = link.request(&user_request("1")).unwrap_err();
    assert!(matches!(err, MockLinkError::NoMatch { .. }));
}

#[tokio::test]
async fn different_variables_do_not_match() {
    let link = MockLink::new(vec![
        MockedResponse::new(user_request("1")).with_result(user_response("1", "Ann")),
    ]);

    let err = link.request(&user_request("2")).unwrap_err();
    let MockLinkError::NoMatch { message } = err else {
        panic!("expected NoMatch");
    };
    assert!(message.contains("no more mocked responses for"));
    assert!(message.contains("GetUser"));
}

#[tokio::test]
async fn variables_match_independent_of_key_order() {
    let registered = MockRequest::parse(GET_USER)
        .unwrap()
        .with_variables(json!({ "b": 2, "a": 1 }));
    let link =
        MockLink::new(vec![MockedResponse::new(registered).with_result(user_response("1", "Ann"))]);

    let incoming = MockRequest::parse(GET_USER)
        .unwrap()
        .with_variables(json!({ "a": 1, "b": 2 }));
    assert!(link.request(&incoming).is_ok());
}

#[tokio::test]
async fn absent_and_empty_variables_are_equivalent() {
    let link = MockLink::new(vec![
        MockedResponse::new(MockRequest::parse(GET_FEED).unwrap())
            .with_result(MockResponse::data(json!({"feed": []}))),
    ]);

    let incoming = MockRequest::parse(GET_FEED)
        .unwrap()
        .with_variables(json!({}));
    assert!(link.request(&incoming).is_ok());
}

#[tokio::test]
async fn same_operation_different_variables_share_a_queue() {
    let link = MockLink::new(vec![
        MockedResponse::new(user_request("1")).with_result(user_response("1", "Ann")),
        MockedResponse::new(user_request("2")).with_result(user_response("2", "Bob")),
    ]);

    // Matching is by variables, not registration order.
    let second = link
        .request(&user_request("2"))
        .unwrap()
        .recv()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.data, Some(json!({"user": {"id": "2", "name": "Bob"}})));

    let first = link
        .request(&user_request("1"))
        .unwrap()
        .recv()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.data, Some(json!({"user": {"id": "1", "name": "Ann"}})));
}

#[tokio::test]
async fn duplicate_registrations_are_consumed_oldest_first() {
    let link = MockLink::new(vec![
        MockedResponse::new(user_request("1")).with_result(user_response("1", "Ann")),
        MockedResponse::new(user_request("1")).with_result(user_response("1", "Ann the second")),
    ]);

    let first = link
        .request(&user_request("1"))
        .unwrap()
        .recv()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        first.data,
        Some(json!({"user": {"id": "1", "name": "Ann"}}))
    );

    let second = link
        .request(&user_request("1"))
        .unwrap()
        .recv()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        second.data,
        Some(json!({"user": {"id": "1", "name": "Ann the second"}}))
    );
}

#[tokio::test]
async fn new_data_regenerates_on_every_match() {
    let counter = Arc::new(AtomicU32::new(0));
    let producer_counter = Arc::clone(&counter);
    let link = MockLink::new(vec![MockedResponse::new(
        MockRequest::parse("{ counter }").unwrap(),
    )
    .with_new_data(move || {
        let n = producer_counter.fetch_add(1, Ordering::SeqCst) + 1;
        MockResponse::data(json!({ "counter": n }))
    })]);

    let request = MockRequest::parse("{ counter }").unwrap();
    for expected in 1..=4_u32 {
        let outcome = link
            .request(&request)
            .expect("regenerating mock should keep matching")
            .recv()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.data, Some(json!({ "counter": expected })));
    }
}

#[tokio::test]
async fn result_producer_computes_payload_per_delivery() {
    let calls = Arc::new(AtomicU32::new(0));
    let producer_calls = Arc::clone(&calls);
    let link = MockLink::new(vec![MockedResponse::new(
        MockRequest::parse(GET_FEED).unwrap(),
    )
    .with_result_producer(move || {
        producer_calls.fetch_add(1, Ordering::SeqCst);
        MockResponse::data(json!({"feed": []}))
    })]);

    let replay = link.request(&MockRequest::parse(GET_FEED).unwrap()).unwrap();
    // Not resolved until delivery.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let _ = replay.recv().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn delivery_respects_configured_delay() {
    let link = MockLink::new(vec![MockedResponse::new(user_request("1"))
        .with_result(user_response("1", "Ann"))
        .with_delay(Duration::from_millis(50))]);

    let started = tokio::time::Instant::now();
    let replay = link.request(&user_request("1")).unwrap();
    let outcome = replay.recv().await;
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(outcome.is_some());
}

#[tokio::test(start_paused = true)]
async fn cancellation_before_fire_suppresses_delivery() {
    let link = MockLink::new(vec![MockedResponse::new(user_request("1"))
        .with_result(user_response("1", "Ann"))
        .with_delay(Duration::from_millis(50))]);

    let replay = link.request(&user_request("1")).unwrap();
    replay.cancel();
    tokio::time::advance(Duration::from_millis(100)).await;
    assert!(replay.recv().await.is_none());

    // Queue consumption happened at match time and is not undone.
    assert!(link.request(&user_request("1")).is_err());
}

#[tokio::test(start_paused = true)]
async fn deliveries_of_independent_requests_are_ordered_by_delay_only() {
    let link = MockLink::new(vec![
        MockedResponse::new(user_request("1"))
            .with_result(user_response("1", "Ann"))
            .with_delay(Duration::from_millis(50)),
        MockedResponse::new(user_request("2")).with_result(user_response("2", "Bob")),
    ]);

    let started = tokio::time::Instant::now();
    let slow = link.request(&user_request("1")).unwrap();
    let fast = link.request(&user_request("2")).unwrap();

    // The later-issued zero-delay request completes first.
    let fast_outcome = fast.recv().await;
    assert!(fast_outcome.is_some());
    assert!(started.elapsed() < Duration::from_millis(50));

    let slow_outcome = slow.recv().await;
    assert!(slow_outcome.is_some());
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn declared_error_flows_through_the_channel() {
    let link = MockLink::new(vec![MockedResponse::new(user_request("1"))
        .with_error(NetworkError::new("connection reset by peer"))]);

    let outcome = link
        .request(&user_request("1"))
        .expect("matching succeeds even for error mocks")
        .recv()
        .await
        .unwrap();
    assert_eq!(outcome, Err(NetworkError::new("connection reset by peer")));
}

#[tokio::test]
async fn response_without_result_or_error_is_a_setup_bug() {
    let link = MockLink::new(vec![MockedResponse::new(user_request("1"))]);

    let err = link.request(&user_request("1")).unwrap_err();
    let MockLinkError::MalformedResponse { request_key } = err else {
        panic!("expected MalformedResponse");
    };
    assert!(request_key.contains("GetUser"));
}

#[tokio::test]
async fn unregistered_operation_reports_its_text() {
    let link = MockLink::new(vec![
        MockedResponse::new(user_request("1")).with_result(user_response("1", "Ann")),
    ]);

    let incoming = MockRequest::parse("query Other { other { id } }").unwrap();
    let MockLinkError::NoMatch { message } = link.request(&incoming).unwrap_err() else {
        panic!("expected NoMatch");
    };
    assert!(message.contains("query Other {"));
    // Near-miss candidates show up as diffs.
    assert!(message.contains("possible matching mock:"));
    assert!(message.contains("GetUser"));
}

#[tokio::test]
async fn registration_after_construction_is_matchable() {
    let link = MockLink::new(Vec::new());
    link.register(MockedResponse::new(user_request("1")).with_result(user_response("1", "Ann")));

    assert!(link.request(&user_request("1")).is_ok());
}

#[tokio::test]
async fn typename_injection_can_be_disabled() {
    let request = MockRequest::parse(GET_FEED).unwrap();
    let link = MockLink::with_add_typename(
        vec![MockedResponse::new(request.clone())
            .with_result(MockResponse::data(json!({"feed": []})))],
        false,
    );

    assert!(link.request(&request).is_ok());
}

#[tokio::test]
async fn connection_directive_is_transparent_to_matching() {
    let mocked_request =
        MockRequest::parse("{ feed(first: 10) @connection(key: \"feed\") { id } }").unwrap();
    let link = MockLink::new(vec![
        MockedResponse::new(mocked_request).with_result(MockResponse::data(json!({"feed": []}))),
    ]);

    // Registration stripped the directive, so the already-stripped form
    // of the incoming request lands on the same fingerprint.
    let incoming = MockRequest::parse("{ feed(first: 10) { id } }").unwrap();
    assert!(link.request(&incoming).is_ok());
}
