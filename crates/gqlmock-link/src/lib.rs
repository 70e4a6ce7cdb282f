//! gqlmock link - deterministic test double for a GraphQL request layer.
//!
//! This crate provides:
//! - [`MockLink`] - intercepts requests and replays scripted outcomes.
//! - [`MockedResponse`] - one declared expectation: request, result or
//!   simulated error, delay, optional regeneration.
//! - [`MockReplay`] - the cancellable, timer-based delivery channel.
//!
//! Requests are fingerprinted by their canonical query text (variables
//! excluded), bucketed into per-fingerprint queues, and disambiguated by
//! structural variable equality. Consumed responses leave their queue
//! unless they regenerate via `new_data`.
//!
//! # Example
//!
//! ```rust,ignore
//! use gqlmock_link::{MockLink, MockRequest, MockResponse, MockedResponse};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn replays_scripted_response() {
//!     let request = MockRequest::parse("query GetUser($id: ID!) { user(id: $id) { id name } }")
//!         .unwrap()
//!         .with_variables(json!({"id": "1"}));
//!     let link = MockLink::new(vec![
//!         MockedResponse::new(request.clone())
//!             .with_result(MockResponse::data(json!({"user": {"id": "1", "name": "Ann"}}))),
//!     ]);
//!
//!     let outcome = link.request(&request).unwrap().recv().await;
//!     assert!(outcome.unwrap().is_ok());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod diff;
mod error;
mod link;
mod mocked;
mod operation;
mod registry;
mod replay;

pub use error::{
    GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, MockLinkError, NetworkError,
};
pub use link::MockLink;
pub use mocked::{MockedResponse, ResponseFn, ResponseSource};
pub use operation::{MockRequest, MockResponse};
pub use replay::MockReplay;

// Re-export document types for convenience.
pub use gqlmock_document::{Document, OperationKind, ParseError};
