//! Cancellable timed replay of a matched outcome.
//!
//! Each successful match schedules exactly one deferred delivery. The
//! channel delivers at most one value: either the mocked response
//! (completion) or the declared [`NetworkError`]. Cancelling before the
//! timer fires suppresses delivery entirely; queue mutation already
//! happened at match time and is never undone.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::NetworkError;
use crate::mocked::ResponseSource;
use crate::operation::MockResponse;

/// What the replay task delivers once the delay elapses.
pub(crate) enum ReplayPayload {
    /// Resolve the result source at delivery time.
    Result(ResponseSource),
    /// Terminate with the declared transport error.
    Error(NetworkError),
}

/// A scheduled, cancellable replay.
///
/// Await the outcome with [`recv`](Self::recv). Dropping the handle
/// without receiving does not cancel the timer; call
/// [`cancel`](Self::cancel) for that.
#[derive(Debug)]
pub struct MockReplay {
    rx: oneshot::Receiver<Result<MockResponse, NetworkError>>,
    task: JoinHandle<()>,
}

impl MockReplay {
    /// Spawn the delivery timer. Requires a running tokio runtime.
    pub(crate) fn schedule(delay: Duration, payload: ReplayPayload) -> Self {
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let outcome = match payload {
                ReplayPayload::Result(source) => Ok(source.resolve()),
                ReplayPayload::Error(error) => Err(error),
            };
            let _ = tx.send(outcome);
        });
        Self { rx, task }
    }

    /// Cancel the pending delivery. After cancellation nothing reaches
    /// the receiver; [`recv`](Self::recv) yields `None`.
    pub fn cancel(&self) {
        debug!("cancelling pending mock replay");
        self.task.abort();
    }

    /// Await the replayed outcome.
    ///
    /// `Some(Ok(_))` is the mocked response, `Some(Err(_))` the declared
    /// transport error, `None` means the replay was cancelled before
    /// delivery.
    pub async fn recv(self) -> Option<Result<MockResponse, NetworkError>> {
        self.rx.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn delivers_after_configured_delay() {
        let payload = ReplayPayload::Result(ResponseSource::Value(MockResponse::data(
            json!({"ok": true}),
        )));
        let started = tokio::time::Instant::now();
        let replay = MockReplay::schedule(Duration::from_millis(50), payload);
        let outcome = replay.recv().await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(outcome.data, Some(json!({"ok": true})));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_fire_delivers_nothing() {
        let payload = ReplayPayload::Result(ResponseSource::Value(MockResponse::default()));
        let replay = MockReplay::schedule(Duration::from_millis(50), payload);
        replay.cancel();
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(replay.recv().await.is_none());
    }

    #[tokio::test]
    async fn error_payload_terminates_in_error_state() {
        let payload = ReplayPayload::Error(NetworkError::new("connection refused"));
        let replay = MockReplay::schedule(Duration::ZERO, payload);
        let outcome = replay.recv().await.unwrap();
        assert_eq!(outcome, Err(NetworkError::new("connection refused")));
    }

    #[tokio::test]
    async fn producer_result_resolves_at_delivery() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicU32::new(0));
        let counted = Arc::clone(&calls);
        let payload = ReplayPayload::Result(ResponseSource::Producer(Arc::new(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            MockResponse::data(json!({"n": 1}))
        })));
        let replay = MockReplay::schedule(Duration::ZERO, payload);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let _ = replay.recv().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
