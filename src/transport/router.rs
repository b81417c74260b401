//! Event routing to prefix-filtered subscribers.
//!
//! Subscribers register a method-name prefix (`"Debugger."`, or `""` for
//! every event) and receive matching events on an unbounded queue, in arrival
//! order. Subscriptions whose stream was dropped are pruned on the next
//! dispatch. Events nobody subscribed to are dropped.

// ============================================================================
// Imports
// ============================================================================

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::Stream;
use tokio::sync::mpsc;

use crate::protocol::Event;

// ============================================================================
// EventRouter
// ============================================================================

/// One registered subscriber.
struct Subscription {
    prefix: String,
    tx: mpsc::UnboundedSender<Event>,
}

/// Fans events out to subscribers by method prefix.
#[derive(Default)]
pub(crate) struct EventRouter {
    subscriptions: Vec<Subscription>,
    closed: bool,
}

impl EventRouter {
    /// Creates a router with no subscribers.
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for methods starting with `prefix`.
    ///
    /// After [`close`](Self::close) the returned stream ends immediately.
    pub(crate) fn subscribe(&mut self, prefix: impl Into<String>) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        if !self.closed {
            self.subscriptions.push(Subscription {
                prefix: prefix.into(),
                tx,
            });
        }
        EventStream { rx }
    }

    /// Delivers `event` to every matching subscriber.
    ///
    /// Returns the number of subscribers that received it.
    pub(crate) fn dispatch(&mut self, event: &Event) -> usize {
        let mut delivered = 0;
        self.subscriptions.retain(|sub| {
            if sub.tx.is_closed() {
                return false;
            }
            if !event.method.starts_with(&sub.prefix) {
                return true;
            }
            let sent = sub.tx.send(event.clone()).is_ok();
            delivered += usize::from(sent);
            sent
        });
        delivered
    }

    /// Drops every subscription; their streams end after draining.
    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.subscriptions.clear();
    }

    /// Returns the number of live subscriptions.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len()
    }
}

// ============================================================================
// EventStream
// ============================================================================

/// Stream of events matching one subscription.
///
/// Unbounded: events the consumer has not read yet stay queued. Ends when the
/// connection closes.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Receives the next event, or `None` once the connection closed.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tokio_test::{assert_pending, assert_ready, task};

    fn event(method: &str) -> Event {
        Event::new(method, json!({}))
    }

    #[test]
    fn test_prefix_routing() {
        let mut router = EventRouter::new();
        let mut debugger = router.subscribe("Debugger.");
        let mut console = router.subscribe("Console.");
        let mut all = router.subscribe("");

        assert_eq!(router.dispatch(&event("Debugger.paused")), 2);
        assert_eq!(router.dispatch(&event("Console.messagesCleared")), 2);

        assert_eq!(debugger.try_recv().expect("event").method, "Debugger.paused");
        assert!(debugger.try_recv().is_none());
        assert_eq!(console.try_recv().expect("event").method, "Console.messagesCleared");
        assert_eq!(all.try_recv().expect("event").method, "Debugger.paused");
        assert_eq!(all.try_recv().expect("event").method, "Console.messagesCleared");
    }

    #[test]
    fn test_unsubscribed_method_dropped() {
        let mut router = EventRouter::new();
        let mut console = router.subscribe("Console.");
        assert_eq!(router.dispatch(&event("Network.loadingFinished")), 0);
        assert!(console.try_recv().is_none());
    }

    #[test]
    fn test_dropped_stream_pruned() {
        let mut router = EventRouter::new();
        let stream = router.subscribe("Debugger.");
        let _kept = router.subscribe("Debugger.");
        drop(stream);

        assert_eq!(router.dispatch(&event("Debugger.resumed")), 1);
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_dispatch_wakes_waiting_subscriber() {
        let mut router = EventRouter::new();
        let mut stream = router.subscribe("Runtime.");

        let mut recv = task::spawn(stream.recv());
        assert_pending!(recv.poll());

        router.dispatch(&event("Runtime.executionContextsCleared"));
        assert!(recv.is_woken());
        let received = assert_ready!(recv.poll()).expect("event");
        assert_eq!(received.method, "Runtime.executionContextsCleared");
    }

    #[tokio::test]
    async fn test_close_ends_streams() {
        let mut router = EventRouter::new();
        let mut stream = router.subscribe("");
        router.dispatch(&event("DOM.documentUpdated"));
        router.close();

        assert_eq!(stream.recv().await.expect("queued").method, "DOM.documentUpdated");
        assert!(stream.recv().await.is_none());

        let mut late = router.subscribe("");
        assert!(late.recv().await.is_none());
    }
}
