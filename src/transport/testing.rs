//! In-process remote end for connection tests.
//!
//! Pairs a [`Connection`] with a [`MockRemote`] over an in-memory duplex
//! pipe, so tests drive both sides of the WebSocket without a browser.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::io::{DuplexStream, duplex};
use tokio::sync::broadcast;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::Role;
use tracing_subscriber::EnvFilter;

use crate::client::ClientOptions;

use super::{Connection, ConnectionEvent};

// ============================================================================
// Constants
// ============================================================================

/// Upper bound for any single wait in tests.
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Buffer of the in-memory pipe.
const PIPE_CAPACITY: usize = 64 * 1024;

// ============================================================================
// Setup
// ============================================================================

/// Installs a test-writer tracing subscriber honouring `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a connected pair with default options.
pub(crate) async fn connect_pair() -> (Connection, MockRemote) {
    connect_pair_with(ClientOptions::default()).await
}

/// Creates a connected pair with `options`.
pub(crate) async fn connect_pair_with(options: ClientOptions) -> (Connection, MockRemote) {
    init_tracing();

    let (client_io, remote_io) = duplex(PIPE_CAPACITY);
    let client_ws = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
    let remote_ws = WebSocketStream::from_raw_socket(remote_io, Role::Server, None).await;

    (Connection::new(client_ws, options), MockRemote { ws: remote_ws })
}

/// Waits for the first connection event matching `predicate`.
pub(crate) async fn next_event(
    events: &mut broadcast::Receiver<ConnectionEvent>,
    predicate: impl Fn(&ConnectionEvent) -> bool,
) -> ConnectionEvent {
    timeout(WAIT_TIMEOUT, async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("matching connection event")
}

// ============================================================================
// MockRemote
// ============================================================================

/// Server side of a test connection.
pub(crate) struct MockRemote {
    ws: WebSocketStream<DuplexStream>,
}

impl MockRemote {
    /// Receives the next request envelope as JSON.
    pub(crate) async fn recv_request(&mut self) -> Value {
        loop {
            let message = timeout(WAIT_TIMEOUT, self.ws.next())
                .await
                .expect("request within timeout")
                .expect("socket open")
                .expect("websocket frame");

            if let Message::Text(text) = message {
                return serde_json::from_str(&text).expect("request json");
            }
        }
    }

    /// Receives the next request and answers it with `result`.
    ///
    /// Returns the request.
    pub(crate) async fn answer(&mut self, result: Value) -> Value {
        let request = self.recv_request().await;
        let id = request["id"].as_u64().expect("numeric id");
        self.respond(id, result).await;
        request
    }

    /// Receives the next request and rejects it with a protocol error.
    pub(crate) async fn answer_error(&mut self, code: i64, message: &str) -> Value {
        let request = self.recv_request().await;
        let id = request["id"].as_u64().expect("numeric id");
        self.reject(id, code, message).await;
        request
    }

    /// Sends a raw text frame.
    pub(crate) async fn send_text(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("send frame");
    }

    /// Sends a JSON text frame.
    pub(crate) async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    /// Sends a success response.
    pub(crate) async fn respond(&mut self, id: u64, result: Value) {
        self.send_json(json!({ "id": id, "result": result })).await;
    }

    /// Sends an error response.
    pub(crate) async fn reject(&mut self, id: u64, code: i64, message: &str) {
        self.send_json(json!({
            "id": id,
            "error": { "code": code, "message": message }
        }))
        .await;
    }

    /// Sends an event.
    pub(crate) async fn emit(&mut self, method: &str, params: Value) {
        self.send_json(json!({ "method": method, "params": params }))
            .await;
    }

    /// Closes the socket from the remote side.
    pub(crate) async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
