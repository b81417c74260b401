//! WebSocket connection and event loop.
//!
//! This module handles the WebSocket connection to the remote end,
//! including request/response correlation and event routing.
//!
//! # Event Loop
//!
//! The connection spawns one tokio task that owns both halves of the socket:
//!
//! - Outgoing requests from the Rust API (single write path)
//! - Incoming messages from the remote end, dispatched strictly in arrival
//!   order (single dispatch point)
//! - Request/response correlation by integer id
//! - Script registry updates and event fan-out
//!
//! Callers register their continuation in the correlation table *before*
//! the request is queued for writing, so a reply can never arrive ahead of
//! its continuation.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use serde_json::{Value, to_string};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::client::ClientOptions;
use crate::error::{Error, Result};
use crate::identifiers::{RequestId, RequestIdGenerator};
use crate::protocol::request::command_parts;
use crate::protocol::{Command, Event, Incoming, Request, Response, ScriptMetadata};

use super::correlation::CorrelationTable;
use super::registry::ScriptRegistry;
use super::router::{EventRouter, EventStream};

// ============================================================================
// Constants
// ============================================================================

/// Event that adds an entry to the script registry.
const SCRIPT_PARSED: &str = "Debugger.scriptParsed";

/// Event that empties the script registry.
const GLOBAL_OBJECT_CLEARED: &str = "Debugger.globalObjectCleared";

// ============================================================================
// ConnectionEvent
// ============================================================================

/// Connection-level notifications, for observability and diagnostics.
///
/// Delivered through [`Connection::events`]. Not needed for normal request
/// handling: callers get their outcome from the request itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A request envelope was written to the transport.
    RequestSent {
        /// Request id.
        id: RequestId,
        /// Request method.
        method: String,
    },

    /// A response resolved its pending request.
    ResponseReceived {
        /// Request id.
        id: RequestId,
        /// Method of the originating request.
        method: String,
    },

    /// A response matched no pending request and was dropped.
    UnknownResponse {
        /// The unmatched id.
        id: RequestId,
    },

    /// Inbound text failed to parse and was dropped.
    MalformedMessage {
        /// Parse failure.
        reason: String,
    },

    /// The transport reported an error; the connection is closing.
    TransportError {
        /// Transport failure.
        message: String,
    },

    /// The connection closed. Emitted once.
    Closed,
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Write a registered request.
    Send(Request),
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to a remote debugging endpoint.
///
/// Handles request/response correlation and event routing.
/// The connection spawns an internal event loop task.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and cheap to clone; clones share one
/// socket, one id counter and one correlation table. Requests never block.
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Correlation table (shared with event loop).
    correlation: Arc<Mutex<CorrelationTable>>,
    /// Event subscriptions (shared with event loop).
    router: Arc<Mutex<EventRouter>>,
    /// Parsed scripts (written by event loop only).
    scripts: Arc<RwLock<ScriptRegistry>>,
    /// Connection-level notifications.
    events_tx: broadcast::Sender<ConnectionEvent>,
    /// Flips to `false` when the event loop terminates.
    open_rx: watch::Receiver<bool>,
    /// Per-connection request id source.
    ids: Arc<RequestIdGenerator>,
    /// Options the connection was created with.
    options: Arc<ClientOptions>,
}

impl Clone for Connection {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            correlation: Arc::clone(&self.correlation),
            router: Arc::clone(&self.router),
            scripts: Arc::clone(&self.scripts),
            events_tx: self.events_tx.clone(),
            open_rx: self.open_rx.clone(),
            ids: Arc::clone(&self.ids),
            options: Arc::clone(&self.options),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("open", &self.is_open())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Creates a new connection from an established WebSocket stream.
    ///
    /// Spawns the event loop task internally; must be called within a tokio
    /// runtime.
    pub fn new<S>(ws_stream: WebSocketStream<S>, options: ClientOptions) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(options.event_capacity.max(1));
        let (open_tx, open_rx) = watch::channel(true);

        let dispatcher = Dispatcher {
            correlation: Arc::new(Mutex::new(CorrelationTable::new())),
            router: Arc::new(Mutex::new(EventRouter::new())),
            scripts: Arc::new(RwLock::new(ScriptRegistry::new())),
            events_tx: events_tx.clone(),
        };

        let connection = Self {
            command_tx,
            correlation: Arc::clone(&dispatcher.correlation),
            router: Arc::clone(&dispatcher.router),
            scripts: Arc::clone(&dispatcher.scripts),
            events_tx,
            open_rx,
            ids: Arc::new(RequestIdGenerator::new()),
            options: Arc::new(options),
        };

        tokio::spawn(Self::run_event_loop(ws_stream, command_rx, dispatcher, open_tx));

        connection
    }

    /// Opens a WebSocket to `url` and creates a connection over it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `url` does not parse
    /// - [`Error::Config`] if the scheme is not `ws`/`wss` or options are invalid
    /// - [`Error::Connection`] if the WebSocket handshake fails
    pub async fn connect(url: &str, options: ClientOptions) -> Result<Self> {
        options.validate()?;

        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::config(format!(
                "Unsupported debugger URL scheme '{}', expected ws or wss",
                url.scheme()
            )));
        }

        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| Error::connection(format!("WebSocket connect to {url} failed: {e}")))?;

        info!(%url, "WebSocket connection established");

        Ok(Self::new(ws_stream, options))
    }

    /// Issues a request without waiting for its response.
    ///
    /// The returned handle carries the assigned id and resolves exactly once.
    /// `params` of `null` is sent as `{}`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if the connection is closed
    /// - [`Error::TooManyPendingRequests`] if the pending limit is reached
    pub fn request(&self, method: impl Into<String>, params: Value) -> Result<PendingResponse> {
        let method = method.into();
        let (response_tx, response_rx) = oneshot::channel();

        // Register before queueing the write
        let id = {
            let mut correlation = self.correlation.lock();
            if correlation.is_closed() {
                return Err(Error::NotConnected);
            }

            let max = self.options.max_pending_requests;
            if correlation.len() >= max {
                warn!(pending = correlation.len(), max, "Too many pending requests");
                return Err(Error::TooManyPendingRequests {
                    pending: correlation.len(),
                    max,
                });
            }

            let id = self.ids.next_id();
            correlation.register(id, method.clone(), response_tx)?;
            id
        };

        let request = Request::new(id, method.clone(), params);
        if self.command_tx.send(ConnectionCommand::Send(request)).is_err() {
            self.correlation.lock().take(id);
            return Err(Error::NotConnected);
        }

        trace!(%id, %method, "Request queued");

        Ok(PendingResponse {
            id,
            method,
            response_rx,
            correlation: Arc::clone(&self.correlation),
            settled: false,
        })
    }

    /// Sends a request and waits for response with default timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if the connection is closed
    /// - [`Error::ConnectionClosed`] if it closes before the response
    /// - [`Error::Protocol`] if the remote end rejects the request
    /// - [`Error::RequestTimeout`] if no response arrives in time
    pub async fn send(&self, method: impl Into<String>, params: Value) -> Result<Value> {
        self.send_with_timeout(method, params, self.options.command_timeout)
            .await
    }

    /// Sends a request and waits for response with custom timeout.
    ///
    /// On timeout the pending entry is removed; a late response is dropped
    /// as unknown.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_with_timeout(
        &self,
        method: impl Into<String>,
        params: Value,
        request_timeout: Duration,
    ) -> Result<Value> {
        self.request(method, params)?.timeout(request_timeout).await
    }

    /// Sends a typed command and waits for its result.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn execute(&self, command: Command) -> Result<Value> {
        let (method, params) = command_parts(&command)?;
        self.send(method, params).await
    }

    /// Subscribes to events whose method starts with `prefix`.
    ///
    /// `""` subscribes to every event.
    pub fn subscribe(&self, prefix: impl Into<String>) -> EventStream {
        self.router.lock().subscribe(prefix)
    }

    /// Subscribes to every event of one domain (`"Debugger"`, `"CSS"`, ...).
    pub fn subscribe_domain(&self, domain: &str) -> EventStream {
        self.subscribe(format!("{domain}."))
    }

    /// Subscribes to connection-level notifications.
    pub fn events(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.events_tx.subscribe()
    }

    /// Returns a read view of the parsed-script registry.
    ///
    /// Hold the guard briefly: the event loop needs write access to apply
    /// parse and clear events.
    pub fn scripts(&self) -> RwLockReadGuard<'_, ScriptRegistry> {
        self.scripts.read()
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Returns `true` while requests can be issued.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.correlation.lock().is_closed()
    }

    /// Returns the options the connection was created with.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Waits until the connection has closed and every pending request
    /// has been failed.
    pub async fn closed(&self) {
        let mut open_rx = self.open_rx.clone();
        let _ = open_rx.wait_for(|open| !*open).await;
    }

    /// Closes the connection.
    ///
    /// Pending requests fail with [`Error::ConnectionClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        dispatcher: Dispatcher,
        open_tx: watch::Sender<bool>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming messages from the remote end
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            dispatcher.handle_incoming_message(&text);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            dispatcher.emit(ConnectionEvent::TransportError {
                                message: e.to_string(),
                            });
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from Rust API
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send(request)) => {
                            if Self::handle_send_command(request, &mut ws_write, &dispatcher)
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }

        dispatcher.fail_pending_requests();
        let _ = open_tx.send(false);

        debug!("Event loop terminated");
    }

    /// Writes one request to the socket.
    ///
    /// A write failure fails the request and ends the event loop.
    async fn handle_send_command<S>(
        request: Request,
        ws_write: &mut SplitSink<WebSocketStream<S>, Message>,
        dispatcher: &Dispatcher,
    ) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let request_id = request.id;

        let json = match to_string(&request) {
            Ok(j) => j,
            Err(e) => {
                dispatcher.resolve(request_id, Err(Error::Json(e)));
                return Ok(());
            }
        };

        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            error!(id = %request_id, error = %e, "Failed to write request");
            dispatcher.resolve(request_id, Err(Error::connection(e.to_string())));
            dispatcher.emit(ConnectionEvent::TransportError {
                message: e.to_string(),
            });
            return Err(Error::WebSocket(e));
        }

        trace!(id = %request_id, method = %request.method, "Request sent");
        dispatcher.emit(ConnectionEvent::RequestSent {
            id: request_id,
            method: request.method,
        });

        Ok(())
    }
}

// ============================================================================
// PendingResponse
// ============================================================================

/// Handle to an outstanding request.
///
/// Resolves exactly once: with the response, a protocol error, a timeout
/// imposed by the caller, or [`Error::ConnectionClosed`]. Dropping an
/// unresolved handle, including cancelling a future awaiting it, withdraws
/// the request from the correlation table.
#[derive(Debug)]
pub struct PendingResponse {
    id: RequestId,
    method: String,
    response_rx: oneshot::Receiver<Result<Value>>,
    correlation: Arc<Mutex<CorrelationTable>>,
    settled: bool,
}

impl PendingResponse {
    /// Returns the id assigned to the request.
    #[inline]
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the method of the request.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Waits for the outcome without a timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if the remote end rejects the request
    /// - [`Error::ConnectionClosed`] if the connection closes first
    pub async fn wait(mut self) -> Result<Value> {
        let outcome = (&mut self.response_rx).await;
        self.settled = true;
        outcome.unwrap_or(Err(Error::ConnectionClosed))
    }

    /// Waits for the outcome, giving up after `request_timeout`.
    ///
    /// # Errors
    ///
    /// [`Error::RequestTimeout`] on expiry, otherwise as [`wait`](Self::wait).
    pub async fn timeout(mut self, request_timeout: Duration) -> Result<Value> {
        let outcome = timeout(request_timeout, &mut self.response_rx).await;
        self.settled = true;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                // Timeout - clean up correlation entry
                self.correlation.lock().take(self.id);
                debug!(id = %self.id, method = %self.method, "Request timed out");

                Err(Error::request_timeout(
                    self.id,
                    u64::try_from(request_timeout.as_millis()).unwrap_or(u64::MAX),
                ))
            }
        }
    }
}

impl Drop for PendingResponse {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        if self.correlation.lock().take(self.id).is_some() {
            debug!(id = %self.id, method = %self.method, "Request abandoned");
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Inbound side of the event loop: classifies and routes every message.
struct Dispatcher {
    correlation: Arc<Mutex<CorrelationTable>>,
    router: Arc<Mutex<EventRouter>>,
    scripts: Arc<RwLock<ScriptRegistry>>,
    events_tx: broadcast::Sender<ConnectionEvent>,
}

impl Dispatcher {
    /// Handles an incoming text message from the remote end.
    fn handle_incoming_message(&self, text: &str) {
        match Incoming::parse(text) {
            Ok(Incoming::Response(response)) => self.handle_response(response),
            Ok(Incoming::Event(event)) => self.handle_event(event),
            Err(e) => {
                warn!(error = %e, len = text.len(), "Dropping malformed message");
                self.emit(ConnectionEvent::MalformedMessage {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Resolves the continuation registered under the response's id.
    fn handle_response(&self, response: Response) {
        let id = response.id;
        let pending = self.correlation.lock().take(id);

        let Some(pending) = pending else {
            warn!(%id, "Response for unknown request");
            self.emit(ConnectionEvent::UnknownResponse { id });
            return;
        };

        if response.is_empty() {
            debug!(%id, method = pending.method(), "Response without result, resolving empty");
        }

        let method = pending.method().to_string();
        if !pending.resolve(response.into_result()) {
            debug!(%id, %method, "Caller stopped waiting for response");
        }

        trace!(%id, %method, "Response received");
        self.emit(ConnectionEvent::ResponseReceived { id, method });
    }

    /// Applies registry side effects, then fans the event out.
    fn handle_event(&self, event: Event) {
        self.update_scripts(&event);

        let delivered = self.router.lock().dispatch(&event);
        trace!(method = %event.method, delivered, "Event dispatched");
    }

    /// Mirrors parse and clear events into the script registry.
    fn update_scripts(&self, event: &Event) {
        match event.method.as_str() {
            SCRIPT_PARSED => match serde_json::from_value::<ScriptMetadata>(event.params.clone()) {
                Ok(meta) => {
                    trace!(script_id = %meta.script_id, url = %meta.url, "Script parsed");
                    self.scripts.write().on_parsed(meta);
                }
                Err(e) => warn!(error = %e, "Undecodable scriptParsed params"),
            },

            GLOBAL_OBJECT_CLEARED => {
                debug!("Global object cleared, dropping parsed scripts");
                self.scripts.write().on_cleared();
            }

            _ => {}
        }
    }

    /// Resolves one pending request, if still registered.
    fn resolve(&self, id: RequestId, outcome: Result<Value>) {
        let pending = self.correlation.lock().take(id);
        if let Some(pending) = pending {
            pending.resolve(outcome);
        }
    }

    /// Fails all pending requests with ConnectionClosed error.
    fn fail_pending_requests(&self) {
        let pending = self.correlation.lock().close();
        let count = pending.len();

        for (_, pending) in pending {
            pending.resolve(Err(Error::ConnectionClosed));
        }

        self.scripts.write().on_cleared();
        self.router.lock().close();

        if count > 0 {
            debug!(count, "Failed pending requests on close");
        }

        self.emit(ConnectionEvent::Closed);
    }

    /// Publishes a connection event; nobody listening is fine.
    fn emit(&self, event: ConnectionEvent) {
        let _ = self.events_tx.send(event);
    }
}

// ============================================================================
// Tests
// ============================================================================
