//! Debugging client and its domain handles.
//!
//! # Example
//!
//! ```ignore
//! use rdbg::{Client, EvaluateOptions};
//!
//! let client = Client::connect("ws://localhost:9222/devtools/page/ABC").await?;
//!
//! client.runtime().enable().await?;
//! let result = client
//!     .runtime()
//!     .evaluate("navigator.userAgent", EvaluateOptions::new().with_return_by_value())
//!     .await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use crate::discovery::{self, TargetInfo};
use crate::domains::{Console, Css, Debugger, Dom, Runtime};
use crate::error::Result;
use crate::transport::{Connection, ConnectionEvent};

use super::builder::ClientBuilder;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the client.
struct ClientInner {
    /// The single connection every domain sends through.
    connection: Connection,

    console: OnceLock<Console>,
    debugger: OnceLock<Debugger>,
    runtime: OnceLock<Runtime>,
    dom: OnceLock<Dom>,
    css: OnceLock<Css>,
}

// ============================================================================
// Client
// ============================================================================

/// Client of one debugging target.
///
/// Cheap to clone; clones share the connection and the domain handles.
/// Domain handles are created on first access and live as long as the
/// client.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.inner.connection)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Client - Construction
// ============================================================================

impl Client {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Connects to a WebSocket debugger URL with default options.
    ///
    /// # Errors
    ///
    /// See [`Connection::connect`].
    pub async fn connect(url: &str) -> Result<Self> {
        ClientBuilder::new().connect(url).await
    }

    /// Wraps an existing connection.
    #[must_use]
    pub fn from_connection(connection: Connection) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                connection,
                console: OnceLock::new(),
                debugger: OnceLock::new(),
                runtime: OnceLock::new(),
                dom: OnceLock::new(),
                css: OnceLock::new(),
            }),
        }
    }

    /// Lists the targets of the remote end at `host:port`.
    ///
    /// # Errors
    ///
    /// See [`discovery::list_targets`].
    pub async fn list_targets(host: &str, port: u16) -> Result<Vec<TargetInfo>> {
        discovery::list_targets(host, port).await
    }
}

// ============================================================================
// Client - Domains
// ============================================================================

impl Client {
    /// Returns the Console domain.
    pub fn console(&self) -> &Console {
        self.inner
            .console
            .get_or_init(|| Console::new(self.inner.connection.clone()))
    }

    /// Returns the Debugger domain.
    pub fn debugger(&self) -> &Debugger {
        self.inner
            .debugger
            .get_or_init(|| Debugger::new(self.inner.connection.clone()))
    }

    /// Returns the Runtime domain.
    pub fn runtime(&self) -> &Runtime {
        self.inner
            .runtime
            .get_or_init(|| Runtime::new(self.inner.connection.clone()))
    }

    /// Returns the DOM domain.
    pub fn dom(&self) -> &Dom {
        self.inner
            .dom
            .get_or_init(|| Dom::new(self.inner.connection.clone()))
    }

    /// Returns the CSS domain.
    ///
    /// Shares its DOM dependency with [`dom`](Self::dom).
    pub fn css(&self) -> &Css {
        self.inner
            .css
            .get_or_init(|| Css::new(self.inner.connection.clone(), self.dom().clone()))
    }
}

// ============================================================================
// Client - Connection
// ============================================================================

impl Client {
    /// Returns the underlying connection, for raw requests and events.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    /// Sends a raw request and waits for its result.
    ///
    /// # Errors
    ///
    /// See [`Connection::send`].
    pub async fn send(&self, method: impl Into<String>, params: Value) -> Result<Value> {
        self.inner.connection.send(method, params).await
    }

    /// Subscribes to connection-level notifications.
    pub fn connection_events(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.inner.connection.events()
    }

    /// Returns `true` while the connection is open.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.connection.is_open()
    }

    /// Closes the connection and waits until every pending request failed.
    pub async fn close(&self) {
        debug!("Closing client");
        self.inner.connection.shutdown();
        self.inner.connection.closed().await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::error::Error;
    use crate::transport::testing::{connect_pair, next_event};

    #[tokio::test]
    async fn test_domain_handles_memoized() {
        let (connection, _remote) = connect_pair().await;
        let client = Client::from_connection(connection);

        assert!(std::ptr::eq(client.console(), client.console()));
        assert!(std::ptr::eq(client.debugger(), client.debugger()));
        assert!(std::ptr::eq(client.runtime(), client.runtime()));
        assert!(std::ptr::eq(client.css(), client.clone().css()));
    }

    #[tokio::test]
    async fn test_css_sees_dom_state() {
        let (connection, mut remote) = connect_pair().await;
        let client = Client::from_connection(connection);

        let (result, _) = tokio::join!(client.dom().enable(), remote.answer(json!({})));
        result.expect("dom enable");

        // DOM already enabled: only CSS.enable goes out
        let (result, request) = tokio::join!(client.css().enable(), remote.answer(json!({})));
        result.expect("css enable");
        assert_eq!(request["method"], "CSS.enable");
    }

    #[tokio::test]
    async fn test_domains_share_one_id_sequence() {
        let (connection, mut remote) = connect_pair().await;
        let client = Client::from_connection(connection);

        let (result, first) = tokio::join!(client.console().enable(), remote.answer(json!({})));
        result.expect("console");
        let (result, second) = tokio::join!(client.debugger().enable(), remote.answer(json!({})));
        result.expect("debugger");
        let (result, third) = tokio::join!(
            client.send("Network.enable", Value::Null),
            remote.answer(json!({}))
        );
        result.expect("raw");

        assert_eq!(first["id"], 0);
        assert_eq!(second["id"], 1);
        assert_eq!(third["id"], 2);
    }

    #[tokio::test]
    async fn test_close_fails_pending_and_rejects_new() {
        let (connection, mut remote) = connect_pair().await;
        let client = Client::from_connection(connection);
        let mut events = client.connection_events();

        let pending = client
            .connection()
            .request("Debugger.pause", Value::Null)
            .expect("request");
        remote.recv_request().await;

        client.close().await;

        assert!(!client.is_open());
        assert!(matches!(pending.wait().await, Err(Error::ConnectionClosed)));
        assert!(matches!(
            client.runtime().enable().await,
            Err(Error::NotConnected)
        ));
        assert_eq!(
            next_event(&mut events, |e| matches!(e, ConnectionEvent::Closed)).await,
            ConnectionEvent::Closed
        );
    }
}
