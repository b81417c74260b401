//! Builder pattern for client configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use rdbg::Client;
//!
//! let builder = Client::builder()
//!     .port(9229)
//!     .command_timeout(Duration::from_secs(5));
//!
//! let targets = builder.list_targets().await?;
//! let client = builder.attach(&targets[0]).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{debug, info};

use crate::discovery::{self, DEFAULT_HOST, DEFAULT_PORT, TargetInfo};
use crate::error::{Error, Result};
use crate::transport::Connection;

use super::core::Client;
use super::options::ClientOptions;

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`].
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// Connection options.
    options: ClientOptions,
    /// Discovery host.
    host: String,
    /// Discovery port.
    port: u16,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            options: ClientOptions::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all connection options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the default request timeout.
    #[inline]
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.options.command_timeout = timeout;
        self
    }

    /// Sets the pending request limit.
    #[inline]
    #[must_use]
    pub fn max_pending_requests(mut self, max: usize) -> Self {
        self.options.max_pending_requests = max;
        self
    }

    /// Sets the discovery host.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the discovery port.
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the configured options.
    #[inline]
    #[must_use]
    pub fn client_options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists the targets at the configured host and port.
    ///
    /// # Errors
    ///
    /// See [`discovery::list_targets`].
    pub async fn list_targets(&self) -> Result<Vec<TargetInfo>> {
        discovery::list_targets_with_timeout(&self.host, self.port, self.options.command_timeout)
            .await
    }

    /// Connects to a WebSocket debugger URL.
    ///
    /// # Errors
    ///
    /// See [`Connection::connect`].
    pub async fn connect(&self, url: &str) -> Result<Client> {
        let connection = Connection::connect(url, self.options.clone()).await?;
        Ok(Client::from_connection(connection))
    }

    /// Connects to a discovered target.
    ///
    /// # Errors
    ///
    /// [`Error::TargetNotAttachable`] if the target lists no WebSocket URL,
    /// otherwise as [`connect`](Self::connect).
    pub async fn attach(&self, target: &TargetInfo) -> Result<Client> {
        let url = target.debugger_url()?;
        info!(target_id = %target.id, title = %target.title, "Attaching to target");
        self.connect(url).await
    }

    /// Connects to the first attachable page target, falling back to any
    /// attachable target.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] if no target is attachable.
    pub async fn attach_first(&self) -> Result<Client> {
        let targets = self.list_targets().await?;
        debug!(count = targets.len(), "Choosing target");

        let target = targets
            .iter()
            .filter(|t| t.is_attachable())
            .find(|t| t.is_page())
            .or_else(|| targets.iter().find(|t| t.is_attachable()))
            .ok_or_else(|| {
                Error::connection(format!(
                    "No attachable target at {}:{}",
                    self.host, self.port
                ))
            })?;

        self.attach(target).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let builder = ClientBuilder::new();
        assert_eq!(builder.host, "localhost");
        assert_eq!(builder.port, 9222);
        assert_eq!(builder.client_options(), &ClientOptions::default());
    }

    #[test]
    fn test_builder_chain() {
        let builder = Client::builder()
            .host("127.0.0.1")
            .port(9229)
            .command_timeout(Duration::from_secs(2))
            .max_pending_requests(10);

        assert_eq!(builder.host, "127.0.0.1");
        assert_eq!(builder.port, 9229);
        assert_eq!(builder.client_options().command_timeout, Duration::from_secs(2));
        assert_eq!(builder.client_options().max_pending_requests, 10);
    }

    #[tokio::test]
    async fn test_attach_unattachable_target() {
        let target: TargetInfo = serde_json::from_value(serde_json::json!({
            "id": "busy",
            "type": "page"
        }))
        .expect("target");

        let err = ClientBuilder::new().attach(&target).await.expect_err("no url");
        assert!(matches!(err, Error::TargetNotAttachable { .. }));
    }

    #[tokio::test]
    async fn test_connect_validates_options() {
        let err = ClientBuilder::new()
            .max_pending_requests(0)
            .connect("ws://127.0.0.1:1/devtools/page/x")
            .await
            .expect_err("invalid options");
        assert!(matches!(err, Error::Config { .. }));
    }
}
