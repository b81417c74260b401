//! Debug target discovery over the HTTP endpoint.
//!
//! A remote end started with remote debugging enabled lists its targets at
//! `http://host:port/json/list`. Each attachable target carries the
//! WebSocket URL a [`Client`](crate::Client) connects to.
//!
//! # Example
//!
//! ```ignore
//! let targets = rdbg::list_targets("localhost", 9222).await?;
//! for target in targets.iter().filter(|t| t.is_attachable()) {
//!     println!("{} {}", target.id, target.url);
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::client::DEFAULT_COMMAND_TIMEOUT;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default discovery host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default remote debugging port.
pub const DEFAULT_PORT: u16 = 9222;

// ============================================================================
// TargetInfo
// ============================================================================

/// One debuggable target (page, worker, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    /// Target identifier.
    pub id: String,
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// Document URL.
    #[serde(default)]
    pub url: String,
    /// Target kind (`page`, `service_worker`, `node`, ...).
    #[serde(default, rename = "type")]
    pub target_type: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// WebSocket URL. Absent while another client is attached.
    #[serde(default)]
    pub web_socket_debugger_url: Option<String>,
    /// DevTools front-end URL.
    #[serde(default)]
    pub devtools_frontend_url: Option<String>,
    /// Favicon URL.
    #[serde(default)]
    pub favicon_url: Option<String>,
}

impl TargetInfo {
    /// Returns `true` if the target can be attached to.
    #[inline]
    #[must_use]
    pub fn is_attachable(&self) -> bool {
        self.web_socket_debugger_url.is_some()
    }

    /// Returns `true` for page targets.
    #[inline]
    #[must_use]
    pub fn is_page(&self) -> bool {
        self.target_type == "page"
    }

    /// Returns the WebSocket URL to attach to.
    ///
    /// # Errors
    ///
    /// [`Error::TargetNotAttachable`] if the target lists no URL.
    pub fn debugger_url(&self) -> Result<&str> {
        self.web_socket_debugger_url
            .as_deref()
            .ok_or_else(|| Error::target_not_attachable(&self.id))
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Lists the targets of the remote end at `host:port`.
///
/// # Errors
///
/// - [`Error::InvalidUrl`] if `host` does not form a valid URL
/// - [`Error::Http`] if the endpoint is unreachable or answers non-2xx
pub async fn list_targets(host: &str, port: u16) -> Result<Vec<TargetInfo>> {
    list_targets_with_timeout(host, port, DEFAULT_COMMAND_TIMEOUT).await
}

/// Lists targets, failing after `request_timeout`.
///
/// # Errors
///
/// See [`list_targets`].
pub async fn list_targets_with_timeout(
    host: &str,
    port: u16,
    request_timeout: Duration,
) -> Result<Vec<TargetInfo>> {
    let url = list_url(host, port)?;
    debug!(%url, "Listing debug targets");

    let client = reqwest::Client::builder().timeout(request_timeout).build()?;
    let targets: Vec<TargetInfo> = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    debug!(count = targets.len(), "Debug targets listed");
    Ok(targets)
}

/// Builds the target list URL.
pub(crate) fn list_url(host: &str, port: u16) -> Result<Url> {
    if host.is_empty() {
        return Err(Error::config("discovery host must not be empty"));
    }
    Ok(Url::parse(&format!("http://{host}:{port}/json/list"))?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response, returning the port.
    async fn serve_once(status: &'static str, body: String) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
        });

        port
    }

    fn targets_json() -> serde_json::Value {
        json!([
            {
                "id": "A1",
                "title": "Example",
                "type": "page",
                "url": "http://example.com/",
                "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/page/A1",
                "devtoolsFrontendUrl": "/devtools/inspector.html?ws=127.0.0.1:9222/devtools/page/A1"
            },
            {
                "id": "B2",
                "title": "Worker",
                "type": "service_worker",
                "url": "http://example.com/sw.js"
            }
        ])
    }

    #[test]
    fn test_target_info_deserialize() {
        let targets: Vec<TargetInfo> = serde_json::from_value(targets_json()).expect("targets");

        assert_eq!(targets.len(), 2);
        assert!(targets[0].is_attachable());
        assert!(targets[0].is_page());
        assert_eq!(
            targets[0].debugger_url().expect("url"),
            "ws://127.0.0.1:9222/devtools/page/A1"
        );

        assert!(!targets[1].is_attachable());
        assert!(matches!(
            targets[1].debugger_url(),
            Err(Error::TargetNotAttachable { .. })
        ));
    }

    #[test]
    fn test_list_url() {
        assert_eq!(
            list_url("localhost", 9222).expect("url").as_str(),
            "http://localhost:9222/json/list"
        );
        assert!(list_url("", 9222).is_err());
    }

    #[tokio::test]
    async fn test_list_targets_over_http() {
        let port = serve_once("200 OK", targets_json().to_string()).await;

        let targets = list_targets("127.0.0.1", port).await.expect("targets");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "A1");
        assert_eq!(targets[1].target_type, "service_worker");
    }

    #[tokio::test]
    async fn test_list_targets_http_error() {
        let port = serve_once("500 Internal Server Error", "{}".to_string()).await;

        let err = list_targets("127.0.0.1", port).await.expect_err("status");
        assert!(matches!(err, Error::Http(_)));
    }
}
