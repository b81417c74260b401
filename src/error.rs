//! Error types for the remote debugging client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use rdbg::{Client, Result};
//!
//! async fn example(client: &Client) -> Result<()> {
//!     client.runtime().enable().await?;
//!     let value = client.runtime().evaluate("1 + 1", Default::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidUrl`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::NotConnected`], [`Error::TooManyPendingRequests`] |
//! | Protocol | [`Error::Protocol`], [`Error::MalformedMessage`] |
//! | Execution | [`Error::RequestTimeout`] |
//! | Scripts & targets | [`Error::ScriptNotFound`], [`Error::AmbiguousScript`], [`Error::TargetNotAttachable`] |
//! | External | [`Error::Json`], [`Error::WebSocket`], [`Error::Http`] |
//!
//! Transport failures ([`Error::ConnectionClosed`], [`Error::NotConnected`])
//! are connection-wide. [`Error::Protocol`] is local to the one request the
//! remote end rejected and never affects other requests.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::RequestId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when client options are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// A URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the WebSocket cannot be opened or a write fails.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The transport closed while the request was outstanding.
    ///
    /// Every pending request receives this error exactly once on close.
    #[error("Connection closed")]
    ConnectionClosed,

    /// A request was issued while no transport is open.
    #[error("Not connected")]
    NotConnected,

    /// Too many requests are awaiting a response.
    #[error("Too many pending requests: {pending}/{max}")]
    TooManyPendingRequests {
        /// Requests currently awaiting a response.
        pending: usize,
        /// Configured limit.
        max: usize,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The remote end rejected a request.
    ///
    /// Carries the `error` object of the response envelope.
    #[error("Protocol error {code}: {message}")]
    Protocol {
        /// Error code reported by the remote end.
        code: i64,
        /// Error message reported by the remote end.
        message: String,
        /// Optional additional data.
        data: Option<Value>,
    },

    /// Inbound text could not be parsed as an envelope.
    #[error("Malformed message: {message}")]
    MalformedMessage {
        /// Why the message was rejected.
        message: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// No response arrived within the caller's timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Script & Target Errors
    // ========================================================================
    /// No parsed script matches the lookup key.
    #[error("Unknown script: {key}")]
    ScriptNotFound {
        /// URL, script id or file name used for the lookup.
        key: String,
    },

    /// A file name lookup matched more than one parsed script.
    #[error("Ambiguous script {key}: {count} scripts match")]
    AmbiguousScript {
        /// File name used for the lookup.
        key: String,
        /// Number of matching scripts.
        count: usize,
    },

    /// The target descriptor has no WebSocket debugger URL.
    ///
    /// Usually means another debugger is already attached.
    #[error("Target {target_id} has no debugger URL")]
    TargetNotAttachable {
        /// The target's identifier.
        target_id: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// HTTP error during target discovery.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(code: i64, message: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a malformed message error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a script not found error.
    #[inline]
    pub fn script_not_found(key: impl Into<String>) -> Self {
        Self::ScriptNotFound { key: key.into() }
    }

    /// Creates an ambiguous script error.
    #[inline]
    pub fn ambiguous_script(key: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousScript {
            key: key.into(),
            count,
        }
    }

    /// Creates a target not attachable error.
    #[inline]
    pub fn target_not_attachable(target_id: impl Into<String>) -> Self {
        Self::TargetNotAttachable {
            target_id: target_id.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeout { .. })
    }

    /// Returns `true` if the remote end rejected the request.
    #[inline]
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    /// Returns `true` if this is a connection-wide transport error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::NotConnected
                | Self::WebSocket(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
