//! rdbg - Remote debugging protocol client.
//!
//! This library speaks the JSON remote debugging protocol of browsers and
//! JavaScript runtimes over a WebSocket.
//!
//! # Architecture
//!
//! The client follows a request/response plus event model:
//!
//! - **Local End (Rust)**: Sends `{id, method, params}` requests, awaits the
//!   matching `{id, result | error}` response
//! - **Remote End (browser, runtime)**: Answers requests and pushes
//!   `{method, params}` events
//!
//! Key design principles:
//!
//! - One [`Connection`] owns the socket, one event loop and one request id
//!   counter; ids are unique and increasing per connection
//! - A request is registered before it is written, so its response can never
//!   arrive unmatched
//! - Inbound messages are dispatched strictly in arrival order
//! - Parsed scripts are tracked per connection and cleared with the global
//!   object
//! - Closing the connection fails every pending request
//!
//! # Quick Start
//!
//! ```no_run
//! use rdbg::{Client, EvaluateOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Attach to the first page of a browser started with
//!     // --remote-debugging-port=9222
//!     let client = Client::builder().port(9222).attach_first().await?;
//!
//!     client.runtime().enable().await?;
//!     let result = client
//!         .runtime()
//!         .evaluate("document.title", EvaluateOptions::new().with_return_by_value())
//!         .await?;
//!     println!("Page title: {:?}", result.result.value);
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`Client`], builder and options |
//! | [`discovery`] | Target listing over HTTP |
//! | [`domains`] | Console, Debugger, Runtime, DOM, CSS handles |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire envelopes and payload types |
//! | [`transport`] | WebSocket connection and event loop |

// ============================================================================
// Modules
// ============================================================================

/// Client entry point.
///
/// Use [`Client::builder()`] to configure and attach a client.
pub mod client;

/// Debug target discovery.
pub mod discovery;

/// Typed domain handles.
pub mod domains;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for protocol entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Protocol message types.
pub mod protocol;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientBuilder, ClientOptions};

// Discovery
pub use discovery::{TargetInfo, list_targets};

// Domain types
pub use domains::{
    Console, ConsoleEvent, ConsoleMessages, Css, CssEvent, Debugger, DebuggerEvent, Dom,
    DomEvent, DomainEvents, Runtime,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{NodeId, RemoteObjectId, RequestId, ScriptId, StyleSheetId};

// Protocol types
pub use protocol::{
    CallArgument, CallFunctionOnParams, ConsoleMessage, EvaluateOptions, EvaluateResult, Event,
    GetPropertiesOptions, GetPropertiesResult, Node, RemoteObject, ScriptMetadata,
    SetScriptSourceResult, StyleSheetHeader,
};

// Transport types
pub use transport::{Connection, ConnectionEvent, EventStream, PendingResponse, ScriptRegistry};
