//! WebSocket transport layer.
//!
//! This module handles communication between the local end (Rust) and the
//! remote debugging endpoint via WebSocket.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Client (Rust)  │                              │  Remote end     │
//! │                 │         WebSocket            │  (browser,      │
//! │  Connection     │◄────────────────────────────►│   runtime)      │
//! │  event loop     │   ws://host:port/devtools/…  │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::connect` - Open the WebSocket (or wrap a stream with `new`)
//! 2. `Connection::request` - Register, then queue a request
//! 3. Event loop resolves responses and routes events
//! 4. `Connection::shutdown` - Close; every pending request fails
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `correlation` | Pending request table |
//! | `registry` | Parsed-script registry |
//! | `router` | Prefix-filtered event subscriptions |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// Pending request table.
pub(crate) mod correlation;

/// Parsed-script registry.
pub mod registry;

/// Event subscriptions.
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ConnectionEvent, PendingResponse};
pub use registry::ScriptRegistry;
pub use router::EventStream;
