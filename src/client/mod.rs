//! Client entry point.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Client`] | One connection plus its domain handles |
//! | [`ClientBuilder`] | Fluent configuration and target discovery |
//! | [`ClientOptions`] | Timeouts and limits |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for client configuration.
pub mod builder;

/// Core client implementation.
pub mod core;

/// Connection options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use core::Client;
pub use options::{
    ClientOptions, DEFAULT_COMMAND_TIMEOUT, DEFAULT_EVENT_CAPACITY, DEFAULT_MAX_PENDING_REQUESTS,
};
