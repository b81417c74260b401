//! Client and connection options.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use rdbg::ClientOptions;
//!
//! let options = ClientOptions::new()
//!     .with_command_timeout(Duration::from_secs(5))
//!     .with_max_pending_requests(500);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for a request awaiting its response.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Default limit of requests awaiting a response.
pub const DEFAULT_MAX_PENDING_REQUESTS: usize = 100;

/// Default buffer of the connection event broadcast.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

// ============================================================================
// ClientOptions
// ============================================================================

/// Options of one client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Timeout applied by [`Connection::send`](crate::transport::Connection::send).
    pub command_timeout: Duration,

    /// Requests allowed to await a response at once.
    pub max_pending_requests: usize,

    /// Buffer of the [`ConnectionEvent`](crate::transport::ConnectionEvent)
    /// broadcast; slow observers lag beyond it.
    pub event_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            max_pending_requests: DEFAULT_MAX_PENDING_REQUESTS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientOptions {
    /// Sets the default request timeout.
    #[inline]
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets the pending request limit.
    #[inline]
    #[must_use]
    pub fn with_max_pending_requests(mut self, max: usize) -> Self {
        self.max_pending_requests = max;
        self
    }

    /// Sets the connection event buffer.
    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientOptions {
    /// Checks that every option is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero timeout, limit or capacity.
    pub fn validate(&self) -> Result<()> {
        if self.command_timeout.is_zero() {
            return Err(Error::config("command timeout must be greater than zero"));
        }
        if self.max_pending_requests == 0 {
            return Err(Error::config("max pending requests must be at least 1"));
        }
        if self.event_capacity == 0 {
            return Err(Error::config("event capacity must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.command_timeout, Duration::from_secs(30));
        assert_eq!(options.max_pending_requests, 100);
        assert_eq!(options.event_capacity, 256);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let options = ClientOptions::new()
            .with_command_timeout(Duration::from_millis(250))
            .with_max_pending_requests(8)
            .with_event_capacity(16);
        assert_eq!(options.command_timeout, Duration::from_millis(250));
        assert_eq!(options.max_pending_requests, 8);
        assert_eq!(options.event_capacity, 16);
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert_err!(ClientOptions::new().with_command_timeout(Duration::ZERO).validate());
        assert_err!(ClientOptions::new().with_max_pending_requests(0).validate());
        assert_ok!(ClientOptions::new().with_max_pending_requests(1).validate());

        let err = assert_err!(ClientOptions::new().with_event_capacity(0).validate());
        assert!(err.to_string().contains("event capacity"));
    }
}
