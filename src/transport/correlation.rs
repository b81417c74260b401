//! Correlation of in-flight requests with their waiting callers.
//!
//! The table owns each pending continuation from registration until exactly
//! one resolution: a response, a caller-side timeout, or connection close.
//! Removal and resolution are separate steps so the lock is never held while
//! a continuation runs.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

// ============================================================================
// Types
// ============================================================================

/// Sender half of a pending continuation.
pub(crate) type ResponseSender = oneshot::Sender<Result<Value>>;

// ============================================================================
// Pending
// ============================================================================

/// A continuation awaiting the response to one request.
#[derive(Debug)]
pub(crate) struct Pending {
    /// Method of the originating request.
    method: String,
    /// Continuation to resolve.
    tx: ResponseSender,
}

impl Pending {
    /// Returns the method of the originating request.
    #[inline]
    pub(crate) fn method(&self) -> &str {
        &self.method
    }

    /// Resolves the continuation, consuming it.
    ///
    /// Returns `false` if the caller stopped waiting.
    pub(crate) fn resolve(self, outcome: Result<Value>) -> bool {
        self.tx.send(outcome).is_ok()
    }
}

// ============================================================================
// CorrelationTable
// ============================================================================

/// Map of outstanding request ids to their continuations.
///
/// Once closed, the table rejects new registrations with
/// [`Error::NotConnected`]; closing and draining happen in one step.
#[derive(Debug, Default)]
pub(crate) struct CorrelationTable {
    pending: FxHashMap<RequestId, Pending>,
    closed: bool,
}

impl CorrelationTable {
    /// Creates an open, empty table.
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a continuation under `id`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if the table is closed
    /// - [`Error::Connection`] if `id` is already outstanding
    pub(crate) fn register(
        &mut self,
        id: RequestId,
        method: impl Into<String>,
        tx: ResponseSender,
    ) -> Result<()> {
        if self.closed {
            return Err(Error::NotConnected);
        }
        if self.pending.contains_key(&id) {
            return Err(Error::connection(format!("request id {id} is already in flight")));
        }

        self.pending.insert(
            id,
            Pending {
                method: method.into(),
                tx,
            },
        );
        Ok(())
    }

    /// Removes and returns the continuation for `id`.
    #[inline]
    pub(crate) fn take(&mut self, id: RequestId) -> Option<Pending> {
        self.pending.remove(&id)
    }

    /// Closes the table and drains every outstanding continuation.
    pub(crate) fn close(&mut self) -> Vec<(RequestId, Pending)> {
        self.closed = true;
        self.pending.drain().collect()
    }

    /// Returns `true` once the table has been closed.
    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns `true` if `id` is outstanding.
    #[cfg(test)]
    pub(crate) fn contains(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Returns the number of outstanding requests.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_register_and_take_once() {
        let mut table = CorrelationTable::new();
        let (tx, mut rx) = oneshot::channel();
        table
            .register(RequestId::new(0), "Console.enable", tx)
            .expect("register");
        assert!(table.contains(RequestId::new(0)));

        let pending = table.take(RequestId::new(0)).expect("pending");
        assert_eq!(pending.method(), "Console.enable");
        assert!(pending.resolve(Ok(json!({}))));
        assert_eq!(rx.try_recv().expect("resolved").expect("ok"), json!({}));

        assert!(table.take(RequestId::new(0)).is_none());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut table = CorrelationTable::new();
        let (tx1, _rx1) = oneshot::channel();
        let (tx2, _rx2) = oneshot::channel();
        table.register(RequestId::new(3), "A.a", tx1).expect("register");
        assert!(table.register(RequestId::new(3), "B.b", tx2).is_err());
        assert_eq!(table.take(RequestId::new(3)).expect("pending").method(), "A.a");
    }

    #[test]
    fn test_close_drains_and_rejects() {
        let mut table = CorrelationTable::new();
        let mut receivers = Vec::new();
        for n in 0..3 {
            let (tx, rx) = oneshot::channel();
            table.register(RequestId::new(n), "Debugger.pause", tx).expect("register");
            receivers.push(rx);
        }

        let drained = table.close();
        assert_eq!(drained.len(), 3);
        assert!(table.is_closed());
        assert_eq!(table.len(), 0);

        for (_, pending) in drained {
            pending.resolve(Err(Error::ConnectionClosed));
        }
        for mut rx in receivers {
            assert!(matches!(rx.try_recv(), Ok(Err(Error::ConnectionClosed))));
        }

        let (tx, _rx) = oneshot::channel();
        assert!(matches!(
            table.register(RequestId::new(9), "Console.enable", tx),
            Err(Error::NotConnected)
        ));
    }

    #[test]
    fn test_resolve_after_caller_dropped() {
        let mut table = CorrelationTable::new();
        let (tx, rx) = oneshot::channel();
        table.register(RequestId::new(1), "Runtime.enable", tx).expect("register");
        drop(rx);
        let pending = table.take(RequestId::new(1)).expect("pending");
        assert!(!pending.resolve(Ok(json!({}))));
    }
}
