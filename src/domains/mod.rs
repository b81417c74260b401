//! Typed façades over the protocol domains.
//!
//! Each handle wraps a clone of the [`Connection`] and turns one method call
//! into one request. Remote rejections surface as [`Error::Protocol`].
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `console` | Console messages |
//! | `debugger` | Execution control, scripts, live edit |
//! | `runtime` | Evaluation and remote objects |
//! | `dom` | Document and node edits |
//! | `css` | Style sheet text |
//!
//! # Example
//!
//! ```ignore
//! let debugger = client.debugger();
//! debugger.enable().await?;
//!
//! let mut events = debugger.events();
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod console;
mod css;
mod debugger;
mod dom;
mod runtime;

// ============================================================================
// Imports
// ============================================================================

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::protocol::{Command, Event};
use crate::transport::{Connection, EventStream};

// ============================================================================
// Re-exports
// ============================================================================

pub use console::{Console, ConsoleEvent, ConsoleMessages};
pub use css::{Css, CssEvent};
pub use debugger::{Debugger, DebuggerEvent};
pub use dom::{Dom, DomEvent};
pub use runtime::Runtime;

// ============================================================================
// DomainEvents
// ============================================================================

/// Typed stream over one domain's events.
///
/// Events the mapping does not recognise are skipped. Ends when the
/// connection closes.
pub struct DomainEvents<T> {
    stream: EventStream,
    map: fn(Event) -> Option<T>,
}

impl<T> DomainEvents<T> {
    pub(crate) fn new(stream: EventStream, map: fn(Event) -> Option<T>) -> Self {
        Self { stream, map }
    }

    /// Receives the next event, or `None` once the connection closed.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            let event = self.stream.recv().await?;
            if let Some(item) = (self.map)(event) {
                return Some(item);
            }
        }
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        while let Some(event) = self.stream.try_recv() {
            if let Some(item) = (self.map)(event) {
                return Some(item);
            }
        }
        None
    }
}

impl<T> Stream for DomainEvents<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.stream).poll_next(cx) {
                Poll::Ready(Some(event)) => {
                    if let Some(item) = (this.map)(event) {
                        return Poll::Ready(Some(item));
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<T> std::fmt::Debug for DomainEvents<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainEvents").finish_non_exhaustive()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Executes a command and decodes the whole result.
pub(crate) async fn execute_as<T: DeserializeOwned>(
    connection: &Connection,
    command: Command,
) -> Result<T> {
    let value = connection.execute(command).await?;
    Ok(serde_json::from_value(value)?)
}

/// Executes a command and decodes one field of the result.
pub(crate) async fn execute_field<T: DeserializeOwned>(
    connection: &Connection,
    command: Command,
    field: &str,
) -> Result<T> {
    let mut value = connection.execute(command).await?;
    let field_value = value
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| Error::malformed(format!("result is missing '{field}'")))?;
    Ok(serde_json::from_value(field_value)?)
}
