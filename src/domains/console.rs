//! Console domain.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::Result;
use crate::protocol::{Command, ConsoleCommand, ConsoleMessage, Event, ParsedEvent};
use crate::transport::Connection;

use super::DomainEvents;

// ============================================================================
// Types
// ============================================================================

/// Stream of console messages, in arrival order.
pub type ConsoleMessages = DomainEvents<ConsoleMessage>;

/// Typed console events.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// A message was logged.
    MessageAdded(ConsoleMessage),
    /// The console was cleared.
    MessagesCleared,
}

// ============================================================================
// Console
// ============================================================================

/// Handle to the Console domain.
#[derive(Debug, Clone)]
pub struct Console {
    connection: Connection,
    enabled: Arc<AtomicBool>,
}

impl Console {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            connection,
            enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts message reporting.
    ///
    /// Messages already logged are replayed by the remote end after enabling.
    pub async fn enable(&self) -> Result<()> {
        debug!("Enabling Console domain");
        self.connection
            .execute(Command::Console(ConsoleCommand::Enable))
            .await?;
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    /// Stops message reporting.
    pub async fn disable(&self) -> Result<()> {
        self.connection
            .execute(Command::Console(ConsoleCommand::Disable))
            .await?;
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }

    /// Clears collected messages on the remote end.
    pub async fn clear_messages(&self) -> Result<()> {
        self.connection
            .execute(Command::Console(ConsoleCommand::ClearMessages))
            .await?;
        Ok(())
    }

    /// Returns `true` after a successful [`enable`](Self::enable).
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Returns a new stream of logged messages.
    ///
    /// Only messages arriving after this call are delivered.
    pub fn messages(&self) -> ConsoleMessages {
        DomainEvents::new(self.connection.subscribe("Console.messageAdded"), |event| {
            match event.parse() {
                ParsedEvent::ConsoleMessageAdded(message) => Some(message),
                _ => None,
            }
        })
    }

    /// Returns a new stream of console events.
    pub fn events(&self) -> DomainEvents<ConsoleEvent> {
        DomainEvents::new(self.connection.subscribe_domain("Console"), console_event)
    }
}

fn console_event(event: Event) -> Option<ConsoleEvent> {
    match event.parse() {
        ParsedEvent::ConsoleMessageAdded(message) => Some(ConsoleEvent::MessageAdded(message)),
        ParsedEvent::ConsoleMessagesCleared => Some(ConsoleEvent::MessagesCleared),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
