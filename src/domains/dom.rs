//! DOM domain: document tree and node edits.
//!
//! Node ids are only valid until the next `DOM.documentUpdated` event.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::Result;
use crate::identifiers::NodeId;
use crate::protocol::{Command, DomCommand, Event, Node, ParsedEvent};
use crate::transport::Connection;

use super::{DomainEvents, execute_field};

// ============================================================================
// DomEvent
// ============================================================================

/// Typed DOM events.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// The document was replaced; every node id is stale.
    DocumentUpdated,
    /// Any other DOM event, passed through untyped.
    Other(Event),
}

// ============================================================================
// Dom
// ============================================================================

/// Handle to the DOM domain.
#[derive(Debug, Clone)]
pub struct Dom {
    connection: Connection,
    enabled: Arc<AtomicBool>,
}

impl Dom {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            connection,
            enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enables DOM events.
    pub async fn enable(&self) -> Result<()> {
        debug!("Enabling DOM domain");
        self.execute(DomCommand::Enable).await?;
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    /// Disables DOM events.
    pub async fn disable(&self) -> Result<()> {
        self.execute(DomCommand::Disable).await?;
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }

    /// Returns `true` after a successful [`enable`](Self::enable).
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Returns the root document node.
    pub async fn get_document(&self) -> Result<Node> {
        self.fetch_document(None).await
    }

    /// Returns the root document node with `depth` levels of children
    /// (`-1` for the whole tree).
    pub async fn get_document_with_depth(&self, depth: i32) -> Result<Node> {
        self.fetch_document(Some(depth)).await
    }

    /// Finds the first node under `node_id` matching `selector`.
    ///
    /// Returns a node id for which [`NodeId::is_none`] holds when nothing
    /// matches.
    pub async fn query_selector(&self, node_id: NodeId, selector: impl Into<String>) -> Result<NodeId> {
        execute_field(
            &self.connection,
            Command::Dom(DomCommand::QuerySelector {
                node_id,
                selector: selector.into(),
            }),
            "nodeId",
        )
        .await
    }

    /// Finds every node under `node_id` matching `selector`.
    pub async fn query_selector_all(
        &self,
        node_id: NodeId,
        selector: impl Into<String>,
    ) -> Result<Vec<NodeId>> {
        execute_field(
            &self.connection,
            Command::Dom(DomCommand::QuerySelectorAll {
                node_id,
                selector: selector.into(),
            }),
            "nodeIds",
        )
        .await
    }

    /// Sets the value of a text or comment node.
    pub async fn set_node_value(&self, node_id: NodeId, value: impl Into<String>) -> Result<()> {
        self.execute(DomCommand::SetNodeValue {
            node_id,
            value: value.into(),
        })
        .await
    }

    /// Sets an attribute of an element.
    pub async fn set_attribute_value(
        &self,
        node_id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.execute(DomCommand::SetAttributeValue {
            node_id,
            name: name.into(),
            value: value.into(),
        })
        .await
    }

    /// Returns a new stream of DOM events.
    pub fn events(&self) -> DomainEvents<DomEvent> {
        DomainEvents::new(self.connection.subscribe_domain("DOM"), dom_event)
    }

    async fn fetch_document(&self, depth: Option<i32>) -> Result<Node> {
        execute_field(
            &self.connection,
            Command::Dom(DomCommand::GetDocument { depth }),
            "root",
        )
        .await
    }

    async fn execute(&self, command: DomCommand) -> Result<()> {
        self.connection.execute(Command::Dom(command)).await?;
        Ok(())
    }
}

fn dom_event(event: Event) -> Option<DomEvent> {
    match event.parse() {
        ParsedEvent::DomDocumentUpdated => Some(DomEvent::DocumentUpdated),
        _ => Some(DomEvent::Other(event)),
    }
}

// ============================================================================
// Tests
// ============================================================================
