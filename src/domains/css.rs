//! CSS domain: style sheet text.
//!
//! The CSS domain depends on the DOM domain; [`Css::enable`] enables DOM
//! first when needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::Result;
use crate::identifiers::StyleSheetId;
use crate::protocol::{Command, CssCommand, Event, ParsedEvent, StyleSheetHeader};
use crate::transport::Connection;

use super::{Dom, DomainEvents, execute_field};

// ============================================================================
// CssEvent
// ============================================================================

/// Typed CSS events.
#[derive(Debug, Clone, PartialEq)]
pub enum CssEvent {
    /// A style sheet was added.
    StyleSheetAdded(StyleSheetHeader),
    /// A style sheet was removed.
    StyleSheetRemoved(StyleSheetId),
    /// A style sheet changed.
    StyleSheetChanged(StyleSheetId),
}

// ============================================================================
// Css
// ============================================================================

/// Handle to the CSS domain.
#[derive(Debug, Clone)]
pub struct Css {
    connection: Connection,
    dom: Dom,
    enabled: Arc<AtomicBool>,
}

impl Css {
    pub(crate) fn new(connection: Connection, dom: Dom) -> Self {
        Self {
            connection,
            dom,
            enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enables style sheet tracking, enabling DOM first if it is not.
    ///
    /// # Errors
    ///
    /// Fails without sending `CSS.enable` if enabling DOM fails.
    pub async fn enable(&self) -> Result<()> {
        if !self.dom.is_enabled() {
            debug!("Enabling DOM domain before CSS");
            self.dom.enable().await?;
        }

        self.execute(CssCommand::Enable).await?;
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    /// Disables style sheet tracking.
    pub async fn disable(&self) -> Result<()> {
        self.execute(CssCommand::Disable).await?;
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }

    /// Returns `true` after a successful [`enable`](Self::enable).
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Returns the text of a style sheet.
    pub async fn get_style_sheet_text(&self, style_sheet_id: &StyleSheetId) -> Result<String> {
        execute_field(
            &self.connection,
            Command::Css(CssCommand::GetStyleSheetText {
                style_sheet_id: style_sheet_id.clone(),
            }),
            "text",
        )
        .await
    }

    /// Replaces the text of a style sheet.
    pub async fn set_style_sheet_text(
        &self,
        style_sheet_id: &StyleSheetId,
        text: impl Into<String>,
    ) -> Result<()> {
        self.execute(CssCommand::SetStyleSheetText {
            style_sheet_id: style_sheet_id.clone(),
            text: text.into(),
        })
        .await
    }

    /// Returns a new stream of CSS events.
    pub fn events(&self) -> DomainEvents<CssEvent> {
        DomainEvents::new(self.connection.subscribe_domain("CSS"), css_event)
    }

    async fn execute(&self, command: CssCommand) -> Result<()> {
        self.connection.execute(Command::Css(command)).await?;
        Ok(())
    }
}

fn css_event(event: Event) -> Option<CssEvent> {
    match event.parse() {
        ParsedEvent::CssStyleSheetAdded(header) => Some(CssEvent::StyleSheetAdded(header)),
        ParsedEvent::CssStyleSheetRemoved { style_sheet_id } => {
            Some(CssEvent::StyleSheetRemoved(style_sheet_id))
        }
        ParsedEvent::CssStyleSheetChanged { style_sheet_id } => {
            Some(CssEvent::StyleSheetChanged(style_sheet_id))
        }
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::transport::testing::connect_pair;

    #[tokio::test]
    async fn test_enable_enables_dom_first() {
        let (connection, mut remote) = connect_pair().await;
        let dom = Dom::new(connection.clone());
        let css = Css::new(connection, dom.clone());

        let enable = tokio::spawn({
            let css = css.clone();
            async move { css.enable().await }
        });

        let first = remote.answer(json!({})).await;
        let second = remote.answer(json!({})).await;
        enable.await.expect("join").expect("enable");

        assert_eq!(first["method"], "DOM.enable");
        assert_eq!(second["method"], "CSS.enable");
        assert!(dom.is_enabled());
        assert!(css.is_enabled());
    }

    #[tokio::test]
    async fn test_enable_skips_enabled_dom() {
        let (connection, mut remote) = connect_pair().await;
        let dom = Dom::new(connection.clone());
        let css = Css::new(connection, dom.clone());

        let (result, _) = tokio::join!(dom.enable(), remote.answer(json!({})));
        result.expect("dom enable");

        let (result, request) = tokio::join!(css.enable(), remote.answer(json!({})));
        result.expect("css enable");
        assert_eq!(request["method"], "CSS.enable");
    }

    #[tokio::test]
    async fn test_failed_dom_enable_aborts() {
        let (connection, mut remote) = connect_pair().await;
        let dom = Dom::new(connection.clone());
        let css = Css::new(connection.clone(), dom);

        let (result, request) = tokio::join!(
            css.enable(),
            remote.answer_error(-32000, "DOM agent is not enabled")
        );
        assert!(result.is_err());
        assert_eq!(request["method"], "DOM.enable");
        assert!(!css.is_enabled());
        assert_eq!(connection.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_css_enable_keeps_flag_clear() {
        let (connection, mut remote) = connect_pair().await;
        let dom = Dom::new(connection.clone());
        let css = Css::new(connection, dom.clone());

        let enable = tokio::spawn({
            let css = css.clone();
            async move { css.enable().await }
        });

        remote.answer(json!({})).await;
        remote.answer_error(-32000, "CSS agent was not enabled").await;

        assert!(enable.await.expect("join").is_err());
        assert!(dom.is_enabled());
        assert!(!css.is_enabled());
    }

    #[tokio::test]
    async fn test_style_sheet_text() {
        let (connection, mut remote) = connect_pair().await;
        let css = Css::new(connection.clone(), Dom::new(connection));
        let sheet = StyleSheetId::new("style-1");

        let (result, request) = tokio::join!(
            css.get_style_sheet_text(&sheet),
            remote.answer(json!({ "text": "body { margin: 0 }" }))
        );
        assert_eq!(result.expect("text"), "body { margin: 0 }");
        assert_eq!(request["params"], json!({ "styleSheetId": "style-1" }));

        let (result, request) = tokio::join!(
            css.set_style_sheet_text(&sheet, "body { margin: 1px }"),
            remote.answer(json!({}))
        );
        result.expect("set text");
        assert_eq!(request["method"], "CSS.setStyleSheetText");
        assert_eq!(request["params"]["text"], "body { margin: 1px }");
    }

    #[tokio::test]
    async fn test_events() {
        let (connection, mut remote) = connect_pair().await;
        let css = Css::new(connection.clone(), Dom::new(connection));
        let mut events = css.events();

        remote
            .emit(
                "CSS.styleSheetAdded",
                json!({ "header": { "styleSheetId": "s1", "sourceURL": "app.css", "origin": "regular" } }),
            )
            .await;
        remote.emit("CSS.styleSheetChanged", json!({ "styleSheetId": "s1" })).await;
        remote.emit("CSS.styleSheetRemoved", json!({ "styleSheetId": "s1" })).await;

        match events.recv().await {
            Some(CssEvent::StyleSheetAdded(header)) => assert_eq!(header.source_url, "app.css"),
            other => panic!("expected added, got {other:?}"),
        }
        assert_eq!(
            events.recv().await,
            Some(CssEvent::StyleSheetChanged(StyleSheetId::new("s1")))
        );
        assert_eq!(
            events.recv().await,
            Some(CssEvent::StyleSheetRemoved(StyleSheetId::new("s1")))
        );
    }
}
