//! Event message types.
//!
//! Events are unsolicited notifications pushed by the remote end. They carry
//! no `id` and are ordered relative to each other, but not relative to
//! responses.
//!
//! # Event Types
//!
//! | Domain | Events |
//! |--------|--------|
//! | `Console` | `messageAdded`, `messagesCleared` |
//! | `Debugger` | `scriptParsed`, `scriptFailedToParse`, `globalObjectCleared`, `paused`, `resumed` |
//! | `DOM` | `documentUpdated` |
//! | `CSS` | `styleSheetAdded`, `styleSheetRemoved`, `styleSheetChanged` |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::identifiers::StyleSheetId;

use super::types::{ConsoleMessage, PausedEvent, ScriptMetadata, StyleSheetHeader};

// ============================================================================
// Event
// ============================================================================

/// An event notification from remote end to local end.
///
/// # Format
///
/// ```json
/// {
///   "method": "Domain.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    /// Event name in `Domain.eventName` format.
    pub method: String,

    /// Event-specific data. `{}` when absent.
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Object(Map::new())
}

impl Event {
    /// Creates an event.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Null => empty_params(),
            other => other,
        };
        Self {
            method: method.into(),
            params,
        }
    }

    /// Returns the domain name from the method.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let event = Event::new("Debugger.scriptParsed", json!({}));
    /// assert_eq!(event.domain(), "Debugger");
    /// ```
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.method.split('.').next().unwrap_or_default()
    }

    /// Returns the event name from the method.
    #[inline]
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.method.split('.').nth(1).unwrap_or_default()
    }

    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        self.parse_internal()
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEvent {
    /// A console message was logged.
    ConsoleMessageAdded(ConsoleMessage),

    /// The console was cleared.
    ConsoleMessagesCleared,

    /// A script was compiled.
    DebuggerScriptParsed(ScriptMetadata),

    /// A script failed to compile.
    DebuggerScriptFailedToParse(ScriptMetadata),

    /// The global object was cleared (navigation or reload).
    DebuggerGlobalObjectCleared,

    /// Execution paused.
    DebuggerPaused(PausedEvent),

    /// Execution resumed.
    DebuggerResumed,

    /// The document was replaced; node ids are invalidated.
    DomDocumentUpdated,

    /// A style sheet was added.
    CssStyleSheetAdded(StyleSheetHeader),

    /// A style sheet was removed.
    CssStyleSheetRemoved {
        /// Removed style sheet.
        style_sheet_id: StyleSheetId,
    },

    /// A style sheet changed.
    CssStyleSheetChanged {
        /// Changed style sheet.
        style_sheet_id: StyleSheetId,
    },

    /// Unknown event type, or a payload that failed to decode.
    Unknown {
        /// Event method.
        method: String,
        /// Event params.
        params: Value,
    },
}

// ============================================================================
// Event Parsing Implementation
// ============================================================================

impl Event {
    /// Internal parsing implementation.
    fn parse_internal(&self) -> ParsedEvent {
        let parsed = match self.method.as_str() {
            "Console.messageAdded" => self
                .decode_field("message")
                .map(ParsedEvent::ConsoleMessageAdded),

            "Console.messagesCleared" => Some(ParsedEvent::ConsoleMessagesCleared),

            "Debugger.scriptParsed" => self.decode().map(ParsedEvent::DebuggerScriptParsed),

            "Debugger.scriptFailedToParse" => {
                self.decode().map(ParsedEvent::DebuggerScriptFailedToParse)
            }

            "Debugger.globalObjectCleared" => Some(ParsedEvent::DebuggerGlobalObjectCleared),

            "Debugger.paused" => self.decode().map(ParsedEvent::DebuggerPaused),

            "Debugger.resumed" => Some(ParsedEvent::DebuggerResumed),

            "DOM.documentUpdated" => Some(ParsedEvent::DomDocumentUpdated),

            "CSS.styleSheetAdded" => self
                .decode_field("header")
                .map(ParsedEvent::CssStyleSheetAdded),

            "CSS.styleSheetRemoved" => self
                .decode_field("styleSheetId")
                .map(|style_sheet_id| ParsedEvent::CssStyleSheetRemoved { style_sheet_id }),

            "CSS.styleSheetChanged" => self
                .decode_field("styleSheetId")
                .map(|style_sheet_id| ParsedEvent::CssStyleSheetChanged { style_sheet_id }),

            _ => None,
        };

        parsed.unwrap_or_else(|| ParsedEvent::Unknown {
            method: self.method.clone(),
            params: self.params.clone(),
        })
    }

    /// Decodes the whole params object.
    fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.params.clone())
            .inspect_err(|e| warn!(method = %self.method, error = %e, "Undecodable event params"))
            .ok()
    }

    /// Decodes one field of the params object.
    fn decode_field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.params.get(key)?.clone();
        serde_json::from_value(value)
            .inspect_err(|e| warn!(method = %self.method, key, error = %e, "Undecodable event field"))
            .ok()
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
    fn test_event_domain_and_name() {
        let event: Event = serde_json::from_str(
            r#"{"method": "Debugger.scriptParsed", "params": {"scriptId": "1", "url": "a.js"}}"#,
        )
        .expect("parse event");
        assert_eq!(event.domain(), "Debugger");
        assert_eq!(event.event_name(), "scriptParsed");
    }

    #[test]
    fn test_missing_params_default_to_object() {
        let event: Event =
            serde_json::from_str(r#"{"method": "Debugger.resumed"}"#).expect("parse event");
        assert_eq!(event.params, json!({}));
        assert_eq!(event.parse(), ParsedEvent::DebuggerResumed);
    }

    #[test]
    fn test_script_parsed() {
        let event = Event::new(
            "Debugger.scriptParsed",
            json!({ "scriptId": "42", "url": "file:///app.js", "endLine": 10 }),
        );
        match event.parse() {
            ParsedEvent::DebuggerScriptParsed(meta) => {
                assert_eq!(meta.script_id.as_str(), "42");
                assert_eq!(meta.url, "file:///app.js");
                assert_eq!(meta.end_line, 10);
            }
            other => panic!("unexpected parsed event {other:?}"),
        }
    }

    #[test]
    fn test_console_message_added() {
        let event = Event::new(
            "Console.messageAdded",
            json!({ "message": { "source": "console-api", "level": "log", "text": "hi" } }),
        );
        match event.parse() {
            ParsedEvent::ConsoleMessageAdded(message) => assert_eq!(message.text, "hi"),
            other => panic!("unexpected parsed event {other:?}"),
        }
    }

    #[test]
    fn test_style_sheet_events() {
        let added = Event::new(
            "CSS.styleSheetAdded",
            json!({ "header": { "styleSheetId": "5.1", "sourceURL": "main.css" } }),
        );
        match added.parse() {
            ParsedEvent::CssStyleSheetAdded(header) => {
                assert_eq!(header.style_sheet_id.as_str(), "5.1");
                assert_eq!(header.source_url, "main.css");
            }
            other => panic!("unexpected parsed event {other:?}"),
        }

        let removed = Event::new("CSS.styleSheetRemoved", json!({ "styleSheetId": "5.1" }));
        assert_eq!(
            removed.parse(),
            ParsedEvent::CssStyleSheetRemoved {
                style_sheet_id: StyleSheetId::new("5.1")
            }
        );
    }

    #[test]
    fn test_undecodable_payload_is_unknown() {
        let event = Event::new("Debugger.scriptParsed", json!({ "url": "no-id.js" }));
        assert!(matches!(event.parse(), ParsedEvent::Unknown { .. }));
    }

    #[test]
    fn test_unknown_event() {
        let event = Event::new("Network.requestWillBeSent", json!({ "requestId": "1" }));
        match event.parse() {
            ParsedEvent::Unknown { method, params } => {
                assert_eq!(method, "Network.requestWillBeSent");
                assert_eq!(params["requestId"], "1");
            }
            other => panic!("expected Unknown variant, got {other:?}"),
        }
    }
}
