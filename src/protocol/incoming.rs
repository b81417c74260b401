//! Classification of inbound messages.
//!
//! Every inbound text frame is exactly one of:
//!
//! | Shape | Classified as |
//! |-------|---------------|
//! | has `id` | [`Incoming::Response`] |
//! | no `id`, has `method` | [`Incoming::Event`] |
//! | anything else | [`Error::MalformedMessage`] |
//!
//! Once an `id` is present the rest of the envelope is decoded leniently,
//! so a reply is never dropped on the floor while its caller waits.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

use super::event::Event;
use super::request::{Response, ResponseError, deserialize_error};

// ============================================================================
// Incoming
// ============================================================================

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Reply to a request issued by this connection.
    Response(Response),
    /// Unsolicited notification.
    Event(Event),
}

/// Union of every field an inbound envelope may carry.
#[derive(Deserialize)]
struct RawIncoming {
    #[serde(default)]
    id: Option<RequestId>,
    #[serde(default)]
    method: Option<Value>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_error")]
    error: Option<ResponseError>,
}

impl Incoming {
    /// Parses and classifies one inbound text message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMessage`] if the text is not a JSON object,
    /// has a non-integer `id`, or carries neither `id` nor `method`.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawIncoming =
            serde_json::from_str(text).map_err(|e| Error::malformed(e.to_string()))?;

        match (raw.id, raw.method) {
            (Some(id), _) => Ok(Self::Response(Response {
                id,
                result: raw.result,
                error: raw.error,
            })),
            (None, Some(Value::String(method))) => Ok(Self::Event(Event::new(
                method,
                raw.params.unwrap_or(Value::Null),
            ))),
            (None, Some(_)) => Err(Error::malformed("event method is not a string")),
            (None, None) => Err(Error::malformed("message has neither id nor method")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
