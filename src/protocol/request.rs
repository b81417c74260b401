//! Request and Response envelopes.
//!
//! Defines the message format of correlated request/response pairs.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// A request envelope from local end to remote end.
///
/// Immutable once sent.
///
/// # Format
///
/// ```json
/// {
///   "id": 0,
///   "method": "Domain.action",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    /// Correlation id, unique among outstanding requests.
    pub id: RequestId,

    /// Remote operation in `Domain.action` format.
    pub method: String,

    /// Operation parameters. Always an object.
    pub params: Value,
}

impl Request {
    /// Creates a request.
    ///
    /// A `null` `params` is sent as `{}`.
    #[must_use]
    pub fn new(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Creates a request from a typed command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the command fails to serialize, or
    /// [`Error::MalformedMessage`] if it does not serialize to a
    /// method/params pair.
    pub fn from_command(id: RequestId, command: &Command) -> Result<Self> {
        let (method, params) = command_parts(command)?;
        Ok(Self::new(id, method, params))
    }
}

/// Splits a serialized command into its method name and params.
pub(crate) fn command_parts(command: &Command) -> Result<(String, Value)> {
    let Value::Object(mut map) = serde_json::to_value(command)? else {
        return Err(Error::malformed("command did not serialize to an object"));
    };

    let method = match map.remove("method") {
        Some(Value::String(method)) => method,
        _ => return Err(Error::malformed("command has no method")),
    };
    let params = map.remove("params").unwrap_or(Value::Null);

    Ok((method, params))
}

// ============================================================================
// Response
// ============================================================================

/// The `error` payload of a failed response.
///
/// Remote ends are loose about its shape: `null` and `false` mean "no
/// error", an object carries `code`/`message`/`data`, and any other value
/// is taken as the message itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseError {
    /// Error code.
    #[serde(default)]
    pub code: i64,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Optional additional data.
    #[serde(default)]
    pub data: Option<Value>,
}

impl ResponseError {
    /// Normalizes a raw `error` value.
    ///
    /// Returns `None` for `null` and `false`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::Object(mut map) => {
                let code = map.get("code").and_then(Value::as_i64).unwrap_or_default();
                let message = match map.remove("message") {
                    Some(Value::String(message)) => message,
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                let data = map.remove("data").filter(|data| !data.is_null());
                Some(Self {
                    code,
                    message,
                    data,
                })
            }
            Value::String(message) => Some(Self {
                code: 0,
                message,
                data: None,
            }),
            other => Some(Self {
                code: 0,
                message: other.to_string(),
                data: None,
            }),
        }
    }
}

/// Deserializes an `error` field through [`ResponseError::from_value`].
pub(crate) fn deserialize_error<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<ResponseError>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(ResponseError::from_value))
}

impl From<ResponseError> for Error {
    fn from(err: ResponseError) -> Self {
        Self::Protocol {
            code: err.code,
            message: err.message,
            data: err.data,
        }
    }
}

/// A response envelope from remote end to local end.
///
/// # Format
///
/// Success:
/// ```json
/// { "id": 0, "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": 0, "error": { "code": -32601, "message": "..." } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error payload (if error).
    #[serde(default, deserialize_with = "deserialize_error")]
    pub error: Option<ResponseError>,
}

impl Response {
    /// Returns `true` if the remote end rejected the request.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns `true` if the response carries neither result nor error.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.result.is_none() && self.error.is_none()
    }

    /// Extracts the outcome of the request.
    ///
    /// An `error` payload wins over a `result`. A response carrying neither
    /// resolves to an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the response carries an error.
    pub fn into_result(self) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(error.into());
        }

        Ok(self.result.unwrap_or_else(|| Value::Object(Map::new())))
    }
}

// ============================================================================
// Tests
// ============================================================================
