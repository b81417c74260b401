//! Payload types shared by commands, responses and events.
//!
//! Fields follow the protocol's camelCase naming on the wire. Most fields are
//! optional or defaulted: remote ends differ in what they report, and a
//! missing field must not make an otherwise valid message undecodable.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::{NodeId, RemoteObjectId, ScriptId, StyleSheetId};

// ============================================================================
// Debugger
// ============================================================================

/// Metadata of a parsed script, as reported by `Debugger.scriptParsed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptMetadata {
    /// Identifier of the script.
    pub script_id: ScriptId,
    /// URL or name of the script. Empty for anonymous scripts.
    #[serde(default)]
    pub url: String,
    /// First line of the script.
    #[serde(default)]
    pub start_line: u32,
    /// First column of the script.
    #[serde(default)]
    pub start_column: u32,
    /// Last line of the script.
    #[serde(default)]
    pub end_line: u32,
    /// Last column of the script.
    #[serde(default)]
    pub end_column: u32,
    /// Execution context the script belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<i64>,
    /// Content hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Source map URL, if any.
    #[serde(
        default,
        rename = "sourceMapURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_map_url: Option<String>,
    /// Whether the script was produced by a live edit.
    #[serde(default)]
    pub is_live_edit: bool,
    /// Whether the URL came from a `sourceURL` comment.
    #[serde(default, rename = "hasSourceURL")]
    pub has_source_url: bool,
    /// Whether the script is an ES module.
    #[serde(default)]
    pub is_module: bool,
    /// Script length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
}

/// A position inside a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Script the location refers to.
    pub script_id: ScriptId,
    /// Zero-based line number.
    pub line_number: u32,
    /// Zero-based column number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,
}

/// A stack frame reported while paused.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// Frame identifier, valid while paused.
    pub call_frame_id: String,
    /// Name of the executing function.
    #[serde(default)]
    pub function_name: String,
    /// Current location in the frame.
    pub location: Location,
    /// Script URL, when reported.
    #[serde(default)]
    pub url: Option<String>,
    /// `this` object of the frame.
    #[serde(default)]
    pub this: Option<RemoteObject>,
}

/// Parameters of `Debugger.paused`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PausedEvent {
    /// Call stack at the pause point.
    #[serde(default)]
    pub call_frames: Vec<CallFrame>,
    /// Why execution paused (`other`, `exception`, ...).
    #[serde(default)]
    pub reason: String,
    /// Reason-specific data.
    #[serde(default)]
    pub data: Option<Value>,
    /// Breakpoints that were hit.
    #[serde(default)]
    pub hit_breakpoints: Vec<String>,
}

/// Result of `Debugger.setScriptSource`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScriptSourceResult {
    /// New call stack, when the edit happened while paused.
    #[serde(default)]
    pub call_frames: Option<Vec<CallFrame>>,
    /// Whether the stack was modified.
    #[serde(default)]
    pub stack_changed: Option<bool>,
    /// Compile error of the new source, if any.
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}

// ============================================================================
// Runtime
// ============================================================================

/// Mirror of a remote JavaScript value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    /// Object type (`object`, `number`, `string`, ...).
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object subtype hint (`array`, `null`, `node`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Class name for objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Primitive value or JSON representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Value that JSON cannot represent (`NaN`, `-0`, bigint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    /// String representation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Handle for non-primitive values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

/// Details of an exception thrown during evaluation or compilation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception identifier.
    #[serde(default)]
    pub exception_id: Option<i64>,
    /// Exception text.
    #[serde(default)]
    pub text: String,
    /// Line of the exception.
    #[serde(default)]
    pub line_number: Option<i64>,
    /// Column of the exception.
    #[serde(default)]
    pub column_number: Option<i64>,
    /// Script of the exception.
    #[serde(default)]
    pub script_id: Option<ScriptId>,
    /// URL of the exception.
    #[serde(default)]
    pub url: Option<String>,
    /// The thrown value.
    #[serde(default)]
    pub exception: Option<RemoteObject>,
}

/// Result of `Runtime.evaluate` and `Runtime.callFunctionOn`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    /// The evaluation result.
    pub result: RemoteObject,
    /// Set when the result is a thrown exception.
    #[serde(default)]
    pub was_thrown: bool,
    /// Exception details, when reported.
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}

impl EvaluateResult {
    /// Returns `true` if evaluation threw.
    #[inline]
    #[must_use]
    pub fn threw(&self) -> bool {
        self.was_thrown || self.exception_details.is_some()
    }
}

/// An object property, as returned by `Runtime.getProperties`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Property value, for data properties.
    #[serde(default)]
    pub value: Option<RemoteObject>,
    /// Whether the value may be changed.
    #[serde(default)]
    pub writable: Option<bool>,
    /// Getter, for accessor properties.
    #[serde(default)]
    pub get: Option<RemoteObject>,
    /// Setter, for accessor properties.
    #[serde(default)]
    pub set: Option<RemoteObject>,
    /// Whether the descriptor may be changed.
    #[serde(default)]
    pub configurable: bool,
    /// Whether the property shows up in enumeration.
    #[serde(default)]
    pub enumerable: bool,
    /// Set when reading the property threw.
    #[serde(default)]
    pub was_thrown: Option<bool>,
    /// Whether the property is owned by the object.
    #[serde(default)]
    pub is_own: Option<bool>,
}

/// Result of `Runtime.getProperties`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPropertiesResult {
    /// Object properties.
    pub result: Vec<PropertyDescriptor>,
    /// Exception details, when reading properties threw.
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}

/// An argument of `Runtime.callFunctionOn`.
///
/// Exactly one field should be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallArgument {
    /// Primitive value or serializable JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Value JSON cannot represent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    /// Handle of a remote object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

impl CallArgument {
    /// Creates an argument carrying a JSON value.
    #[inline]
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Creates an argument referring to a remote object.
    #[inline]
    #[must_use]
    pub fn object(object_id: RemoteObjectId) -> Self {
        Self {
            object_id: Some(object_id),
            ..Self::default()
        }
    }
}

// ============================================================================
// Console
// ============================================================================

/// A console message, as carried by `Console.messageAdded`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleMessage {
    /// Origin of the message (`console-api`, `network`, ...).
    #[serde(default)]
    pub source: String,
    /// Severity (`log`, `warning`, `error`, `debug`, `info`).
    #[serde(default)]
    pub level: String,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// URL of the message origin.
    #[serde(default)]
    pub url: Option<String>,
    /// Line in the origin resource.
    #[serde(default)]
    pub line: Option<u32>,
    /// Column in the origin resource.
    #[serde(default)]
    pub column: Option<u32>,
    /// Number of repetitions folded into this message.
    #[serde(default)]
    pub repeat_count: Option<u32>,
    /// Logged arguments.
    #[serde(default)]
    pub parameters: Vec<RemoteObject>,
}

// ============================================================================
// DOM
// ============================================================================

/// A DOM node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node identifier.
    pub node_id: NodeId,
    /// Parent node identifier.
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// DOM node type.
    pub node_type: i64,
    /// Node name.
    #[serde(default)]
    pub node_name: String,
    /// Local name.
    #[serde(default)]
    pub local_name: String,
    /// Node value.
    #[serde(default)]
    pub node_value: String,
    /// Number of children.
    #[serde(default)]
    pub child_node_count: Option<u32>,
    /// Children pushed along with the node.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Flattened `name, value` attribute pairs.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Document URL, for document nodes.
    #[serde(default, rename = "documentURL")]
    pub document_url: Option<String>,
}

impl Node {
    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .chunks_exact(2)
            .find(|pair| pair[0] == name)
            .map(|pair| pair[1].as_str())
    }
}

// ============================================================================
// CSS
// ============================================================================

/// Header of a style sheet, as carried by `CSS.styleSheetAdded`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSheetHeader {
    /// Style sheet identifier.
    pub style_sheet_id: StyleSheetId,
    /// Owning frame.
    #[serde(default)]
    pub frame_id: Option<String>,
    /// Style sheet URL.
    #[serde(default, rename = "sourceURL")]
    pub source_url: String,
    /// Origin (`regular`, `inspector`, `user-agent`, ...).
    #[serde(default)]
    pub origin: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Whether the sheet is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Whether the sheet comes from an inline `<style>`.
    #[serde(default)]
    pub is_inline: bool,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_script_metadata_defaults() {
        let meta: ScriptMetadata =
            serde_json::from_value(json!({ "scriptId": "17", "url": "file:///a.js" }))
                .expect("parse");
        assert_eq!(meta.script_id.as_str(), "17");
        assert_eq!(meta.url, "file:///a.js");
        assert_eq!(meta.start_line, 0);
        assert!(!meta.is_live_edit);
        assert!(meta.source_map_url.is_none());
    }

    #[test]
    fn test_script_metadata_wire_names() {
        let meta: ScriptMetadata = serde_json::from_value(json!({
            "scriptId": "3",
            "url": "app.js",
            "sourceMapURL": "app.js.map",
            "hasSourceURL": true,
            "executionContextId": 1
        }))
        .expect("parse");
        assert_eq!(meta.source_map_url.as_deref(), Some("app.js.map"));
        assert!(meta.has_source_url);
        assert_eq!(meta.execution_context_id, Some(1));
    }

    #[test]
    fn test_evaluate_result_threw() {
        let result: EvaluateResult = serde_json::from_value(json!({
            "result": { "type": "object", "subtype": "error", "description": "ReferenceError" },
            "wasThrown": true
        }))
        .expect("parse");
        assert!(result.threw());
        assert_eq!(result.result.object_type, "object");
        assert_eq!(result.result.subtype.as_deref(), Some("error"));
    }

    #[test]
    fn test_node_attribute_lookup() {
        let node: Node = serde_json::from_value(json!({
            "nodeId": 4,
            "nodeType": 1,
            "nodeName": "DIV",
            "attributes": ["id", "main", "class", "wide"]
        }))
        .expect("parse");
        assert_eq!(node.attribute("class"), Some("wide"));
        assert_eq!(node.attribute("style"), None);
    }

    #[test]
    fn test_call_argument_serialization() {
        let json = serde_json::to_value(CallArgument::value(5)).expect("serialize");
        assert_eq!(json, json!({ "value": 5 }));

        let json = serde_json::to_value(CallArgument::object(RemoteObjectId::new("obj-1")))
            .expect("serialize");
        assert_eq!(json, json!({ "objectId": "obj-1" }));
    }

    #[test]
    fn test_console_message_minimal() {
        let message: ConsoleMessage = serde_json::from_value(json!({
            "source": "console-api",
            "level": "log",
            "text": "hello"
        }))
        .expect("parse");
        assert_eq!(message.text, "hello");
        assert!(message.parameters.is_empty());
    }
}
