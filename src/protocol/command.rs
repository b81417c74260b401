//! Command definitions organized by domain.
//!
//! Commands follow the `Domain.action` naming of the protocol.
//!
//! # Command Domains
//!
//! | Domain | Commands |
//! |--------|----------|
//! | `Console` | enable, disable, clear |
//! | `Debugger` | enable, pause/resume/step, script source |
//! | `Runtime` | evaluate, call function, properties, release |
//! | `DOM` | document, query selector, node value, attributes |
//! | `CSS` | style sheet text |
//!
//! Optional arguments are explicit option structs ([`EvaluateOptions`],
//! [`GetPropertiesOptions`], [`CallFunctionOnParams`]) whose unset fields are
//! omitted from the wire.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::identifiers::{NodeId, RemoteObjectId, ScriptId, StyleSheetId};

use super::types::CallArgument;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All typed protocol commands organized by domain.
///
/// This enum wraps domain-specific command enums for unified serialization.
/// Each serializes to `{"method": ..., "params": ...}`; commands without
/// parameters omit `params`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Console domain commands.
    Console(ConsoleCommand),
    /// Debugger domain commands.
    Debugger(DebuggerCommand),
    /// Runtime domain commands.
    Runtime(RuntimeCommand),
    /// DOM domain commands.
    Dom(DomCommand),
    /// CSS domain commands.
    Css(CssCommand),
}

// ============================================================================
// Console Commands
// ============================================================================

/// Console domain commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum ConsoleCommand {
    /// Start reporting console messages.
    #[serde(rename = "Console.enable")]
    Enable,

    /// Stop reporting console messages.
    #[serde(rename = "Console.disable")]
    Disable,

    /// Clear collected messages.
    #[serde(rename = "Console.clearMessages")]
    ClearMessages,
}

// ============================================================================
// Debugger Commands
// ============================================================================

/// Debugger domain commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum DebuggerCommand {
    /// Enable the debugger; parsed scripts are reported afterwards.
    #[serde(rename = "Debugger.enable")]
    Enable,

    /// Disable the debugger.
    #[serde(rename = "Debugger.disable")]
    Disable,

    /// Pause on the next statement.
    #[serde(rename = "Debugger.pause")]
    Pause,

    /// Resume execution.
    #[serde(rename = "Debugger.resume")]
    Resume,

    /// Step over the next statement.
    #[serde(rename = "Debugger.stepOver")]
    StepOver,

    /// Step into the next function call.
    #[serde(rename = "Debugger.stepInto")]
    StepInto,

    /// Step out of the current function.
    #[serde(rename = "Debugger.stepOut")]
    StepOut,

    /// Fetch the source of a script.
    #[serde(rename = "Debugger.getScriptSource")]
    GetScriptSource {
        /// Script to fetch.
        #[serde(rename = "scriptId")]
        script_id: ScriptId,
    },

    /// Replace the source of a script (live edit).
    #[serde(rename = "Debugger.setScriptSource")]
    SetScriptSource {
        /// Script to edit.
        #[serde(rename = "scriptId")]
        script_id: ScriptId,
        /// New source text.
        #[serde(rename = "scriptSource")]
        script_source: String,
        /// Only check the edit, do not apply it.
        #[serde(rename = "dryRun", skip_serializing_if = "Option::is_none")]
        dry_run: Option<bool>,
    },

    /// Ask whether live edit is supported.
    #[serde(rename = "Debugger.canSetScriptSource")]
    CanSetScriptSource,
}

// ============================================================================
// Runtime Commands
// ============================================================================

/// Runtime domain commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum RuntimeCommand {
    /// Start reporting execution contexts.
    #[serde(rename = "Runtime.enable")]
    Enable,

    /// Stop reporting execution contexts.
    #[serde(rename = "Runtime.disable")]
    Disable,

    /// Evaluate an expression in the global object.
    #[serde(rename = "Runtime.evaluate")]
    Evaluate(EvaluateParams),

    /// Call a function with a given `this` object.
    #[serde(rename = "Runtime.callFunctionOn")]
    CallFunctionOn(CallFunctionOnParams),

    /// List the properties of an object.
    #[serde(rename = "Runtime.getProperties")]
    GetProperties(GetPropertiesParams),

    /// Release a remote object handle.
    #[serde(rename = "Runtime.releaseObject")]
    ReleaseObject {
        /// Handle to release.
        #[serde(rename = "objectId")]
        object_id: RemoteObjectId,
    },

    /// Release every handle of an object group.
    #[serde(rename = "Runtime.releaseObjectGroup")]
    ReleaseObjectGroup {
        /// Group to release.
        #[serde(rename = "objectGroup")]
        object_group: String,
    },
}

/// Options of `Runtime.evaluate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateOptions {
    /// Group the result handle belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_group: Option<String>,
    /// Expose the command line API (`$0`, `$x`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_command_line_api: Option<bool>,
    /// Do not pause on exceptions and mute console output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Execution context to evaluate in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<i64>,
    /// Return the result as JSON value instead of a handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Generate a preview for object results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_preview: Option<bool>,
    /// Treat the evaluation as a user gesture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_gesture: Option<bool>,
    /// Await a promise result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
}

impl EvaluateOptions {
    /// Creates empty options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the object group.
    #[inline]
    #[must_use]
    pub fn with_object_group(mut self, group: impl Into<String>) -> Self {
        self.object_group = Some(group.into());
        self
    }

    /// Exposes the command line API.
    #[inline]
    #[must_use]
    pub fn with_command_line_api(mut self) -> Self {
        self.include_command_line_api = Some(true);
        self
    }

    /// Evaluates silently.
    #[inline]
    #[must_use]
    pub fn with_silent(mut self) -> Self {
        self.silent = Some(true);
        self
    }

    /// Evaluates in a specific execution context.
    #[inline]
    #[must_use]
    pub fn with_context_id(mut self, context_id: i64) -> Self {
        self.context_id = Some(context_id);
        self
    }

    /// Returns the result by value.
    #[inline]
    #[must_use]
    pub fn with_return_by_value(mut self) -> Self {
        self.return_by_value = Some(true);
        self
    }

    /// Generates an object preview.
    #[inline]
    #[must_use]
    pub fn with_preview(mut self) -> Self {
        self.generate_preview = Some(true);
        self
    }

    /// Treats the evaluation as a user gesture.
    #[inline]
    #[must_use]
    pub fn with_user_gesture(mut self) -> Self {
        self.user_gesture = Some(true);
        self
    }

    /// Awaits a promise result.
    #[inline]
    #[must_use]
    pub fn with_await_promise(mut self) -> Self {
        self.await_promise = Some(true);
        self
    }
}

/// Parameters of `Runtime.evaluate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluateParams {
    /// Expression to evaluate.
    pub expression: String,
    /// Optional arguments.
    #[serde(flatten)]
    pub options: EvaluateOptions,
}

/// Parameters of `Runtime.callFunctionOn`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnParams {
    /// Source of the function to call.
    pub function_declaration: String,
    /// `this` object of the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
    /// Call arguments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<CallArgument>,
    /// Do not pause on exceptions and mute console output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Return the result as JSON value instead of a handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Await a promise result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
    /// Execution context, when no `this` object is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<i64>,
    /// Group the result handle belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_group: Option<String>,
}

impl CallFunctionOnParams {
    /// Creates parameters for calling `function_declaration`.
    #[must_use]
    pub fn new(function_declaration: impl Into<String>) -> Self {
        Self {
            function_declaration: function_declaration.into(),
            object_id: None,
            arguments: Vec::new(),
            silent: None,
            return_by_value: None,
            await_promise: None,
            execution_context_id: None,
            object_group: None,
        }
    }

    /// Sets the `this` object.
    #[inline]
    #[must_use]
    pub fn on(mut self, object_id: RemoteObjectId) -> Self {
        self.object_id = Some(object_id);
        self
    }

    /// Appends an argument.
    #[inline]
    #[must_use]
    pub fn with_argument(mut self, argument: CallArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Returns the result by value.
    #[inline]
    #[must_use]
    pub fn with_return_by_value(mut self) -> Self {
        self.return_by_value = Some(true);
        self
    }

    /// Awaits a promise result.
    #[inline]
    #[must_use]
    pub fn with_await_promise(mut self) -> Self {
        self.await_promise = Some(true);
        self
    }

    /// Calls silently.
    #[inline]
    #[must_use]
    pub fn with_silent(mut self) -> Self {
        self.silent = Some(true);
        self
    }

    /// Calls in a specific execution context.
    #[inline]
    #[must_use]
    pub fn with_context_id(mut self, context_id: i64) -> Self {
        self.execution_context_id = Some(context_id);
        self
    }

    /// Sets the object group.
    #[inline]
    #[must_use]
    pub fn with_object_group(mut self, group: impl Into<String>) -> Self {
        self.object_group = Some(group.into());
        self
    }
}

/// Options of `Runtime.getProperties`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPropertiesOptions {
    /// Only own properties, not the prototype chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_properties: Option<bool>,
    /// Only accessor properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessor_properties_only: Option<bool>,
    /// Generate previews for property values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_preview: Option<bool>,
}

impl GetPropertiesOptions {
    /// Restricts the listing to own properties.
    #[inline]
    #[must_use]
    pub fn own() -> Self {
        Self {
            own_properties: Some(true),
            ..Self::default()
        }
    }

    /// Restricts the listing to accessor properties.
    #[inline]
    #[must_use]
    pub fn with_accessors_only(mut self) -> Self {
        self.accessor_properties_only = Some(true);
        self
    }

    /// Generates value previews.
    #[inline]
    #[must_use]
    pub fn with_preview(mut self) -> Self {
        self.generate_preview = Some(true);
        self
    }
}

/// Parameters of `Runtime.getProperties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetPropertiesParams {
    /// Object whose properties to list.
    #[serde(rename = "objectId")]
    pub object_id: RemoteObjectId,
    /// Optional arguments.
    #[serde(flatten)]
    pub options: GetPropertiesOptions,
}

// ============================================================================
// DOM Commands
// ============================================================================

/// DOM domain commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum DomCommand {
    /// Enable DOM events.
    #[serde(rename = "DOM.enable")]
    Enable,

    /// Disable DOM events.
    #[serde(rename = "DOM.disable")]
    Disable,

    /// Fetch the root document node.
    #[serde(rename = "DOM.getDocument")]
    GetDocument {
        /// Maximum subtree depth to return (`-1` for the whole tree).
        #[serde(skip_serializing_if = "Option::is_none")]
        depth: Option<i32>,
    },

    /// Find the first node matching a selector.
    #[serde(rename = "DOM.querySelector")]
    QuerySelector {
        /// Node to search under.
        #[serde(rename = "nodeId")]
        node_id: NodeId,
        /// CSS selector.
        selector: String,
    },

    /// Find every node matching a selector.
    #[serde(rename = "DOM.querySelectorAll")]
    QuerySelectorAll {
        /// Node to search under.
        #[serde(rename = "nodeId")]
        node_id: NodeId,
        /// CSS selector.
        selector: String,
    },

    /// Set the value of a text or comment node.
    #[serde(rename = "DOM.setNodeValue")]
    SetNodeValue {
        /// Node to change.
        #[serde(rename = "nodeId")]
        node_id: NodeId,
        /// New value.
        value: String,
    },

    /// Set an attribute of an element.
    #[serde(rename = "DOM.setAttributeValue")]
    SetAttributeValue {
        /// Element to change.
        #[serde(rename = "nodeId")]
        node_id: NodeId,
        /// Attribute name.
        name: String,
        /// Attribute value.
        value: String,
    },
}

// ============================================================================
// CSS Commands
// ============================================================================

/// CSS domain commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum CssCommand {
    /// Enable style sheet tracking. Requires the DOM domain.
    #[serde(rename = "CSS.enable")]
    Enable,

    /// Disable style sheet tracking.
    #[serde(rename = "CSS.disable")]
    Disable,

    /// Fetch the text of a style sheet.
    #[serde(rename = "CSS.getStyleSheetText")]
    GetStyleSheetText {
        /// Style sheet to read.
        #[serde(rename = "styleSheetId")]
        style_sheet_id: StyleSheetId,
    },

    /// Replace the text of a style sheet.
    #[serde(rename = "CSS.setStyleSheetText")]
    SetStyleSheetText {
        /// Style sheet to replace.
        #[serde(rename = "styleSheetId")]
        style_sheet_id: StyleSheetId,
        /// New text.
        text: String,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    fn to_json(command: Command) -> Value {
        serde_json::to_value(command).expect("serialize")
    }

    #[test]
    fn test_unit_command_has_no_params() {
        let json = to_json(Command::Console(ConsoleCommand::Enable));
        assert_eq!(json, json!({ "method": "Console.enable" }));
    }

    #[test]
    fn test_set_script_source_params() {
        let json = to_json(Command::Debugger(DebuggerCommand::SetScriptSource {
            script_id: ScriptId::new("31"),
            script_source: "var x = 2;".to_string(),
            dry_run: None,
        }));
        assert_eq!(
            json,
            json!({
                "method": "Debugger.setScriptSource",
                "params": { "scriptId": "31", "scriptSource": "var x = 2;" }
            })
        );
    }

    #[test]
    fn test_evaluate_flattens_options() {
        let json = to_json(Command::Runtime(RuntimeCommand::Evaluate(EvaluateParams {
            expression: "1 + 1".to_string(),
            options: EvaluateOptions::new().with_return_by_value().with_object_group("repl"),
        })));
        assert_eq!(
            json,
            json!({
                "method": "Runtime.evaluate",
                "params": {
                    "expression": "1 + 1",
                    "returnByValue": true,
                    "objectGroup": "repl"
                }
            })
        );
    }

    #[test]
    fn test_call_function_on_omits_unset() {
        let params = CallFunctionOnParams::new("function() { return this; }")
            .on(RemoteObjectId::new("obj-9"))
            .with_argument(CallArgument::value(3));
        let json = to_json(Command::Runtime(RuntimeCommand::CallFunctionOn(params)));
        assert_eq!(
            json["params"],
            json!({
                "functionDeclaration": "function() { return this; }",
                "objectId": "obj-9",
                "arguments": [{ "value": 3 }]
            })
        );
    }

    #[test]
    fn test_get_properties_own() {
        let json = to_json(Command::Runtime(RuntimeCommand::GetProperties(
            GetPropertiesParams {
                object_id: RemoteObjectId::new("obj-1"),
                options: GetPropertiesOptions::own(),
            },
        )));
        assert_eq!(
            json["params"],
            json!({ "objectId": "obj-1", "ownProperties": true })
        );
    }

    #[test]
    fn test_dom_set_node_value_uses_value_key() {
        let json = to_json(Command::Dom(DomCommand::SetNodeValue {
            node_id: NodeId::new(12),
            value: "text".to_string(),
        }));
        assert_eq!(json["method"], "DOM.setNodeValue");
        assert_eq!(json["params"], json!({ "nodeId": 12, "value": "text" }));
    }

    #[test]
    fn test_css_set_style_sheet_text() {
        let json = to_json(Command::Css(CssCommand::SetStyleSheetText {
            style_sheet_id: StyleSheetId::new("7.0"),
            text: "body { color: red }".to_string(),
        }));
        assert_eq!(json["method"], "CSS.setStyleSheetText");
        assert_eq!(json["params"]["styleSheetId"], "7.0");
    }
}
