//! Protocol message types.
//!
//! This module defines the JSON envelopes exchanged with the remote end and
//! the typed payloads of the supported domains.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Remote | `{id, method, params}` |
//! | `Response` | Remote → Local | `{id, result}` or `{id, error}` |
//! | `Event` | Remote → Local | `{method, params}`, no `id` |
//!
//! # Method Naming
//!
//! Methods follow `Domain.action` format:
//!
//! - `Debugger.setScriptSource`
//! - `Runtime.evaluate`
//! - `Console.messageAdded` (event)
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Typed commands by domain |
//! | `event` | Event envelope and typed events |
//! | `incoming` | Inbound message classification |
//! | `request` | Request and Response envelopes |
//! | `types` | Shared payload types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by domain.
pub mod command;

/// Event message types.
pub mod event;

/// Inbound message classification.
pub mod incoming;

/// Request and Response message types.
pub mod request;

/// Payload types shared by commands, responses and events.
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{
    CallFunctionOnParams, Command, ConsoleCommand, CssCommand, DebuggerCommand, DomCommand,
    EvaluateOptions, EvaluateParams, GetPropertiesOptions, GetPropertiesParams, RuntimeCommand,
};
pub use event::{Event, ParsedEvent};
pub use incoming::Incoming;
pub use request::{Request, Response, ResponseError};
pub use types::{
    CallArgument, CallFrame, ConsoleMessage, EvaluateResult, ExceptionDetails,
    GetPropertiesResult, Location, Node, PausedEvent, PropertyDescriptor, RemoteObject,
    ScriptMetadata, SetScriptSourceResult, StyleSheetHeader,
};
