//! Debugger domain: execution control, parsed scripts and live edit.
//!
//! Parsed scripts are tracked by the connection itself, so the registry
//! queries here never hit the wire. Call [`Debugger::enable`] first: the
//! remote end only reports scripts to an enabled debugger.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::identifiers::ScriptId;
use crate::protocol::{
    Command, DebuggerCommand, Event, ParsedEvent, PausedEvent, ScriptMetadata,
    SetScriptSourceResult,
};
use crate::transport::Connection;

use super::{DomainEvents, execute_as, execute_field};

// ============================================================================
// DebuggerEvent
// ============================================================================

/// Typed debugger events.
#[derive(Debug, Clone, PartialEq)]
pub enum DebuggerEvent {
    /// A script was compiled.
    ScriptParsed(ScriptMetadata),
    /// A script failed to compile.
    ScriptFailedToParse(ScriptMetadata),
    /// The execution context was reset; known scripts are gone.
    GlobalObjectCleared,
    /// Execution paused.
    Paused(PausedEvent),
    /// Execution resumed.
    Resumed,
}

// ============================================================================
// Debugger
// ============================================================================

/// Handle to the Debugger domain.
#[derive(Debug, Clone)]
pub struct Debugger {
    connection: Connection,
    enabled: Arc<AtomicBool>,
}

impl Debugger {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            connection,
            enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enables the debugger.
    ///
    /// The remote end reports every already-parsed script right after.
    pub async fn enable(&self) -> Result<()> {
        debug!("Enabling Debugger domain");
        self.execute(DebuggerCommand::Enable).await?;
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    /// Disables the debugger.
    pub async fn disable(&self) -> Result<()> {
        self.execute(DebuggerCommand::Disable).await?;
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }

    /// Returns `true` after a successful [`enable`](Self::enable).
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Pauses on the next statement.
    pub async fn pause(&self) -> Result<()> {
        self.execute(DebuggerCommand::Pause).await
    }

    /// Resumes execution.
    pub async fn resume(&self) -> Result<()> {
        self.execute(DebuggerCommand::Resume).await
    }

    /// Steps over the next statement.
    pub async fn step_over(&self) -> Result<()> {
        self.execute(DebuggerCommand::StepOver).await
    }

    /// Steps into the next function call.
    pub async fn step_into(&self) -> Result<()> {
        self.execute(DebuggerCommand::StepInto).await
    }

    /// Steps out of the current function.
    pub async fn step_out(&self) -> Result<()> {
        self.execute(DebuggerCommand::StepOut).await
    }

    /// Fetches the source text of a script.
    pub async fn get_script_source(&self, script_id: &ScriptId) -> Result<String> {
        execute_field(
            &self.connection,
            Command::Debugger(DebuggerCommand::GetScriptSource {
                script_id: script_id.clone(),
            }),
            "scriptSource",
        )
        .await
    }

    /// Replaces the source of a running script.
    ///
    /// A compile error in the new source comes back in
    /// [`SetScriptSourceResult::exception_details`], not as an error.
    pub async fn set_script_source(
        &self,
        script_id: &ScriptId,
        source: impl Into<String>,
    ) -> Result<SetScriptSourceResult> {
        self.set_source(script_id, source.into(), None).await
    }

    /// Checks a source replacement without applying it.
    pub async fn check_script_source(
        &self,
        script_id: &ScriptId,
        source: impl Into<String>,
    ) -> Result<SetScriptSourceResult> {
        self.set_source(script_id, source.into(), Some(true)).await
    }

    /// Asks whether the remote end supports live edit.
    pub async fn can_set_script_source(&self) -> Result<bool> {
        execute_field(
            &self.connection,
            Command::Debugger(DebuggerCommand::CanSetScriptSource),
            "result",
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Script registry
    // ------------------------------------------------------------------------

    /// Returns every known script, in parse order.
    #[must_use]
    pub fn scripts(&self) -> Vec<Arc<ScriptMetadata>> {
        self.connection.scripts().scripts()
    }

    /// Looks up a script by exact URL.
    #[must_use]
    pub fn script_by_url(&self, url: &str) -> Option<Arc<ScriptMetadata>> {
        self.connection.scripts().by_url(url)
    }

    /// Looks up a script by id.
    #[must_use]
    pub fn script_by_id(&self, script_id: &ScriptId) -> Option<Arc<ScriptMetadata>> {
        self.connection.scripts().by_id(script_id)
    }

    /// Returns every script whose URL ends in the file name `name`.
    #[must_use]
    pub fn scripts_by_basename(&self, name: &str) -> Vec<Arc<ScriptMetadata>> {
        self.connection.scripts().by_basename(name)
    }

    /// Replaces the source of the script loaded from `url`.
    ///
    /// # Errors
    ///
    /// [`Error::ScriptNotFound`] if no script with that URL was parsed.
    pub async fn set_script_source_by_url(
        &self,
        url: &str,
        source: impl Into<String>,
    ) -> Result<SetScriptSourceResult> {
        let script = self
            .script_by_url(url)
            .ok_or_else(|| Error::script_not_found(url))?;

        self.set_script_source(&script.script_id, source).await
    }

    /// Replaces the source of the one script whose file name is `name`.
    ///
    /// # Errors
    ///
    /// - [`Error::ScriptNotFound`] if no script has that file name
    /// - [`Error::AmbiguousScript`] if several do
    pub async fn set_script_source_by_basename(
        &self,
        name: &str,
        source: impl Into<String>,
    ) -> Result<SetScriptSourceResult> {
        let mut matches = self.scripts_by_basename(name);
        let script = match matches.len() {
            0 => return Err(Error::script_not_found(name)),
            1 => matches.remove(0),
            count => return Err(Error::ambiguous_script(name, count)),
        };

        self.set_script_source(&script.script_id, source).await
    }

    /// Returns a new stream of debugger events.
    pub fn events(&self) -> DomainEvents<DebuggerEvent> {
        DomainEvents::new(self.connection.subscribe_domain("Debugger"), debugger_event)
    }

    async fn set_source(
        &self,
        script_id: &ScriptId,
        script_source: String,
        dry_run: Option<bool>,
    ) -> Result<SetScriptSourceResult> {
        info!(%script_id, len = script_source.len(), dry_run = dry_run.unwrap_or(false), "Setting script source");

        execute_as(
            &self.connection,
            Command::Debugger(DebuggerCommand::SetScriptSource {
                script_id: script_id.clone(),
                script_source,
                dry_run,
            }),
        )
        .await
    }

    async fn execute(&self, command: DebuggerCommand) -> Result<()> {
        self.connection.execute(Command::Debugger(command)).await?;
        Ok(())
    }
}

fn debugger_event(event: Event) -> Option<DebuggerEvent> {
    match event.parse() {
        ParsedEvent::DebuggerScriptParsed(meta) => Some(DebuggerEvent::ScriptParsed(meta)),
        ParsedEvent::DebuggerScriptFailedToParse(meta) => {
            Some(DebuggerEvent::ScriptFailedToParse(meta))
        }
        ParsedEvent::DebuggerGlobalObjectCleared => Some(DebuggerEvent::GlobalObjectCleared),
        ParsedEvent::DebuggerPaused(paused) => Some(DebuggerEvent::Paused(paused)),
        ParsedEvent::DebuggerResumed => Some(DebuggerEvent::Resumed),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
