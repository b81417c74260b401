//! Runtime domain: evaluation and remote object handles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::Result;
use crate::identifiers::RemoteObjectId;
use crate::protocol::{
    CallFunctionOnParams, Command, EvaluateOptions, EvaluateParams, EvaluateResult,
    GetPropertiesOptions, GetPropertiesParams, GetPropertiesResult, RuntimeCommand,
};
use crate::transport::Connection;

use super::execute_as;

// ============================================================================
// Runtime
// ============================================================================

/// Handle to the Runtime domain.
#[derive(Debug, Clone)]
pub struct Runtime {
    connection: Connection,
    enabled: Arc<AtomicBool>,
}

impl Runtime {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            connection,
            enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enables execution context reporting.
    pub async fn enable(&self) -> Result<()> {
        self.execute(RuntimeCommand::Enable).await?;
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    /// Disables execution context reporting.
    pub async fn disable(&self) -> Result<()> {
        self.execute(RuntimeCommand::Disable).await?;
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }

    /// Returns `true` after a successful [`enable`](Self::enable).
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Evaluates an expression in the global context.
    ///
    /// An exception thrown by the expression is a successful response:
    /// check [`EvaluateResult::threw`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// let options = EvaluateOptions::new().with_return_by_value();
    /// let result = runtime.evaluate("document.title", options).await?;
    /// println!("{:?}", result.result.value);
    /// ```
    pub async fn evaluate(
        &self,
        expression: impl Into<String>,
        options: EvaluateOptions,
    ) -> Result<EvaluateResult> {
        let expression = expression.into();
        debug!(len = expression.len(), "Evaluating expression");

        execute_as(
            &self.connection,
            Command::Runtime(RuntimeCommand::Evaluate(EvaluateParams {
                expression,
                options,
            })),
        )
        .await
    }

    /// Calls a function with an optional `this` object and arguments.
    pub async fn call_function_on(&self, params: CallFunctionOnParams) -> Result<EvaluateResult> {
        execute_as(
            &self.connection,
            Command::Runtime(RuntimeCommand::CallFunctionOn(params)),
        )
        .await
    }

    /// Lists the properties of a remote object.
    pub async fn get_properties(
        &self,
        object_id: &RemoteObjectId,
        options: GetPropertiesOptions,
    ) -> Result<GetPropertiesResult> {
        execute_as(
            &self.connection,
            Command::Runtime(RuntimeCommand::GetProperties(GetPropertiesParams {
                object_id: object_id.clone(),
                options,
            })),
        )
        .await
    }

    /// Releases a remote object handle.
    pub async fn release_object(&self, object_id: &RemoteObjectId) -> Result<()> {
        self.execute(RuntimeCommand::ReleaseObject {
            object_id: object_id.clone(),
        })
        .await
    }

    /// Releases every handle in an object group.
    pub async fn release_object_group(&self, object_group: impl Into<String>) -> Result<()> {
        self.execute(RuntimeCommand::ReleaseObjectGroup {
            object_group: object_group.into(),
        })
        .await
    }

    async fn execute(&self, command: RuntimeCommand) -> Result<()> {
        self.connection.execute(Command::Runtime(command)).await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
