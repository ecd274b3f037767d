//! Tracing-based observability hooks for the tool runtime.
//!
//! ```rust
//! use wobserve::TracingObservabilityHooks;
//! use wtooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use wtooling::{ExecutionOutcome, OutcomeStatus, ToolError, ToolExecutionContext, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_name: &str, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name,
            tool_call_id = context.call_id.as_deref(),
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_execution_outcome(
        &self,
        tool_name: &str,
        context: &ToolExecutionContext,
        outcome: &ExecutionOutcome,
        elapsed: Duration,
    ) {
        match outcome.status {
            OutcomeStatus::Success => tracing::info!(
                phase = "tool",
                event = "execution_success",
                tool_name,
                tool_call_id = context.call_id.as_deref(),
                trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
                elapsed_ms = elapsed.as_millis() as u64
            ),
            status => tracing::warn!(
                phase = "tool",
                event = "execution_outcome",
                tool_name,
                tool_call_id = context.call_id.as_deref(),
                trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
                elapsed_ms = elapsed.as_millis() as u64,
                status = ?status,
                error_type = outcome.error_type(),
                error = outcome.error_message.as_deref()
            ),
        }
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name,
            tool_call_id = context.call_id.as_deref(),
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.is_retryable(),
            error = %error
        );
    }

    fn on_worker_abandoned(&self, tool_name: &str, context: &ToolExecutionContext) {
        tracing::warn!(
            phase = "tool",
            event = "worker_abandoned",
            tool_name,
            tool_call_id = context.call_id.as_deref(),
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }
}
