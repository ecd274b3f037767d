//! Metrics-based observability hooks for the tool runtime.
//!
//! ```rust
//! use wobserve::MetricsObservabilityHooks;
//! use wtooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use wtooling::{ExecutionOutcome, OutcomeStatus, ToolError, ToolExecutionContext, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

fn status_label(status: OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Success => "success",
        OutcomeStatus::Error => "error",
        OutcomeStatus::Timeout => "timeout",
        OutcomeStatus::Cancelled => "cancelled",
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_name: &str, _context: &ToolExecutionContext) {
        metrics::counter!(
            "windlass_tool_execution_start_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }

    fn on_execution_outcome(
        &self,
        tool_name: &str,
        _context: &ToolExecutionContext,
        outcome: &ExecutionOutcome,
        elapsed: Duration,
    ) {
        let status = status_label(outcome.status);
        metrics::counter!(
            "windlass_tool_execution_outcome_total",
            "tool_name" => tool_name.to_string(),
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            "windlass_tool_execution_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => status
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "windlass_tool_execution_failure_total",
            "tool_name" => tool_name.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "windlass_tool_execution_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_worker_abandoned(&self, tool_name: &str, _context: &ToolExecutionContext) {
        metrics::counter!(
            "windlass_tool_worker_abandoned_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }
}
