//! Runtime hooks for tool execution lifecycle events.
//!
//! ```rust
//! use wtooling::{NoopToolRuntimeHooks, ToolRuntimeHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = NoopToolRuntimeHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use crate::{ExecutionOutcome, ToolError, ToolExecutionContext};

pub trait ToolRuntimeHooks: Send + Sync {
    fn on_execution_start(&self, _tool_name: &str, _context: &ToolExecutionContext) {}

    /// Called for every dispatch that produced an outcome, whatever its status.
    fn on_execution_outcome(
        &self,
        _tool_name: &str,
        _context: &ToolExecutionContext,
        _outcome: &ExecutionOutcome,
        _elapsed: Duration,
    ) {
    }

    /// Called when the executor returns a distinguished error.
    fn on_execution_failure(
        &self,
        _tool_name: &str,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }

    /// A blocking body outlived its deadline and keeps its worker slot until
    /// it returns.
    fn on_worker_abandoned(&self, _tool_name: &str, _context: &ToolExecutionContext) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolRuntimeHooks;

impl ToolRuntimeHooks for NoopToolRuntimeHooks {}
