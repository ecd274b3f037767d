use std::sync::Arc;
use std::time::Duration;

use wtooling::{ExecutionOutcome, ToolError, ToolExecutionContext, ToolRuntimeHooks};

/// Forwards every event to each inner hook, in insertion order.
#[derive(Clone, Default)]
pub struct FanoutToolHooks {
    hooks: Vec<Arc<dyn ToolRuntimeHooks>>,
}

impl FanoutToolHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: impl ToolRuntimeHooks + 'static) -> Self {
        self.hooks.push(Arc::new(hooks));
        self
    }

    pub fn with_shared(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ToolRuntimeHooks for FanoutToolHooks {
    fn on_execution_start(&self, tool_name: &str, context: &ToolExecutionContext) {
        for hooks in &self.hooks {
            hooks.on_execution_start(tool_name, context);
        }
    }

    fn on_execution_outcome(
        &self,
        tool_name: &str,
        context: &ToolExecutionContext,
        outcome: &ExecutionOutcome,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_execution_outcome(tool_name, context, outcome, elapsed);
        }
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_execution_failure(tool_name, context, error, elapsed);
        }
    }

    fn on_worker_abandoned(&self, tool_name: &str, context: &ToolExecutionContext) {
        for hooks in &self.hooks {
            hooks.on_worker_abandoned(tool_name, context);
        }
    }
}
