use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use wtooling::{ExecutionOutcome, ToolError, ToolExecutionContext, ToolRuntimeHooks};

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_name: &str, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_name, context)
        }));
    }

    fn on_execution_outcome(
        &self,
        tool_name: &str,
        context: &ToolExecutionContext,
        outcome: &ExecutionOutcome,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_outcome(tool_name, context, outcome, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_name, context, error, elapsed)
        }));
    }

    fn on_worker_abandoned(&self, tool_name: &str, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_worker_abandoned(tool_name, context)
        }));
    }
}
