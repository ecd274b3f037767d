//! Deadline-bounded tool executor.
//!
//! Blocking bodies run on a fixed-size [`WorkerPool`]; async bodies are
//! awaited on the caller's runtime. Either way the dispatch is raced against
//! the effective timeout and normalized into an [`ExecutionOutcome`].
//!
//! ```rust
//! use serde_json::json;
//! use wtooling::{ExecutorConfig, RegisteredTool, ToolContract, ToolExecutor, ToolHandler, ToolOutput};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let tool = RegisteredTool::new(
//!     ToolContract::new("add", "Add two numbers", json!({
//!         "type": "object",
//!         "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
//!         "required": ["a", "b"]
//!     })),
//!     ToolHandler::sync(|args, _ctx| {
//!         let sum = args["a"].as_f64().unwrap_or_default() + args["b"].as_f64().unwrap_or_default();
//!         Ok(ToolOutput::from(json!(sum)))
//!     }),
//! )
//! .expect("tool should build");
//!
//! let executor = ToolExecutor::new(ExecutorConfig::default());
//! let arguments = json!({"a": 2, "b": 3}).as_object().cloned().unwrap_or_default();
//! let outcome = executor
//!     .execute(&tool, arguments)
//!     .await
//!     .expect("execution should succeed");
//!
//! assert_eq!(outcome.payload, Some(json!(5.0)));
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::task::{BoundedTask, Settled, WorkerPool};
use crate::{
    ERROR_TYPE_KEY, ExecutionOutcome, NoopToolRuntimeHooks, RegisteredTool, ToolArguments,
    ToolError, ToolExecutionContext, ToolHandler, ToolOutput, ToolRuntimeHooks,
};

pub const TIMEOUT_ENV: &str = "WINDLASS_TOOL_TIMEOUT_SECS";
pub const MAX_WORKERS_ENV: &str = "WINDLASS_TOOL_MAX_WORKERS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Applied when neither the call nor the contract names a timeout.
    pub default_timeout: Duration,
    pub max_workers: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(60),
            max_workers: 4,
        }
    }
}

impl ExecutorConfig {
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Defaults overridden by `WINDLASS_TOOL_TIMEOUT_SECS` and
    /// `WINDLASS_TOOL_MAX_WORKERS`. Unparseable or non-positive values are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let parsed = raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok());
            match parsed {
                Some(timeout) if !timeout.is_zero() => config.default_timeout = timeout,
                _ => tracing::warn!(variable = TIMEOUT_ENV, value = raw.as_str(), "ignoring invalid timeout"),
            }
        }

        if let Some(raw) = lookup(MAX_WORKERS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(workers) if workers > 0 => config.max_workers = workers,
                _ => tracing::warn!(variable = MAX_WORKERS_ENV, value = raw.as_str(), "ignoring invalid worker count"),
            }
        }

        config
    }
}

#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Overrides both the contract's timeout and the executor default.
    pub timeout: Option<Duration>,
    pub validate: bool,
    pub context: ToolExecutionContext,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            validate: true,
            context: ToolExecutionContext::new(),
        }
    }
}

impl ExecuteOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    pub fn with_context(mut self, context: ToolExecutionContext) -> Self {
        self.context = context;
        self
    }
}

pub struct ToolExecutor {
    config: ExecutorConfig,
    pool: WorkerPool,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl ToolExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            pool: WorkerPool::new(config.max_workers),
            config,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn available_workers(&self) -> usize {
        self.pool.available()
    }

    /// Stops accepting blocking work. Bodies already running finish on their
    /// own; later blocking dispatches settle as error outcomes.
    pub fn shutdown(&self) {
        tracing::debug!(max_workers = self.pool.size(), "shutting down tool worker pool");
        self.pool.close();
    }

    pub fn is_shut_down(&self) -> bool {
        self.pool.is_closed()
    }

    pub fn effective_timeout(&self, tool: &RegisteredTool, requested: Option<Duration>) -> Duration {
        requested
            .or(tool.contract().timeout)
            .unwrap_or(self.config.default_timeout)
    }

    pub async fn execute(
        &self,
        tool: &RegisteredTool,
        arguments: ToolArguments,
    ) -> Result<ExecutionOutcome, ToolError> {
        self.execute_with(tool, arguments, ExecuteOptions::default())
            .await
    }

    /// Runs one dispatch.
    ///
    /// Validation failures and timeouts are returned as errors, as are any
    /// distinguished errors the body raises itself. Every other failure is
    /// contained in an error outcome.
    pub async fn execute_with(
        &self,
        tool: &RegisteredTool,
        arguments: ToolArguments,
        options: ExecuteOptions,
    ) -> Result<ExecutionOutcome, ToolError> {
        let started = Instant::now();
        let name = tool.name();
        self.hooks.on_execution_start(name, &options.context);

        let result = self.dispatch(tool, arguments, &options, started).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(outcome) => self
                .hooks
                .on_execution_outcome(name, &options.context, outcome, elapsed),
            Err(error) => self
                .hooks
                .on_execution_failure(name, &options.context, error, elapsed),
        }

        result.map_err(|error| match &options.context.call_id {
            Some(call_id) if error.tool_call_id.is_none() => error.with_tool_call_id(call_id),
            _ => error,
        })
    }

    async fn dispatch(
        &self,
        tool: &RegisteredTool,
        arguments: ToolArguments,
        options: &ExecuteOptions,
        started: Instant,
    ) -> Result<ExecutionOutcome, ToolError> {
        let name = tool.name();
        if options.validate {
            tool.validate_arguments(&arguments)?;
        }

        let deadline = self.effective_timeout(tool, options.timeout);
        let (context, cancel) = options.context.for_dispatch();

        let task = match tool.handler() {
            ToolHandler::Async(body) => {
                let body = Arc::clone(body);
                BoundedTask::awaiting(async move { body(arguments, context).await }, cancel)
            }
            ToolHandler::Sync(body) => {
                let body = Arc::clone(body);
                let tool_name = name.to_string();
                self.pool.submit(
                    move || {
                        if context.is_cancelled() {
                            return Err(ToolError::execution(format!(
                                "tool '{tool_name}' was cancelled before it started"
                            ))
                            .with_error_type("Cancelled"));
                        }
                        body(arguments, context)
                    },
                    cancel,
                )
            }
        };

        let settled = task.settle(deadline, options.context.cancellation()).await;
        let elapsed = started.elapsed();

        match settled {
            Settled::Completed(Ok(output)) => Ok(normalize(output, elapsed, name)),
            Settled::Completed(Err(error)) if error.is_distinguished() => {
                Err(error.with_tool_name(name))
            }
            Settled::Completed(Err(error)) => Ok(contain(&error, elapsed, name)),
            Settled::TimedOut => {
                if !tool.is_async() {
                    self.hooks.on_worker_abandoned(name, &options.context);
                }
                Err(ToolError::timeout(format!(
                    "tool '{name}' exceeded timeout of {:.2}s (ran for {:.2}s)",
                    deadline.as_secs_f64(),
                    elapsed.as_secs_f64()
                ))
                .with_tool_name(name)
                .with_elapsed(elapsed))
            }
            Settled::Cancelled => {
                let mut outcome = ExecutionOutcome::cancelled(format!(
                    "tool '{name}' was cancelled after {:.2}s",
                    elapsed.as_secs_f64()
                ));
                outcome.stamp(elapsed, name);
                Ok(outcome)
            }
        }
    }
}

fn normalize(output: ToolOutput, elapsed: Duration, name: &str) -> ExecutionOutcome {
    let mut outcome = match output {
        ToolOutput::Value(value) => ExecutionOutcome::success(value),
        ToolOutput::Outcome(outcome) => outcome,
    };
    outcome.stamp(elapsed, name);
    outcome
}

fn contain(error: &ToolError, elapsed: Duration, name: &str) -> ExecutionOutcome {
    let error_type = error.type_label();
    let mut outcome = ExecutionOutcome::error(format!(
        "tool '{name}' execution failed: {error_type}: {}",
        error.message
    ))
    .with_metadata(ERROR_TYPE_KEY, error_type);
    outcome.stamp(elapsed, name);
    outcome
}
