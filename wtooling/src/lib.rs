//! Tool registry, bounded executor and batch orchestrator.
//!
//! Tools are declared by a [`ToolContract`] and backed by a [`ToolHandler`].
//! The [`ToolRegistry`] owns them, the [`ToolExecutor`] runs one call under a
//! deadline, and the [`ToolOrchestrator`] turns a batch of model-issued calls
//! into uniformly shaped [`CallResult`]s.

mod args;
mod contract;
mod definition;
mod error;
mod executor;
mod handler;
mod hooks;
mod loader;
mod orchestrator;
mod registry;
mod task;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        CallRequest, CallResult, ExecuteOptions, ExecutionOutcome, ExecutorConfig,
        OutcomeStatus, RegisteredTool, ToolArguments, ToolContract, ToolError, ToolErrorKind,
        ToolExecutionContext, ToolExecutor, ToolHandler, ToolOrchestrator, ToolOutput,
        ToolRegistry, ToolResult,
    };
}

pub use args::{
    optional_string, parse_json_object, parse_json_value, required_f64, required_string,
    typed_arguments,
};
pub use contract::{ParameterSchema, ToolContract, is_valid_tool_name};
pub use definition::{DefinitionError, ToolDefinition};
pub use error::{ToolError, ToolErrorKind};
pub use executor::{ExecuteOptions, ExecutorConfig, MAX_WORKERS_ENV, TIMEOUT_ENV, ToolExecutor};
pub use handler::{HandlerResolver, HandlerTable, ToolHandler, ToolOutput, ToolResult};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use loader::{DefinitionFailure, LoadError, LoadOptions, LoadPolicy};
pub use orchestrator::{BatchMode, CallRequest, CallResult, ToolOrchestrator, format_results};
pub use registry::ToolRegistry;
pub use task::{BoundedTask, Settled, WorkerPool};
pub use tool::RegisteredTool;
pub use types::{
    ERROR_TYPE_KEY, EXECUTION_TIME_KEY, ExecutionOutcome, OutcomeStatus, TOOL_NAME_KEY,
    ToolArguments, ToolExecutionContext,
};
