//! Common imports for most windlass applications.

pub use crate::{
    arguments, build_tooling, build_tooling_from_env, build_tooling_with, call, default_registry,
    init_tracing, object_schema, observability_hooks,
};
pub use crate::{
    BatchMode, CallRequest, CallResult, ExecuteOptions, ExecutionOutcome, ExecutorConfig,
    HandlerTable, LoadOptions, LoadPolicy, OutcomeStatus, RegisteredTool, ToolArguments,
    ToolContract, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutor, ToolHandler,
    ToolOrchestrator, ToolOutput, ToolRegistry, ToolResult, ToolingBundle, format_results,
};
pub use crate::{wl_args, wl_call, wl_calls};
