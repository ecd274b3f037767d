//! Unified facade over the windlass workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the tooling and observability crates and provides wiring
//! helpers and macros for common setup and call-building flows.

mod macros;

pub mod global;
pub mod prelude;
pub mod runtime;
pub mod util;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

pub use wcommon;
pub use wobserve;
pub use wtooling;

pub use wcommon::{BoxFuture, MetadataMap, Registry, TraceId};
pub use wobserve::{
    FanoutToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks,
    init_tracing,
};
pub use wtooling::{
    BatchMode, CallRequest, CallResult, DefinitionError, DefinitionFailure, ExecuteOptions,
    ExecutionOutcome, ExecutorConfig, HandlerResolver, HandlerTable, LoadError, LoadOptions,
    LoadPolicy, NoopToolRuntimeHooks, OutcomeStatus, RegisteredTool, ToolArguments, ToolContract,
    ToolDefinition, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutor, ToolHandler,
    ToolOrchestrator, ToolOutput, ToolRegistry, ToolResult, ToolRuntimeHooks, format_results,
    parse_json_object, parse_json_value, required_string,
};

pub use global::default_registry;
pub use runtime::{
    ToolingBundle, build_tooling, build_tooling_from_env, build_tooling_with, observability_hooks,
};
pub use util::{arguments, call, object_schema};
