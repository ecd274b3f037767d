//! Batch execution of model-issued tool calls.
//!
//! The orchestrator is the outer boundary of the tool layer: every request
//! yields exactly one [`CallResult`], index-aligned with the input batch, and
//! nothing raised by the registry, the executor or a tool body escapes it.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use wtooling::{CallRequest, ToolExecutor, ToolOrchestrator, ToolRegistry};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let orchestrator = ToolOrchestrator::new(
//!     Arc::new(ToolRegistry::new()),
//!     Arc::new(ToolExecutor::default()),
//! );
//!
//! let results = orchestrator
//!     .execute_batch(vec![CallRequest::new("call_1", "ghost", Default::default())])
//!     .await;
//!
//! assert!(results[0].is_error);
//! assert_eq!(results[0].content, "Error: Tool 'ghost' not found in registry");
//! # }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    ExecuteOptions, ExecutionOutcome, ToolArguments, ToolError, ToolErrorKind, ToolExecutionContext,
    ToolExecutor, ToolRegistry, parse_json_object,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
}

impl CallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Builds a request from the raw argument JSON a model produced.
    pub fn from_json(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments_json: &str,
    ) -> Result<Self, ToolError> {
        let id = id.into();
        let arguments = parse_json_object(arguments_json)
            .map_err(|err| err.with_tool_call_id(id.as_str()))?;
        Ok(Self::new(id, name, arguments))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResult {
    pub request_id: String,
    pub content: String,
    pub is_error: bool,
}

impl CallResult {
    pub fn success(request_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn failure(request_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            content: content.into(),
            is_error: true,
        }
    }

    /// The `tool_result` content block model APIs expect.
    pub fn to_tool_result_block(&self) -> Value {
        json!({
            "type": "tool_result",
            "tool_use_id": self.request_id,
            "content": self.content,
            "is_error": self.is_error,
        })
    }
}

pub fn format_results(results: &[CallResult]) -> Vec<Value> {
    results.iter().map(CallResult::to_tool_result_block).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    #[default]
    Sequential,
    /// Dispatches every request at once; results keep request order.
    Concurrent,
}

pub struct ToolOrchestrator {
    registry: Arc<ToolRegistry>,
    executor: Arc<ToolExecutor>,
    mode: BatchMode,
}

impl ToolOrchestrator {
    pub fn new(registry: Arc<ToolRegistry>, executor: Arc<ToolExecutor>) -> Self {
        Self {
            registry,
            executor,
            mode: BatchMode::Sequential,
        }
    }

    pub fn with_concurrency(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn executor(&self) -> Arc<ToolExecutor> {
        Arc::clone(&self.executor)
    }

    pub async fn execute_batch(&self, requests: Vec<CallRequest>) -> Vec<CallResult> {
        tracing::debug!(calls = requests.len(), mode = ?self.mode, "executing tool batch");

        match self.mode {
            BatchMode::Sequential => {
                let mut results = Vec::with_capacity(requests.len());
                for request in requests {
                    results.push(self.execute_one(request).await);
                }
                results
            }
            BatchMode::Concurrent => {
                join_all(requests.into_iter().map(|request| self.execute_one(request))).await
            }
        }
    }

    pub async fn execute_one(&self, request: CallRequest) -> CallResult {
        let request_id = request.id.clone();
        match AssertUnwindSafe(self.run(request)).catch_unwind().await {
            Ok(result) => result,
            Err(_) => CallResult::failure(
                request_id,
                "Execution error: panic: tool call panicked outside its body",
            ),
        }
    }

    async fn run(&self, request: CallRequest) -> CallResult {
        let CallRequest {
            id,
            name,
            arguments,
        } = request;

        if !self.registry.has(&name) {
            tracing::warn!(tool_name = name.as_str(), call_id = id.as_str(), "tool call for unknown tool");
            return CallResult::failure(id, format!("Error: Tool '{name}' not found in registry"));
        }

        let options = ExecuteOptions::default()
            .with_context(ToolExecutionContext::new().with_call_id(id.as_str()));

        let result = match self.registry.get(&name) {
            Ok(tool) => self.executor.execute_with(&tool, arguments, options).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(outcome) => render_outcome(id, &outcome),
            Err(error) if error.kind == ToolErrorKind::NotFound => {
                CallResult::failure(id, format!("Tool not found: {}", error.message))
            }
            Err(error) => CallResult::failure(
                id,
                format!("Execution error: {}: {}", error.type_label(), error.message),
            ),
        }
    }
}

fn render_outcome(id: String, outcome: &ExecutionOutcome) -> CallResult {
    if !outcome.is_success() {
        let message = outcome
            .error_message
            .clone()
            .unwrap_or_else(|| "Unknown error occurred".to_string());
        return CallResult::failure(id, message);
    }

    let content = match &outcome.payload {
        None | Some(Value::Null) => "Success".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    CallResult::success(id, content)
}
