//! Execution context and normalized outcome types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use wcommon::{MetadataMap, TraceId};

/// Arguments handed to a tool body, keyed by parameter name.
pub type ToolArguments = Map<String, Value>;

pub const EXECUTION_TIME_KEY: &str = "execution_time_seconds";
pub const TOOL_NAME_KEY: &str = "tool_name";
pub const ERROR_TYPE_KEY: &str = "error_type";

#[derive(Debug, Clone)]
pub struct ToolExecutionContext {
    pub call_id: Option<String>,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
    cancellation: CancellationToken,
}

impl Default for ToolExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolExecutionContext {
    pub fn new() -> Self {
        Self {
            call_id: None,
            trace_id: None,
            metadata: MetadataMap::new(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Blocking bodies poll this to stop early once their deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Context for a single dispatch. Its token is a child of the caller's, so
    /// a timeout cancels the dispatch without cancelling the caller.
    pub(crate) fn for_dispatch(&self) -> (Self, CancellationToken) {
        let token = self.cancellation.child_token();
        let context = Self {
            call_id: self.call_id.clone(),
            trace_id: self.trace_id.clone(),
            metadata: self.metadata.clone(),
            cancellation: token.clone(),
        };
        (context, token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Error,
    Timeout,
    Cancelled,
}

/// Normalized result of one dispatch.
///
/// `payload` is only set for [`OutcomeStatus::Success`]; every other status
/// carries `error_message` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ExecutionOutcome {
    pub fn success(payload: impl Into<Value>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            payload: Some(payload.into()),
            error_message: None,
            metadata: Map::new(),
        }
    }

    pub fn empty_success() -> Self {
        Self {
            status: OutcomeStatus::Success,
            payload: None,
            error_message: None,
            metadata: Map::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::failed(OutcomeStatus::Error, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::failed(OutcomeStatus::Timeout, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::failed(OutcomeStatus::Cancelled, message)
    }

    fn failed(status: OutcomeStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            payload: None,
            error_message: Some(message.into()),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == OutcomeStatus::Error
    }

    pub fn execution_time_seconds(&self) -> Option<f64> {
        self.metadata.get(EXECUTION_TIME_KEY).and_then(Value::as_f64)
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.metadata.get(TOOL_NAME_KEY).and_then(Value::as_str)
    }

    pub fn error_type(&self) -> Option<&str> {
        self.metadata.get(ERROR_TYPE_KEY).and_then(Value::as_str)
    }

    pub(crate) fn stamp(&mut self, elapsed: Duration, tool_name: &str) {
        self.metadata
            .insert(EXECUTION_TIME_KEY.to_string(), Value::from(elapsed.as_secs_f64()));
        self.metadata
            .insert(TOOL_NAME_KEY.to_string(), Value::from(tool_name));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn constructors_select_payload_or_message_by_status() {
        let ok = ExecutionOutcome::success(json!({"lines": 3}));
        assert!(ok.is_success());
        assert_eq!(ok.payload, Some(json!({"lines": 3})));
        assert!(ok.error_message.is_none());

        for (outcome, status) in [
            (ExecutionOutcome::error("boom"), OutcomeStatus::Error),
            (ExecutionOutcome::timeout("slow"), OutcomeStatus::Timeout),
            (ExecutionOutcome::cancelled("stop"), OutcomeStatus::Cancelled),
        ] {
            assert_eq!(outcome.status, status);
            assert!(outcome.payload.is_none());
            assert!(outcome.error_message.is_some());
            assert!(!outcome.is_success());
        }

        assert!(ExecutionOutcome::empty_success().payload.is_none());
        assert!(ExecutionOutcome::error("x").is_error());
    }

    #[test]
    fn stamp_records_timing_and_tool_name() {
        let mut outcome = ExecutionOutcome::success("hi").with_metadata("rows", 2);
        outcome.stamp(Duration::from_millis(250), "echo");

        assert_eq!(outcome.tool_name(), Some("echo"));
        assert_eq!(outcome.execution_time_seconds(), Some(0.25));
        assert_eq!(outcome.metadata.get("rows"), Some(&json!(2)));
    }

    #[test]
    fn status_serializes_in_snake_case() {
        let rendered = serde_json::to_value(ExecutionOutcome::timeout("late"))
            .expect("outcome should serialize");
        assert_eq!(rendered["status"], json!("timeout"));
        assert!(rendered.get("payload").is_none());
    }

    #[test]
    fn dispatch_context_cancels_independently_of_caller() {
        let caller = ToolExecutionContext::new().with_call_id("call-1");
        let (dispatch, token) = caller.for_dispatch();

        token.cancel();
        assert!(dispatch.is_cancelled());
        assert!(!caller.is_cancelled());
        assert_eq!(dispatch.call_id.as_deref(), Some("call-1"));
    }
}
