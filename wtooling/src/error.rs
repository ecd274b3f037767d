//! Tool errors and their classification.
//!
//! Validation, timeout, lookup and registration failures are *distinguished*:
//! the executor hands them back to the caller as errors. Everything else a
//! tool body reports is an execution failure and ends up inside an
//! [`ExecutionOutcome`](crate::ExecutionOutcome) instead.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolErrorKind {
    Validation,
    Timeout,
    NotFound,
    Registration,
    Execution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
    pub error_type: Option<String>,
    pub elapsed: Option<Duration>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            tool_call_id: None,
            error_type: None,
            elapsed: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Validation, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn registration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Registration, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::execution(message).with_error_type("panic")
    }

    /// Wraps any error value as an execution failure, recording its type.
    pub fn from_source<E>(error: E) -> Self
    where
        E: Error + 'static,
    {
        Self::execution(error.to_string()).with_error_type(std::any::type_name::<E>())
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Label used for `error_type` metadata on contained failures.
    pub fn type_label(&self) -> String {
        self.error_type
            .clone()
            .unwrap_or_else(|| format!("{:?}Error", self.kind))
    }

    pub fn is_distinguished(&self) -> bool {
        !matches!(self.kind, ToolErrorKind::Execution)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ToolErrorKind::Timeout)
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::Validation | ToolErrorKind::NotFound
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.tool_name, &self.tool_call_id) {
            (Some(tool_name), Some(tool_call_id)) => write!(
                f,
                "{:?} [tool={}, call_id={}]: {}",
                self.kind, tool_name, tool_call_id, self.message
            ),
            (Some(tool_name), None) => {
                write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message)
            }
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(value: std::io::Error) -> Self {
        ToolError::execution(value.to_string()).with_error_type(format!("io::{:?}", value.kind()))
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(value: serde_json::Error) -> Self {
        ToolError::execution(value.to_string()).with_error_type("serde_json::Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_methods_report_retryable_and_user_error() {
        let timeout = ToolError::timeout("slow");
        assert!(timeout.is_retryable());
        assert!(!timeout.is_user_error());
        assert!(timeout.is_distinguished());

        let invalid = ToolError::validation("bad args");
        assert!(!invalid.is_retryable());
        assert!(invalid.is_user_error());

        let failed = ToolError::execution("boom");
        assert!(!failed.is_distinguished());
    }

    #[test]
    fn context_fields_are_included_in_display() {
        let error = ToolError::not_found("missing")
            .with_tool_name("lookup")
            .with_tool_call_id("call_1");

        let rendered = error.to_string();
        assert!(rendered.contains("lookup"));
        assert!(rendered.contains("call_1"));
        assert!(rendered.starts_with("NotFound"));
    }

    #[test]
    fn type_label_prefers_recorded_error_type() {
        assert_eq!(ToolError::execution("x").type_label(), "ExecutionError");
        assert_eq!(ToolError::panicked("x").type_label(), "panic");

        let io = ToolError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.type_label(), "io::NotFound");
        assert_eq!(io.message, "gone");
    }

    #[test]
    fn from_source_records_type_name() {
        let parse_error = "x".parse::<u32>().expect_err("not a number");
        let error = ToolError::from_source(parse_error);

        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert!(error.type_label().contains("ParseIntError"));
    }
}
