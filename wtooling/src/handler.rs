//! Tool bodies and the resolvers that turn handler references into them.
//!
//! A body is either blocking ([`ToolHandler::Sync`]), which the executor runs
//! on its worker pool, or a future ([`ToolHandler::Async`]), which it awaits
//! in place.
//!
//! ```rust
//! use serde_json::Value;
//! use wtooling::{HandlerResolver, HandlerTable, ToolOutput};
//!
//! let table = HandlerTable::new().with_sync("demo.echo", |args, _ctx| {
//!     Ok(ToolOutput::from(args.get("message").cloned().unwrap_or(Value::Null)))
//! });
//!
//! assert!(table.resolve("demo.echo").is_ok());
//! assert!(table.resolve("demo.missing").is_err());
//! ```

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use wcommon::BoxFuture;

use crate::{ExecutionOutcome, ToolArguments, ToolError, ToolExecutionContext};

/// What a body hands back: a bare value, or an outcome it shaped itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Value(Value),
    Outcome(ExecutionOutcome),
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<ExecutionOutcome> for ToolOutput {
    fn from(value: ExecutionOutcome) -> Self {
        Self::Outcome(value)
    }
}

pub type ToolResult = Result<ToolOutput, ToolError>;

type SyncBody = dyn Fn(ToolArguments, ToolExecutionContext) -> ToolResult + Send + Sync;
type AsyncBody =
    dyn Fn(ToolArguments, ToolExecutionContext) -> BoxFuture<'static, ToolResult> + Send + Sync;

#[derive(Clone)]
pub enum ToolHandler {
    Sync(Arc<SyncBody>),
    Async(Arc<AsyncBody>),
}

impl ToolHandler {
    pub fn sync<F>(body: F) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> ToolResult + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(body))
    }

    pub fn from_async<F, Fut>(body: F) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        Self::Async(Arc::new(move |args, context| Box::pin(body(args, context))))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    pub fn flavor(&self) -> &'static str {
        match self {
            Self::Sync(_) => "sync",
            Self::Async(_) => "async",
        }
    }
}

impl Debug for ToolHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ToolHandler::{}", self.flavor())
    }
}

pub trait HandlerResolver: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<ToolHandler, ToolError>;
}

impl<F> HandlerResolver for F
where
    F: Fn(&str) -> Result<ToolHandler, ToolError> + Send + Sync,
{
    fn resolve(&self, reference: &str) -> Result<ToolHandler, ToolError> {
        self(reference)
    }
}

/// Thread-safe table of handlers keyed by reference, e.g. `fs.read_file`.
#[derive(Default)]
pub struct HandlerTable {
    handlers: RwLock<HashMap<String, ToolHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, reference: impl Into<String>, handler: ToolHandler) -> Option<ToolHandler> {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(reference.into(), handler)
    }

    pub fn with_sync<F>(self, reference: impl Into<String>, body: F) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> ToolResult + Send + Sync + 'static,
    {
        self.insert(reference, ToolHandler::sync(body));
        self
    }

    pub fn with_async<F, Fut>(self, reference: impl Into<String>, body: F) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        self.insert(reference, ToolHandler::from_async(body));
        self
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(reference)
    }

    pub fn references(&self) -> Vec<String> {
        let mut references: Vec<String> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        references.sort();
        references
    }
}

impl HandlerResolver for HandlerTable {
    fn resolve(&self, reference: &str) -> Result<ToolHandler, ToolError> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .cloned()
            .ok_or_else(|| {
                ToolError::registration(format!("cannot resolve handler '{reference}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    #[test]
    fn output_conversions_distinguish_values_from_outcomes() {
        assert_eq!(ToolOutput::from("hi"), ToolOutput::Value(json!("hi")));
        assert_eq!(
            ToolOutput::from(String::from("hi")),
            ToolOutput::Value(json!("hi"))
        );
        assert!(matches!(
            ToolOutput::from(ExecutionOutcome::error("nope")),
            ToolOutput::Outcome(_)
        ));
    }

    #[test]
    fn handler_table_resolves_registered_references() {
        let table = HandlerTable::new()
            .with_sync("demo.echo", |_args, _ctx| Ok(ToolOutput::from("sync")))
            .with_async("demo.fetch", |_args, _ctx| async { Ok(ToolOutput::from("async")) });

        assert!(!table.resolve("demo.echo").expect("sync resolves").is_async());
        assert!(table.resolve("demo.fetch").expect("async resolves").is_async());
        assert!(table.contains("demo.echo"));
        assert_eq!(table.references(), vec!["demo.echo", "demo.fetch"]);

        let error = table.resolve("demo.ghost").expect_err("unknown reference");
        assert_eq!(error.kind, ToolErrorKind::Registration);
        assert!(error.message.contains("demo.ghost"));
    }

    #[test]
    fn closures_act_as_resolvers() {
        let resolver = |reference: &str| {
            if reference == "math.add" {
                Ok(ToolHandler::sync(|_args, _ctx| Ok(ToolOutput::from(json!(3)))))
            } else {
                Err(ToolError::registration(format!("no such handler: {reference}")))
            }
        };

        assert!(resolver.resolve("math.add").is_ok());
        assert!(resolver.resolve("math.sub").is_err());
    }
}
