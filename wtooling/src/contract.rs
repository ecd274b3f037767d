//! Declarative tool contracts and compiled parameter schemas.
//!
//! ```rust
//! use serde_json::json;
//! use wtooling::ToolContract;
//!
//! let contract = ToolContract::new(
//!     "read_file",
//!     "Read a file from disk",
//!     json!({
//!         "type": "object",
//!         "properties": {"path": {"type": "string"}},
//!         "required": ["path"]
//!     }),
//! )
//! .with_handler("fs.read_file")
//! .with_timeout(std::time::Duration::from_secs(30));
//!
//! assert!(contract.validate().is_ok());
//! ```

use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use jsonschema::JSONSchema;
use serde_json::{Map, Value};

use crate::{ToolArguments, ToolError};

#[derive(Debug, Clone, PartialEq)]
pub struct ToolContract {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub handler: Option<String>,
    pub is_async: bool,
    pub timeout: Option<Duration>,
    pub metadata: Map<String, Value>,
}

impl ToolContract {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: None,
            is_async: false,
            timeout: None,
            metadata: Map::new(),
        }
    }

    pub fn with_handler(mut self, reference: impl Into<String>) -> Self {
        self.handler = Some(reference.into());
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Structural checks performed before a contract is accepted.
    pub fn validate(&self) -> Result<(), ToolError> {
        let reject = |message: String| Err(ToolError::registration(message).with_tool_name(&self.name));

        if !is_valid_tool_name(&self.name) {
            return reject(format!(
                "tool name '{}' must match ^[a-z][a-z0-9_]*$",
                self.name
            ));
        }

        if self.description.trim().is_empty() {
            return reject("tool description must not be empty".to_string());
        }

        if let Err(reason) = check_parameters_shape(&self.parameters) {
            return reject(reason);
        }

        if let Some(timeout) = self.timeout
            && timeout.is_zero()
        {
            return reject("tool timeout must be greater than zero".to_string());
        }

        if let Some(reference) = &self.handler
            && !is_valid_handler_reference(reference)
        {
            return reject(format!(
                "handler '{reference}' must be a reference of the form 'module.function'"
            ));
        }

        Ok(())
    }
}

pub fn is_valid_tool_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
}

fn is_valid_handler_reference(reference: &str) -> bool {
    reference.contains('.') && reference.split('.').all(|segment| !segment.trim().is_empty())
}

fn check_parameters_shape(parameters: &Value) -> Result<(), String> {
    let Some(object) = parameters.as_object() else {
        return Err("parameters must be a JSON object".to_string());
    };

    match object.get("type") {
        None => return Err("parameters must have a 'type' field".to_string()),
        Some(Value::String(kind)) if kind == "object" => {}
        Some(_) => return Err("parameters type must be 'object'".to_string()),
    }

    match object.get("properties") {
        None => Err("parameters must have a 'properties' field".to_string()),
        Some(Value::Object(_)) => Ok(()),
        Some(_) => Err("parameters.properties must be an object".to_string()),
    }
}

/// Parameter schema compiled once at registration time.
#[derive(Clone)]
pub struct ParameterSchema {
    raw: Value,
    compiled: Arc<JSONSchema>,
}

impl ParameterSchema {
    pub fn compile(raw: &Value) -> Result<Self, ToolError> {
        let compiled = JSONSchema::compile(raw)
            .map_err(|err| ToolError::registration(format!("invalid parameter schema: {err}")))?;

        Ok(Self {
            raw: raw.clone(),
            compiled: Arc::new(compiled),
        })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn validate(&self, tool_name: &str, arguments: &ToolArguments) -> Result<(), ToolError> {
        let instance = Value::Object(arguments.clone());
        let failures: Vec<String> = match self.compiled.validate(&instance) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|error| {
                    format!(
                        "at {} (schema {}): {}",
                        render_instance_path(&error.instance_path.to_string()),
                        error.schema_path,
                        error
                    )
                })
                .collect(),
        };

        Err(ToolError::validation(format!(
            "parameter validation failed for tool '{tool_name}' {}",
            failures.join("; ")
        ))
        .with_tool_name(tool_name))
    }
}

impl Debug for ParameterSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSchema")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

fn render_instance_path(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.replace('/', " -> ")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    fn echo_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "required": ["message"]
        })
    }

    fn args(value: Value) -> ToolArguments {
        value.as_object().cloned().expect("object arguments")
    }

    #[test]
    fn tool_names_follow_lowercase_identifier_pattern() {
        assert!(is_valid_tool_name("read_file"));
        assert!(is_valid_tool_name("a1"));
        assert!(!is_valid_tool_name(""));
        assert!(!is_valid_tool_name("ReadFile"));
        assert!(!is_valid_tool_name("1tool"));
        assert!(!is_valid_tool_name("read-file"));
        assert!(!is_valid_tool_name("_hidden"));
    }

    #[test]
    fn validate_rejects_structurally_invalid_contracts() {
        let cases = [
            ToolContract::new("Bad", "desc", echo_schema()),
            ToolContract::new("echo", "  ", echo_schema()),
            ToolContract::new("echo", "desc", json!({"type": "string", "properties": {}})),
            ToolContract::new("echo", "desc", json!({"type": "object"})),
            ToolContract::new("echo", "desc", json!({"type": "object", "properties": []})),
            ToolContract::new("echo", "desc", json!(["not", "an", "object"])),
            ToolContract::new("echo", "desc", echo_schema()).with_timeout(Duration::ZERO),
            ToolContract::new("echo", "desc", echo_schema()).with_handler("nodots"),
            ToolContract::new("echo", "desc", echo_schema()).with_handler("module."),
        ];

        for contract in cases {
            let error = contract.validate().expect_err("contract should be rejected");
            assert_eq!(error.kind, ToolErrorKind::Registration, "{contract:?}");
        }
    }

    #[test]
    fn validate_accepts_well_formed_contract() {
        let contract = ToolContract::new("echo", "Echo a message", echo_schema())
            .with_handler("demo.echo")
            .with_timeout(Duration::from_millis(500))
            .with_metadata("category", "demo")
            .asynchronous();

        contract.validate().expect("contract should be valid");
        assert!(contract.is_async);
        assert_eq!(contract.metadata.get("category"), Some(&json!("demo")));
    }

    #[test]
    fn compiled_schema_reports_missing_required_field() {
        let schema = ParameterSchema::compile(&echo_schema()).expect("schema should compile");

        schema
            .validate("echo", &args(json!({"message": "hi"})))
            .expect("arguments should validate");

        let error = schema
            .validate("echo", &args(json!({})))
            .expect_err("missing message should fail");
        assert_eq!(error.kind, ToolErrorKind::Validation);
        assert!(error.message.contains("echo"));
        assert!(error.message.contains("required"));
        assert!(error.message.contains("root"));
    }

    #[test]
    fn compiled_schema_reports_nested_type_mismatch_path() {
        let schema = ParameterSchema::compile(&echo_schema()).expect("schema should compile");

        let error = schema
            .validate("echo", &args(json!({"message": 42})))
            .expect_err("wrong type should fail");
        assert!(error.message.contains("message"));
    }

    #[test]
    fn compile_rejects_invalid_schema_keywords() {
        let error = ParameterSchema::compile(&json!({
            "type": "object",
            "properties": {"count": {"type": "integer", "minimum": "zero"}}
        }))
        .expect_err("schema should not compile");
        assert_eq!(error.kind, ToolErrorKind::Registration);
    }
}
