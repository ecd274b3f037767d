//! A contract bound to its resolved body.
//!
//! ```rust
//! use serde_json::json;
//! use wtooling::{RegisteredTool, ToolContract, ToolHandler, ToolOutput};
//!
//! let tool = RegisteredTool::new(
//!     ToolContract::new(
//!         "echo",
//!         "Echoes input",
//!         json!({"type": "object", "properties": {"message": {"type": "string"}}}),
//!     ),
//!     ToolHandler::sync(|args, _ctx| Ok(ToolOutput::from(args["message"].clone()))),
//! )
//! .expect("tool should be valid");
//!
//! assert_eq!(tool.name(), "echo");
//! assert!(!tool.is_async());
//! ```

use crate::{ParameterSchema, ToolArguments, ToolContract, ToolError, ToolHandler};

#[derive(Debug, Clone)]
pub struct RegisteredTool {
    contract: ToolContract,
    handler: ToolHandler,
    schema: ParameterSchema,
}

impl RegisteredTool {
    /// Validates the contract, compiles its schema and checks the body flavor
    /// agrees with the contract's `is_async` flag.
    pub fn new(contract: ToolContract, handler: ToolHandler) -> Result<Self, ToolError> {
        contract.validate()?;

        if contract.is_async != handler.is_async() {
            let declared = if contract.is_async { "async" } else { "sync" };
            return Err(ToolError::registration(format!(
                "tool '{}' is declared {declared} but its handler is {}",
                contract.name,
                handler.flavor()
            ))
            .with_tool_name(&contract.name));
        }

        let schema = ParameterSchema::compile(&contract.parameters)
            .map_err(|err| err.with_tool_name(&contract.name))?;

        Ok(Self {
            contract,
            handler,
            schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.contract.name
    }

    pub fn contract(&self) -> &ToolContract {
        &self.contract
    }

    pub fn handler(&self) -> &ToolHandler {
        &self.handler
    }

    pub fn is_async(&self) -> bool {
        self.handler.is_async()
    }

    pub fn validate_arguments(&self, arguments: &ToolArguments) -> Result<(), ToolError> {
        self.schema.validate(self.name(), arguments)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{ToolErrorKind, ToolOutput};

    fn contract() -> ToolContract {
        ToolContract::new(
            "echo",
            "Echoes input",
            json!({"type": "object", "properties": {"message": {"type": "string"}}}),
        )
    }

    #[test]
    fn flavor_mismatch_is_rejected() {
        let error = RegisteredTool::new(
            contract().asynchronous(),
            ToolHandler::sync(|_args, _ctx| Ok(ToolOutput::from("x"))),
        )
        .expect_err("async contract with sync body should fail");

        assert_eq!(error.kind, ToolErrorKind::Registration);
        assert!(error.message.contains("declared async"));
    }

    #[test]
    fn invalid_contract_is_rejected_before_compiling() {
        let error = RegisteredTool::new(
            ToolContract::new("Echo", "Echoes input", json!({"type": "object", "properties": {}})),
            ToolHandler::sync(|_args, _ctx| Ok(ToolOutput::from("x"))),
        )
        .expect_err("bad name should fail");

        assert_eq!(error.kind, ToolErrorKind::Registration);
    }

    #[test]
    fn async_contract_accepts_async_body() {
        let tool = RegisteredTool::new(
            contract().asynchronous(),
            ToolHandler::from_async(|_args, _ctx| async { Ok(ToolOutput::from("x")) }),
        )
        .expect("tool should be valid");

        assert!(tool.is_async());
        assert_eq!(tool.contract().name, "echo");
    }
}
