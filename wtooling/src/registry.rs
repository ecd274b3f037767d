//! Thread-safe tool registry keyed by tool name.
//!
//! ```rust
//! use serde_json::json;
//! use wtooling::{ToolContract, ToolHandler, ToolOutput, ToolRegistry};
//!
//! let registry = ToolRegistry::new();
//! for name in ["b_tool", "a_tool"] {
//!     registry
//!         .register(
//!             ToolContract::new(name, "demo", json!({"type": "object", "properties": {}})),
//!             ToolHandler::sync(|_args, _ctx| Ok(ToolOutput::from("ok"))),
//!             false,
//!         )
//!         .expect("registration should succeed");
//! }
//!
//! assert_eq!(registry.list(), vec!["a_tool", "b_tool"]);
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};
use wcommon::Registry;

use crate::{
    HandlerResolver, HandlerTable, RegisteredTool, ToolContract, ToolDefinition, ToolError,
    ToolHandler,
};

pub struct ToolRegistry {
    tools: Mutex<Registry<String, Arc<RegisteredTool>>>,
    resolver: Arc<dyn HandlerResolver>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_resolver(Arc::new(HandlerTable::new()))
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: Arc<dyn HandlerResolver>) -> Self {
        Self {
            tools: Mutex::new(Registry::new()),
            resolver,
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Registry<String, Arc<RegisteredTool>>> {
        self.tools.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(
        &self,
        contract: ToolContract,
        handler: ToolHandler,
        allow_override: bool,
    ) -> Result<(), ToolError> {
        self.register_tool(RegisteredTool::new(contract, handler)?, allow_override)
    }

    pub fn register_tool(&self, tool: RegisteredTool, allow_override: bool) -> Result<(), ToolError> {
        let mut tools = self.lock();
        Self::insert_locked(&mut tools, tool, allow_override)
    }

    /// Resolves the contract's handler reference and inserts the tool. The
    /// lookup, resolution and insertion share one critical section, so the
    /// resolver must not call back into this registry.
    pub fn register_from_definition(
        &self,
        contract: ToolContract,
        allow_override: bool,
    ) -> Result<(), ToolError> {
        let mut tools = self.lock();
        let tool = self.build_from_contract(contract)?;
        Self::insert_locked(&mut tools, tool, allow_override)
    }

    pub fn register_from_file(
        &self,
        path: impl AsRef<Path>,
        allow_override: bool,
    ) -> Result<String, ToolError> {
        let path = path.as_ref();
        let contract = ToolDefinition::from_path(path)
            .and_then(ToolDefinition::into_contract)
            .map_err(|err| {
                ToolError::registration(format!(
                    "failed to load tool from '{}': {err}",
                    path.display()
                ))
            })?;
        let name = contract.name.clone();

        self.register_from_definition(contract, allow_override)?;
        Ok(name)
    }

    pub(crate) fn build_from_contract(
        &self,
        contract: ToolContract,
    ) -> Result<RegisteredTool, ToolError> {
        contract.validate()?;

        let Some(reference) = contract.handler.clone() else {
            return Err(ToolError::registration(format!(
                "tool '{}' has no handler reference",
                contract.name
            ))
            .with_tool_name(&contract.name));
        };

        let handler = self.resolver.resolve(&reference).map_err(|err| {
            ToolError::registration(format!(
                "failed to register tool '{}' from handler '{reference}': {}",
                contract.name, err.message
            ))
            .with_tool_name(&contract.name)
        })?;

        RegisteredTool::new(contract, handler)
    }

    pub(crate) fn insert_locked(
        tools: &mut Registry<String, Arc<RegisteredTool>>,
        tool: RegisteredTool,
        allow_override: bool,
    ) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if !allow_override && tools.contains_key(&name) {
            return Err(ToolError::registration(format!(
                "tool '{name}' is already registered; pass allow_override to replace it"
            ))
            .with_tool_name(name));
        }

        tracing::debug!(tool_name = name.as_str(), flavor = tool.handler().flavor(), "registered tool");
        tools.insert(name, Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<RegisteredTool>, ToolError> {
        self.lock().get(name).cloned().ok_or_else(|| {
            ToolError::not_found(format!("tool '{name}' is not registered")).with_tool_name(name)
        })
    }

    pub fn has(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn contract(&self, name: &str) -> Option<ToolContract> {
        self.lock().get(name).map(|tool| tool.contract().clone())
    }

    /// Registered names in lexicographic order.
    pub fn list(&self) -> Vec<String> {
        self.lock().sorted_keys()
    }

    /// Registered tools ordered by name.
    pub fn tools(&self) -> Vec<Arc<RegisteredTool>> {
        let tools = self.lock();
        tools
            .sorted_keys()
            .iter()
            .filter_map(|name| tools.get(name).cloned())
            .collect()
    }

    pub fn unregister(&self, name: &str) -> Result<Arc<RegisteredTool>, ToolError> {
        self.lock().remove(name).ok_or_else(|| {
            ToolError::not_found(format!("tool '{name}' is not registered")).with_tool_name(name)
        })
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Tool declarations in the `{name, description, input_schema}` shape
    /// model APIs expect, ordered by name.
    pub fn tool_specs(&self) -> Vec<Value> {
        self.tools()
            .iter()
            .map(|tool| {
                let contract = tool.contract();
                json!({
                    "name": contract.name,
                    "description": contract.description,
                    "input_schema": contract.parameters,
                })
            })
            .collect()
    }

    pub fn describe_tools(&self) -> String {
        let tools = self.tools();
        if tools.is_empty() {
            return "No tools available.".to_string();
        }

        tools
            .iter()
            .map(|tool| format!("- **{}**: {}", tool.name(), tool.contract().description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
