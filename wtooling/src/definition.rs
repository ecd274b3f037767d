//! Declarative tool definitions loaded from YAML files.
//!
//! ```rust
//! use wtooling::ToolDefinition;
//!
//! let definition = ToolDefinition::from_yaml_str(
//!     r#"
//! name: read_file
//! description: Read the contents of a file
//! parameters:
//!   type: object
//!   properties:
//!     path:
//!       type: string
//!   required: [path]
//! handler: fs.read_file
//! timeout: 30.0
//! "#,
//! )
//! .expect("definition should parse");
//!
//! let contract = definition.into_contract().expect("definition should be valid");
//! assert_eq!(contract.name, "read_file");
//! assert!(!contract.is_async);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{ToolContract, ToolError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("definition must be a mapping")]
    NotAMapping,
    #[error("invalid definition: {0}")]
    Invalid(String),
}

impl ToolDefinition {
    pub fn from_yaml_str(source: &str) -> Result<Self, DefinitionError> {
        let document: serde_yaml::Value = serde_yaml::from_str(source)?;
        if !document.is_mapping() {
            return Err(DefinitionError::NotAMapping);
        }

        Ok(serde_yaml::from_value(document)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&source)
    }

    /// Converts into a contract, checking every field before any handler
    /// resolution is attempted.
    pub fn into_contract(self) -> Result<ToolContract, DefinitionError> {
        let timeout = self.timeout.map(timeout_from_seconds).transpose()?;

        let contract = ToolContract {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            handler: Some(self.handler),
            is_async: self.is_async,
            timeout,
            metadata: self.metadata,
        };

        contract
            .validate()
            .map_err(|err| DefinitionError::Invalid(err.message))?;
        Ok(contract)
    }
}

fn timeout_from_seconds(seconds: f64) -> Result<Duration, DefinitionError> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(DefinitionError::Invalid(format!(
            "timeout must be a positive number of seconds, got {seconds}"
        )));
    }

    match Duration::try_from_secs_f64(seconds) {
        Ok(timeout) if !timeout.is_zero() => Ok(timeout),
        Ok(_) => Err(DefinitionError::Invalid(format!(
            "timeout of {seconds} seconds is below the one nanosecond resolution"
        ))),
        Err(_) => Err(DefinitionError::Invalid(format!(
            "timeout of {seconds} seconds is out of range"
        ))),
    }
}

impl From<DefinitionError> for ToolError {
    fn from(value: DefinitionError) -> Self {
        ToolError::registration(value.to_string())
    }
}
