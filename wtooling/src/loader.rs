//! Batch registration from a directory of definition files.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::{RegisteredTool, ToolDefinition, ToolError, ToolRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Register every valid definition and report the rest.
    #[default]
    BestEffort,
    /// Register nothing unless every definition is valid.
    AllOrNothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub pattern: String,
    pub allow_override: bool,
    pub policy: LoadPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            pattern: "*.yaml".to_string(),
            allow_override: false,
            policy: LoadPolicy::BestEffort,
        }
    }
}

impl LoadOptions {
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn allow_override(mut self) -> Self {
        self.allow_override = true;
        self
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFailure {
    pub path: PathBuf,
    pub message: String,
}

impl Display for DefinitionFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("directory '{}' does not exist or is not a directory", .0.display())]
    MissingDirectory(PathBuf),
    #[error("invalid definition pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("failed to register {} tool(s):\n{}", .failures.len(), render_failures(.failures))]
    Failed {
        registered: Vec<String>,
        failures: Vec<DefinitionFailure>,
    },
}

impl LoadError {
    /// Names applied before the failure report; always empty under
    /// [`LoadPolicy::AllOrNothing`].
    pub fn registered(&self) -> &[String] {
        match self {
            Self::Failed { registered, .. } => registered.as_slice(),
            _ => &[],
        }
    }

    pub fn failures(&self) -> &[DefinitionFailure] {
        match self {
            Self::Failed { failures, .. } => failures.as_slice(),
            _ => &[],
        }
    }
}

impl From<LoadError> for ToolError {
    fn from(value: LoadError) -> Self {
        ToolError::registration(value.to_string())
    }
}

fn render_failures(failures: &[DefinitionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ToolRegistry {
    /// Registers every definition in `directory` matching `options.pattern`.
    ///
    /// Returns the registered names in file order. Individual failures never
    /// stop the scan; they are collected into [`LoadError::Failed`].
    pub fn register_from_directory(
        &self,
        directory: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<Vec<String>, LoadError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(LoadError::MissingDirectory(directory.to_path_buf()));
        }

        let paths = definition_paths(directory, &options.pattern)?;
        match options.policy {
            LoadPolicy::BestEffort => self.load_best_effort(&paths, options.allow_override),
            LoadPolicy::AllOrNothing => self.load_all_or_nothing(&paths, options.allow_override),
        }
    }

    fn load_best_effort(
        &self,
        paths: &[PathBuf],
        allow_override: bool,
    ) -> Result<Vec<String>, LoadError> {
        let mut registered = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            let result = ToolDefinition::from_path(path)
                .and_then(ToolDefinition::into_contract)
                .map_err(ToolError::from)
                .and_then(|contract| {
                    let name = contract.name.clone();
                    self.register_from_definition(contract, allow_override)
                        .map(|()| name)
                });

            match result {
                Ok(name) => registered.push(name),
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "skipping tool definition");
                    failures.push(DefinitionFailure {
                        path: path.clone(),
                        message: error.message,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(registered)
        } else {
            Err(LoadError::Failed {
                registered,
                failures,
            })
        }
    }

    fn load_all_or_nothing(
        &self,
        paths: &[PathBuf],
        allow_override: bool,
    ) -> Result<Vec<String>, LoadError> {
        let mut tools = self.lock();
        let mut staged: Vec<RegisteredTool> = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            let built = ToolDefinition::from_path(path)
                .and_then(ToolDefinition::into_contract)
                .map_err(ToolError::from)
                .and_then(|contract| self.build_from_contract(contract));

            let message = match built {
                Ok(tool) if !allow_override && tools.contains_key(tool.name()) => {
                    format!("tool '{}' is already registered", tool.name())
                }
                Ok(tool) if staged.iter().any(|other| other.name() == tool.name()) => {
                    format!("tool '{}' is defined more than once", tool.name())
                }
                Ok(tool) => {
                    staged.push(tool);
                    continue;
                }
                Err(error) => error.message,
            };

            failures.push(DefinitionFailure {
                path: path.clone(),
                message,
            });
        }

        if !failures.is_empty() {
            return Err(LoadError::Failed {
                registered: Vec::new(),
                failures,
            });
        }

        let mut registered = Vec::with_capacity(staged.len());
        for tool in staged {
            let name = tool.name().to_string();
            tracing::debug!(tool_name = name.as_str(), flavor = tool.handler().flavor(), "registered tool");
            tools.insert(name.clone(), Arc::new(tool));
            registered.push(name);
        }

        Ok(registered)
    }
}

fn definition_paths(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    let full_pattern = format!(
        "{}/{pattern}",
        glob::Pattern::escape(&directory.to_string_lossy())
    );
    let invalid = |message: String| LoadError::InvalidPattern {
        pattern: pattern.to_string(),
        message,
    };

    let mut paths: Vec<PathBuf> = glob::glob(&full_pattern)
        .map_err(|err| invalid(err.to_string()))?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}
