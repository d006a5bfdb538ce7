//! Configuration: engine options and loading from deadbind.toml.
//!
//! The same keys are accepted in snake_case (the TOML file) and camelCase
//! (editor settings sent over LSP as JSON).

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::DeadbindError;

/// File name looked up at a project root.
pub const CONFIG_FILE: &str = "deadbind.toml";

/// What to do with unused variables and functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnusedVariableAction {
    /// Comment the declaration out under a marker line.
    #[default]
    Comment,
    /// Rename to `_name`.
    Prefix,
    Ignore,
}

impl FromStr for UnusedVariableAction {
    type Err = DeadbindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comment" => Ok(Self::Comment),
            "prefix" => Ok(Self::Prefix),
            "ignore" => Ok(Self::Ignore),
            other => Err(DeadbindError::invalid(format!(
                "unknown unused variable action '{other}' (expected comment, prefix or ignore)"
            ))),
        }
    }
}

impl fmt::Display for UnusedVariableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => write!(f, "comment"),
            Self::Prefix => write!(f, "prefix"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

/// Resolved engine input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub unused_variable_action: UnusedVariableAction,
    pub remove_trailing_parameters: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            unused_variable_action: UnusedVariableAction::Comment,
            remove_trailing_parameters: true,
        }
    }
}

/// Main configuration structure for deadbind.toml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeadbindConfig {
    /// Run import removal when a file is saved.
    #[serde(alias = "autoRemoveUnusedImports")]
    pub auto_remove_unused_imports: bool,
    /// Run variable handling when a file is saved.
    #[serde(alias = "autoHandleUnusedVariables")]
    pub auto_handle_unused_variables: bool,
    #[serde(alias = "unusedVariableAction")]
    pub unused_variable_action: UnusedVariableAction,
    #[serde(alias = "removeTrailingParameters")]
    pub remove_trailing_parameters: bool,
    /// Path substrings to skip when scanning.
    pub ignore: Vec<String>,
    pub output: OutputConfig,
}

impl Default for DeadbindConfig {
    fn default() -> Self {
        Self {
            auto_remove_unused_imports: false,
            auto_handle_unused_variables: false,
            unused_variable_action: UnusedVariableAction::default(),
            remove_trailing_parameters: true,
            ignore: Vec::new(),
            output: OutputConfig::default(),
        }
    }
}

/// Output format configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl DeadbindConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            unused_variable_action: self.unused_variable_action,
            remove_trailing_parameters: self.remove_trailing_parameters,
        }
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.ignore.iter().any(|pattern| path.contains(pattern.as_str()))
    }

    pub fn wants_json(&self) -> bool {
        self.output.format.as_deref() == Some("json")
    }
}

/// Loads configuration from deadbind.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<DeadbindConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).context("Invalid deadbind.toml")?;
    Ok(Some(cfg))
}
