//! Inlining configuration, read once at session start

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Session-wide inlining switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineConfig {
    /// Master switch for cross-module inlining. Nothing overrides it.
    #[serde(default = "default_true")]
    pub cross_module_inlining: bool,
    /// Whether the optimizer flags allow inlining at all. Functions marked
    /// always-inline ignore this.
    #[serde(default = "default_true")]
    pub optimizer_inlining: bool,
    /// Largest body (in statements) still worth resolving speculatively
    #[serde(default = "default_statement_threshold")]
    pub statement_threshold: u32,
    /// Name of the runtime root unit whose functions are never exported
    #[serde(default = "default_runtime_root_unit")]
    pub runtime_root_unit: String,
}

fn default_true() -> bool {
    true
}

/// Default largest body still resolved speculatively
pub const DEFAULT_STATEMENT_THRESHOLD: u32 = 10;

fn default_statement_threshold() -> u32 {
    DEFAULT_STATEMENT_THRESHOLD
}

fn default_runtime_root_unit() -> String {
    "object".to_string()
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            cross_module_inlining: default_true(),
            optimizer_inlining: default_true(),
            statement_threshold: default_statement_threshold(),
            runtime_root_unit: default_runtime_root_unit(),
        }
    }
}

impl InlineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cross_module_inlining(mut self, enabled: bool) -> Self {
        self.cross_module_inlining = enabled;
        self
    }

    pub fn with_optimizer_inlining(mut self, enabled: bool) -> Self {
        self.optimizer_inlining = enabled;
        self
    }

    pub fn with_statement_threshold(mut self, threshold: u32) -> Self {
        self.statement_threshold = threshold;
        self
    }

    pub fn with_runtime_root_unit(mut self, name: impl Into<String>) -> Self {
        self.runtime_root_unit = name.into();
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        // The settings may sit under an `[inlining]` table.
        let mut table: toml::Table = toml::from_str(content)?;
        let config: Self = match table.remove("inlining") {
            Some(inlining) => inlining.try_into()?,
            None => toml::Value::Table(table).try_into()?,
        };
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
