//! Configuration for inspection and formatter registration.
//!
//! Every field has a default matching the behaviour hosts expect out of
//! the box; a JSON file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InspectError, Result};

/// Default visualizer category all hooks are registered under.
pub const DEFAULT_CATEGORY: &str = "ArrowRs";
/// Default name of the script module hosting the lookup functions.
pub const DEFAULT_LOOKUP_MODULE: &str = "arrow_lens_lookup";

/// Master configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Visualizer category the hooks are grouped under.
    pub category: String,
    /// Script module name used when rendering registration commands.
    pub lookup_module: String,
    /// Maximum number of pointer levels unwrapped before classification.
    pub max_pointer_depth: usize,
    /// Maximum typedef steps taken when a generic parameter reports size 0.
    pub max_typedef_depth: usize,
    /// Retry provider construction against the original handle when the
    /// pointer-unwrapped one fails.
    pub retry_original_handle: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            lookup_module: DEFAULT_LOOKUP_MODULE.to_string(),
            max_pointer_depth: 16,
            max_typedef_depth: 8,
            retry_original_handle: true,
        }
    }
}

impl InspectConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| InspectError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| InspectError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Reject settings no inspection could work with.
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(InspectError::Config("category must not be empty".into()));
        }
        if self.lookup_module.trim().is_empty() {
            return Err(InspectError::Config("lookup_module must not be empty".into()));
        }
        if self.max_pointer_depth == 0 {
            return Err(InspectError::Config(
                "max_pointer_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
