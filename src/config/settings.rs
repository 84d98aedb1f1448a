use crate::errors::{Result, StackedError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub review: ReviewConfig,
    pub git: GitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// The review tool invoked for submit/land
    pub program: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Whether push operations rebase the target patch by default
    pub rebase_on_push: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            review: ReviewConfig::default(),
            git: GitConfig::default(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            program: "arc".to_string(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            rebase_on_push: true,
        }
    }
}

impl Settings {
    /// Load settings from a file, falling back to defaults when absent
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| StackedError::config(format!("Failed to read config file: {e}")))?;

        let settings: Settings = serde_json::from_str(&content)
            .map_err(|e| StackedError::config(format!("Failed to parse config file: {e}")))?;

        Ok(settings)
    }

    /// Save settings to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StackedError::config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)
            .map_err(|e| StackedError::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
