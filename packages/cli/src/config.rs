use anyhow::Context;
use makestyles_runtime::{Environment, Tokens};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "makestyles.config.json";

/// makestyles configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Whether the target styling engine resolves `var(--...)` references
    #[serde(default = "default_css_variables")]
    pub css_variables: bool,

    /// Render right-to-left by default
    #[serde(default)]
    pub rtl: bool,

    /// Token file, relative to the config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<String>,
}

fn default_css_variables() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", DEFAULT_CONFIG_NAME))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn environment(&self) -> Environment {
        Environment {
            css_variables: self.css_variables,
        }
    }

    /// Token file to use: `explicit` wins over the configured one
    pub fn tokens_path(&self, cwd: &str, explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => self.tokens.as_ref().map(|path| PathBuf::from(cwd).join(path)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            css_variables: default_css_variables(),
            rtl: false,
            tokens: None,
        }
    }
}

/// Read a JSON token file, or empty tokens when there is none
pub fn load_tokens(path: Option<&Path>) -> anyhow::Result<Tokens> {
    let Some(path) = path else {
        return Ok(Tokens::new());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tokens from {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(Tokens::from_json(&value)?)
}
