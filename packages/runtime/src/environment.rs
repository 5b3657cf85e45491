//! Runtime environment capabilities

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

/// Environment variable that overrides CSS custom-property support detection
pub const CSS_VARIABLES_ENV: &str = "MAKESTYLES_CSS_VARIABLES";

/// Capabilities of the styling engine that will consume the injected rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Whether `var(--...)` references are resolved by the styling engine.
    ///
    /// When `true`, token-dependent styles compile once against variable
    /// references and are reused forever. When `false`, they are compiled per
    /// token object.
    #[serde(default = "default_css_variables")]
    pub css_variables: bool,
}

fn default_css_variables() -> bool {
    true
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            css_variables: default_css_variables(),
        }
    }
}

impl Environment {
    /// An environment without CSS custom-property support
    pub fn fallback() -> Self {
        Self {
            css_variables: false,
        }
    }

    /// Read capabilities from the process environment
    pub fn detect() -> Self {
        match std::env::var(CSS_VARIABLES_ENV) {
            Ok(raw) => match parse_flag(&raw) {
                Some(css_variables) => Self { css_variables },
                None => {
                    warn!(value = %raw, "Unrecognized {} value, assuming support", CSS_VARIABLES_ENV);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Capabilities detected once for the whole process
    pub fn current() -> Self {
        static CURRENT: OnceLock<Environment> = OnceLock::new();
        *CURRENT.get_or_init(Environment::detect)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
