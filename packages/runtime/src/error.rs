use makestyles_css::CssError;
use thiserror::Error;

pub type StyleResult<T> = Result<T, StyleError>;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Definition list registers {count} matcher conditions, at most {max} are supported")]
    TooManyMatchers { count: usize, max: usize },

    #[error("Invalid style: {0}")]
    InvalidStyle(#[from] CssError),

    #[error("Invalid tokens: {message}")]
    InvalidTokens { message: String },

    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StyleError {
    pub fn invalid_tokens(message: impl Into<String>) -> Self {
        Self::InvalidTokens {
            message: message.into(),
        }
    }

    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
        }
    }
}
