use thiserror::Error;

pub type CssResult<T> = Result<T, CssError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CssError {
    #[error("Style tree must be an object, found {found}")]
    NotAnObject { found: &'static str },
}

impl CssError {
    pub fn not_an_object(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::NotAnObject { found }
    }
}
