use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcHubError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CalcHubError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CalcHubError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CalcHubError {
    fn from(e: serde_json::Error) -> Self {
        CalcHubError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for CalcHubError {
    fn from(e: std::io::Error) -> Self {
        CalcHubError::Storage(e.to_string())
    }
}
