use thiserror::Error;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Product unavailable: {0}")]
    ProductUnavailable(String),

    #[error("Invalid loan state: {0}")]
    InvalidState(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LendingError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LendingError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        LendingError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for LendingError {
    fn from(e: serde_json::Error) -> Self {
        LendingError::SerializationError(e.to_string())
    }
}
