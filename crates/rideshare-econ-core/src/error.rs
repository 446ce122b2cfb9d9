use thiserror::Error;

#[derive(Debug, Error)]
pub enum RideEconError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RideEconError {
    fn from(e: serde_json::Error) -> Self {
        RideEconError::SerializationError(e.to_string())
    }
}
