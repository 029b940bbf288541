use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathPayError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Compare list is full: at most {capacity} loans can be compared")]
    CompareListFull { capacity: usize },

    #[error("Index {index} is out of range for a list of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PathPayError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        PathPayError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PathPayError {
    fn from(e: serde_json::Error) -> Self {
        PathPayError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for PathPayError {
    fn from(e: std::io::Error) -> Self {
        PathPayError::Storage(e.to_string())
    }
}
