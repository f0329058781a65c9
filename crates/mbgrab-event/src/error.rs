/// Errors that can occur while encoding or decoding event records.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured data was tagged for a different event type.
    #[error("event type mismatch (expected {expected}, found {found})")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, EventError>;
