use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("goal number must be between 1 and 17, got {0}")]
    InvalidGoalNumber(i64),

    #[error("relevance score must be between 0 and 100, got {0}")]
    InvalidScore(i64),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("{field} out of range: {message}")]
    OutOfRange { field: String, message: String },
}
