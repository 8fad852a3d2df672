use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("provider invocation failed: {0}")]
    Invocation(String),

    #[error("provider rate limited the request")]
    RateLimited,

    #[error("provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("provider config error: {0}")]
    Config(String),
}
