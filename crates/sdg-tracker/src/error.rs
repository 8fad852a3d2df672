use thiserror::Error;
use uuid::Uuid;

use sdg_core::error::CoreError;
use sdg_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("activity not found: {0}")]
    NotFound(Uuid),

    #[error("only the author may modify activity {0}")]
    Forbidden(Uuid),

    #[error("activity {0} kept changing; try again")]
    Conflict(Uuid),

    #[error("invalid input: {0}")]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for TrackerError {
    fn from(e: StorageError) -> Self {
        TrackerError::Storage(e)
    }
}
