use crate::persistence::StorageError;

/// Failure of a store operation that could not be recovered locally
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to persist notes: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid notes JSON: {0}")]
    Json(#[from] serde_json::Error),
}
