//! Error types for shelf-storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cart version conflict: expected {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StorageError> for shelf_core::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => shelf_core::Error::Io(e),
            StorageError::Serialization(e) => shelf_core::Error::Serialization(e),
            StorageError::Conflict { expected, found } => {
                shelf_core::Error::CartConflict { expected, found }
            }
            StorageError::Other(e) => shelf_core::Error::Other(e),
        }
    }
}
