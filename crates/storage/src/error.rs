use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The object or its container does not exist.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Transport or auth failure against the storage provider.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("invalid object path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
