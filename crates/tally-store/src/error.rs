use tally_types::{ContainerId, ObjectKey};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object does not exist.
    #[error("object not found: {container}/{key}")]
    NotFound {
        container: ContainerId,
        key: ObjectKey,
    },

    /// The container does not exist.
    #[error("no such container: {0}")]
    NoSuchContainer(ContainerId),

    /// The backend cannot address this key.
    #[error("invalid key {key}: {reason}")]
    InvalidKey { key: ObjectKey, reason: String },

    /// Storage backend is read-only or otherwise refuses writes.
    #[error("store is read-only")]
    ReadOnly,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if this error means the object is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
