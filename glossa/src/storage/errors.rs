//! Error types for storage operations

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error
    #[error("Query error: {0}")]
    Query(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Data not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item already exists (unique constraint)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Temporary/transient error
    #[error("Temporary error: {0}")]
    Temporary(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl StorageError {
    /// Whether the failure is transient and the operation may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::Connection(_) | StorageError::Timeout(_) | StorageError::Temporary(_)
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Convert a JSON error to a storage error
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Convert a standard IO error to a storage error
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Connection(err.to_string())
    }
}
