use thiserror::Error;

/// Failure of a persistent key/value write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },

    #[error("Storage operation failed: {operation} - {reason}")]
    OperationFailed { operation: String, reason: String },

    #[error("Serialization failed for {key}: {reason}")]
    Serialization { key: String, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn operation_failed(operation: &str, reason: impl ToString) -> Self {
        StorageError::OperationFailed {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}
