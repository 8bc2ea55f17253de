//! Error types for alchemist storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The access key does not exist.
    #[error("access key not found: {key}")]
    KeyNotFound {
        /// The key that was not found.
        key: String,
    },

    /// The access key identifier is already taken.
    #[error("duplicate access key: {key}")]
    DuplicateKey {
        /// The key that already exists.
        key: String,
    },

    /// A payment record already exists for this session (idempotency).
    #[error("duplicate payment session: {session_id}")]
    DuplicatePayment {
        /// The session id that was already recorded.
        session_id: String,
    },
}
