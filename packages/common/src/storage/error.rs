use thiserror::Error;

/// Errors that can occur during fragment storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing was stored under the requested key.
    #[error("no entry for owner '{owner_id}' and id '{id}'")]
    NotFound { owner_id: String, id: String },

    /// The key cannot be used to address storage (e.g. path separators in an id).
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A metadata record could not be encoded or decoded.
    #[error("metadata serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The data exceeds the configured size limit.
    #[error("fragment data exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}

impl StorageError {
    pub fn not_found(owner_id: &str, id: &str) -> Self {
        Self::NotFound {
            owner_id: owner_id.to_string(),
            id: id.to_string(),
        }
    }
}
