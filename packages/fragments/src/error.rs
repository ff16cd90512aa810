use common::StorageError;
use thiserror::Error;

use crate::convert::ConvertError;
use crate::ingest::IngestionError;

/// Errors surfaced by fragment operations.
///
/// Every variant is terminal for the operation that produced it; nothing in
/// this crate retries.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Construction input broke an invariant (missing owner, unsupported type, ...).
    #[error("invalid fragment: {0}")]
    Validation(String),

    /// The body does not match its declared Content-Type.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error("fragment '{id}' does not exist")]
    NotFound { id: String },

    #[error("fragment '{id}' of type '{from}' cannot be converted to '.{to}'")]
    UnsupportedConversion { id: String, from: String, to: String },

    #[error(
        "fragment '{id}' has type '{stored}' and cannot be updated with '{declared}'; \
         a fragment's type cannot change after it is created"
    )]
    TypeImmutable {
        id: String,
        stored: String,
        declared: String,
    },

    /// A legal conversion failed on the stored bytes.
    #[error("failed to convert fragment '{id}': {source}")]
    Conversion {
        id: String,
        #[source]
        source: ConvertError,
    },

    /// Metadata exists but the data namespace has nothing for the same key.
    #[error("fragment '{id}' has metadata but no stored data")]
    MissingData { id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FragmentError {
    pub(crate) fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, FragmentError>;
