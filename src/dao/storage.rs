use std::error::Error;
use thiserror::Error;

/// Result alias for score store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by score stores regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not complete the request (connectivity, provisioning, decoding).
    #[error("{backend} store unavailable: {message}")]
    Unavailable {
        /// Identifier of the backend that failed.
        backend: &'static str,
        /// Human readable context for the failure.
        message: String,
        /// Underlying driver error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Wrap any backend failure into an unavailable error tagged with its backend.
    pub fn unavailable(
        backend: &'static str,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Unavailable {
            backend,
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Backend that produced the error.
    pub fn backend(&self) -> &'static str {
        match self {
            StorageError::Unavailable { backend, .. } => backend,
        }
    }
}
