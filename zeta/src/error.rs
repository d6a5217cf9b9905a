use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZetaError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ZetaError {
    /// Whether the error comes from an optional collaborator that the
    /// pipeline is expected to route around.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ZetaError::EmbeddingUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, ZetaError>;
