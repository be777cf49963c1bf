use thiserror::Error;

/// Errors raised while resolving storage keys against the object store
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("storage key is empty")]
    EmptyKey,

    #[error("asset not found for key: {0}")]
    NotFound(String),

    #[error("object store unavailable: {0}")]
    Unavailable(String),
}
