use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("No identity signal available to resolve an annotation key")]
    UnresolvableKey,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Cart request failed: {0}")]
    CartRequest(String),

    #[error("Update for cart line {line} failed: {reason}")]
    LineUpdate { line: usize, reason: String },

    #[error("Cart request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
