//! Storage errors

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored videos are malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("concurrent write detected (expected revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
