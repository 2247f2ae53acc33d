/// Error types shared across the assistant crates.
///
/// These represent failures in infrastructure components (embedding model, vector checks)
/// that more than one crate relies on. Application-specific errors are defined in each
/// binary crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
