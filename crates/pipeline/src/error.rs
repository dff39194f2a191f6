use proofsheet_core::error::CoreError;
use proofsheet_replicate::api::ReplicateError;

/// Why a cell's image could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Parameter validation or grid computation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Image service error: {0}")]
    Replicate(#[from] ReplicateError),

    #[error("Image decoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The dispatcher is shutting down.
    #[error("Generation cancelled")]
    Cancelled,
}
