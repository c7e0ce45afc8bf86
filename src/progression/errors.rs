use thiserror::Error;

/// Errors that can arise while persisting or applying character progression.
#[derive(Debug, Error)]
pub enum ProgressionError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around JSON serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when a catalog lookup (career, quest, achievement) fails.
    #[error("not found: {0}")]
    NotFound(String),

    /// The character does not meet the skill thresholds for a career or quest.
    #[error("requirements not met: {0}")]
    RequirementsNotMet(String),

    /// Caller-supplied value rejected before touching the record.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
