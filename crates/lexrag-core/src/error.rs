use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index {index} out of range for {len} entries")]
    OutOfRange { index: usize, len: usize },

    #[error("Embedding failed: {0}")]
    EmbeddingFailure(String),

    #[error("Index failure: {0}")]
    IndexFailure(String),

    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn embedding(err: impl std::fmt::Display) -> Self {
        Self::EmbeddingFailure(err.to_string())
    }

    pub fn generation(err: impl std::fmt::Display) -> Self {
        Self::GenerationFailure(err.to_string())
    }

    /// Maps a missing file to `NotFound` and anything else to `Io`.
    pub fn from_io_at(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
