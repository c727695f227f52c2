use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A reduction (centroid) was requested over zero vectors. Upstream
    /// invariants rule this out, so seeing it means an internal bug.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The record has no vector. Clustering and gap analysis skip these.
    #[error("Missing embedding: {0}")]
    MissingEmbedding(String),
}

impl Error {
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
