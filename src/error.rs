// Error kinds for the clustering engine.
//
// The CLI and storage plumbing use anyhow; the engine surface is typed.

use thiserror::Error;

use crate::clustering::kmeans::PartitionError;

#[derive(Debug, Error)]
pub enum PlatterError {
    /// Credential or provider setup is missing or invalid. Raised before any
    /// network call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The embedding provider could not be reached, timed out, or returned an
    /// error response.
    #[error("embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The provider returned a different number of vectors than it was sent.
    #[error("embedding provider returned {actual} vectors for {expected} inputs")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    /// The final clustering pass could not partition the embeddings.
    #[error("clustering failed: {0}")]
    Partition(#[from] PartitionError),
}

pub type Result<T> = std::result::Result<T, PlatterError>;
