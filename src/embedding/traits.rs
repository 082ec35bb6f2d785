// Embedding provider trait.
//
// The engine issues a single batched call per invocation; it is the only
// await point in the menu pipeline.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in input order.
    ///
    /// Implementations report transport and provider failures as
    /// `PlatterError::EmbeddingUnavailable`.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}
