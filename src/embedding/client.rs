// Embedding client: normalizes item names, makes one batched provider call,
// and checks the provider kept its side of the contract.

use std::sync::Arc;

use tracing::debug;

use super::traits::EmbeddingProvider;
use crate::error::{PlatterError, Result};
use crate::normalize::normalize_for_embedding;

#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingClient {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Embed raw item names, one vector per name, in input order.
    ///
    /// An empty input returns immediately without calling the provider. A
    /// provider that returns the wrong number of vectors fails the whole
    /// batch with `EmbeddingCountMismatch`.
    pub async fn embed_items(&self, raw_texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if raw_texts.is_empty() {
            return Ok(Vec::new());
        }

        let normalized: Vec<String> = raw_texts
            .iter()
            .map(|t| normalize_for_embedding(t))
            .collect();

        let embeddings = self.provider.embed(&normalized).await?;

        if embeddings.len() != raw_texts.len() {
            return Err(PlatterError::EmbeddingCountMismatch {
                expected: raw_texts.len(),
                actual: embeddings.len(),
            });
        }

        debug!(
            count = embeddings.len(),
            dim = embeddings.first().map(Vec::len).unwrap_or(0),
            "Embedded item names"
        );

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Records what it was asked to embed and returns `extra` more vectors
    /// than requested.
    struct RecordingProvider {
        seen: Mutex<Vec<Vec<String>>>,
        extra: usize,
    }

    #[async_trait]
    impl EmbeddingProvider for RecordingProvider {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
            self.seen.lock().unwrap().push(texts.to_vec());
            Ok(vec![vec![1.0, 0.0]; texts.len() + self.extra])
        }
    }

    struct DownProvider;

    #[async_trait]
    impl EmbeddingProvider for DownProvider {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
            Err(PlatterError::EmbeddingUnavailable("connection refused".to_string()))
        }
    }

    fn recording(extra: usize) -> Arc<RecordingProvider> {
        Arc::new(RecordingProvider {
            seen: Mutex::new(Vec::new()),
            extra,
        })
    }

    #[tokio::test]
    async fn test_normalizes_and_batches_once() {
        let provider = recording(0);
        let client = EmbeddingClient::new(provider.clone());
        let texts = vec!["The Fish Tacos!".to_string(), "Chips & Salsa".to_string()];

        let out = client.embed_items(&texts).await.unwrap();
        assert_eq!(out.len(), 2);

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "expected a single batched call");
        assert_eq!(seen[0], vec!["fish tacos", "chips and salsa"]);
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let provider = recording(0);
        let client = EmbeddingClient::new(provider.clone());
        let out = client.embed_items(&[]).await.unwrap();
        assert!(out.is_empty());
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_mismatch_is_fatal() {
        let client = EmbeddingClient::new(recording(1));
        let err = client
            .embed_items(&["guac".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlatterError::EmbeddingCountMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let client = EmbeddingClient::new(Arc::new(DownProvider));
        let err = client
            .embed_items(&["guac".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, PlatterError::EmbeddingUnavailable(_)));
    }
}
