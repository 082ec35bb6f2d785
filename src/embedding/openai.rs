// OpenAI embeddings provider.
//
// One POST to {base}/embeddings per batch. Entries are re-sorted by their
// `index` field before being returned, since ordering is part of the
// provider contract the engine relies on.
//
// API docs: https://platform.openai.com/docs/api-reference/embeddings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::EmbeddingProvider;
use crate::config::Config;
use crate::error::{PlatterError, Result};
use crate::openai::OpenAiClient;

pub struct OpenAiEmbedder {
    client: OpenAiClient,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build an embedder from configuration. Fails with a configuration
    /// error when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.embedding_model.trim().is_empty() {
            return Err(PlatterError::Configuration(
                "PLATTER_EMBEDDING_MODEL is empty".to_string(),
            ));
        }
        let client = OpenAiClient::from_config(config)?;
        Ok(Self::new(client, config.embedding_model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbeddingResponse = self
            .client
            .post_json("embeddings", &request)
            .await
            .map_err(|e| PlatterError::EmbeddingUnavailable(e.to_string()))?;

        debug!(
            model = self.model.as_str(),
            inputs = texts.len(),
            returned = response.data.len(),
            "Received embeddings"
        );

        Ok(into_ordered_vectors(response))
    }
}

fn into_ordered_vectors(mut response: EmbeddingResponse) -> Vec<Vec<f64>> {
    response.data.sort_by_key(|entry| entry.index);
    response
        .data
        .into_iter()
        .map(|entry| entry.embedding)
        .collect()
}

// --- OpenAI request/response types ---

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let input = vec!["guac".to_string(), "fish taco".to_string()];
        let request = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: &input,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"][1], "fish taco");
    }

    #[test]
    fn test_response_is_reordered_by_index() {
        let body = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        }"#;
        let response: EmbeddingResponse = serde_json::from_str(body).unwrap();
        let vectors = into_ordered_vectors(response);
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }
}
