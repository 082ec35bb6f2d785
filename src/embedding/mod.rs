// Embedding: trait-based abstraction over the external embedding provider.
//
// EmbeddingProvider is the swap point. OpenAiEmbedder implements it against
// an OpenAI-compatible /embeddings endpoint; EmbeddingClient wraps any
// provider with normalization and the order/count contract.

pub mod client;
pub mod openai;
pub mod traits;

pub use client::EmbeddingClient;
pub use openai::OpenAiEmbedder;
pub use traits::EmbeddingProvider;
