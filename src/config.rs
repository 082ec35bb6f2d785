use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::clustering::kmeans::KMeansParams;
use crate::error::PlatterError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4.1-mini";

/// Tuning knobs for the clustering engine.
///
/// Passed into the engine on every call, so different batches (and tests)
/// can run with different thresholds side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum representative cosine similarity for two clusters to merge.
    /// Lower it if one dish still shows up split; raise it if distinct
    /// dishes get merged.
    pub merge_similarity_threshold: f64,
    /// Extra similarity above the threshold that lets clusters merge even
    /// when their normalized keys don't contain one another.
    pub key_guard_margin: f64,
    /// Largest cluster count considered by the search.
    pub max_clusters: usize,
    /// Score penalty per cluster beyond two, biasing the search toward
    /// fewer, broader items.
    pub cluster_penalty: f64,
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            merge_similarity_threshold: 0.88,
            key_guard_margin: 0.03,
            max_clusters: 50,
            cluster_penalty: 0.01,
            max_iterations: 100,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn kmeans_params(&self) -> KMeansParams {
        KMeansParams {
            max_iterations: self.max_iterations,
            seed: self.seed,
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// Secrets only come from the environment. The .env file is loaded at
/// startup via dotenvy.
pub struct Config {
    pub openai_api_key: String,
    /// Base URL of an OpenAI-compatible API (defaults to api.openai.com/v1)
    pub openai_base_url: String,
    pub embedding_model: String,
    /// Chat model used to pull item names and sentiment out of review text
    pub extraction_model: String,
    pub request_timeout: Duration,
    /// Where processed reviews are stored, one JSON file per place
    pub data_dir: PathBuf,
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything except the API key has a default. A malformed numeric
    /// override is an error rather than being silently ignored.
    pub fn load() -> Result<Self> {
        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            merge_similarity_threshold: parse_env(
                "PLATTER_MERGE_THRESHOLD",
                defaults.merge_similarity_threshold,
            )?,
            max_clusters: parse_env("PLATTER_MAX_CLUSTERS", defaults.max_clusters)?,
            seed: parse_env("PLATTER_SEED", defaults.seed)?,
            ..defaults
        };

        if engine.max_clusters < 2 {
            anyhow::bail!(
                "PLATTER_MAX_CLUSTERS must be at least 2 (got {})",
                engine.max_clusters
            );
        }

        let data_dir = env::var("PLATTER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            embedding_model: env::var("PLATTER_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            extraction_model: env::var("PLATTER_EXTRACTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_EXTRACTION_MODEL.to_string()),
            request_timeout: Duration::from_secs(parse_env("PLATTER_REQUEST_TIMEOUT_SECS", 30)?),
            data_dir,
            engine,
        })
    }

    /// Check that the OpenAI API key is configured.
    /// Call this before building any client that talks to the provider.
    pub fn require_openai(&self) -> std::result::Result<(), PlatterError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(PlatterError::Configuration(
                "OPENAI_API_KEY not set. Add it to your .env file.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default storage location: the platform data dir, else ./data.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("platter"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        _ => Ok(default),
    }
}
