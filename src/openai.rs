// OpenAI-compatible HTTP client shared by the embedder and the extractor.
//
// A thin reqwest wrapper with bearer auth, a request timeout, and a JSON POST
// helper that retries rate limits, server errors and transport failures with
// exponential backoff. Anything else fails immediately.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{PlatterError, Result};

/// Attempts per request, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// A request that failed for good: non-retryable status, exhausted retries,
/// transport error, or an unparseable body.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RequestError(String);

#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    max_attempts: usize,
}

impl OpenAiClient {
    /// Build a client for `base_url` (e.g. `https://api.openai.com/v1`).
    ///
    /// Fails with a configuration error for a blank or unusable key, before
    /// anything touches the network.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PlatterError::Configuration(
                "OPENAI_API_KEY not set. Add it to your .env file.".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| PlatterError::Configuration("OPENAI_API_KEY is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .user_agent(concat!("platter/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| PlatterError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_openai()?;
        Self::new(
            &config.openai_api_key,
            &config.openai_base_url,
            config.request_timeout,
        )
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body to `path` and deserialize the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> std::result::Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(url = url.as_str(), attempt, "POST request");

            let failure = match self.client.post(&url).json(body).send().await {
                Ok(response) if response.status().is_success() => {
                    return response
                        .json::<T>()
                        .await
                        .map_err(|e| RequestError(format!("failed to parse response from {url}: {e}")));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    let message = format!("{url} returned {status}: {body}");
                    if !is_retryable_status(status) {
                        return Err(RequestError(message));
                    }
                    message
                }
                Err(e) => {
                    let message = if e.is_timeout() {
                        format!("request to {url} timed out")
                    } else {
                        format!("request to {url} failed: {e}")
                    };
                    if !(e.is_timeout() || e.is_connect() || e.is_request()) {
                        return Err(RequestError(message));
                    }
                    message
                }
            };

            if attempt >= self.max_attempts {
                return Err(RequestError(failure));
            }

            let delay = retry_backoff(attempt);
            warn!(attempt, delay_ms = delay.as_millis() as u64, error = failure.as_str(), "Retrying request");
            tokio::time::sleep(delay).await;
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(500 * (1 << capped))
}
