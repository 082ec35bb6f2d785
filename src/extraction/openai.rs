// OpenAI chat-completions extractor.
//
// Asks the model for a strict JSON object `{item, rating}` where `item` is
// null when the review names no specific food. The rating is clamped into
// 1..=5.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::traits::{ExtractedItem, ReviewExtractor};
use crate::config::Config;
use crate::openai::OpenAiClient;
use crate::output::clip;

pub struct OpenAiExtractor {
    client: OpenAiClient,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OpenAiClient::from_config(config)?;
        Ok(Self::new(client, config.extraction_model.clone()))
    }
}

#[async_trait]
impl ReviewExtractor for OpenAiExtractor {
    async fn extract(&self, text: &str) -> Result<Option<ExtractedItem>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(text),
            }],
            response_format: response_format(),
        };

        let response: ChatResponse = self
            .client
            .post_json("chat/completions", &request)
            .await
            .context("Review extraction request failed")?;

        let extracted = parse_response(response)?;

        debug!(
            item = ?extracted.as_ref().map(|e| e.item.as_str()),
            sentiment = ?extracted.as_ref().map(|e| e.sentiment),
            text_preview = %clip(text, 50),
            "Extracted review"
        );

        Ok(extracted)
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "Analyze this restaurant review and extract:\n\
         1. The specific food item mentioned (e.g., \"pizza\", \"burger\", \"pasta\") - \
         only if a specific food item is mentioned, otherwise return null\n\
         2. The perceived sentiment as a number from 1-5 (1 = very negative, 5 = very positive)\n\n\
         Review text: \"{text}\""
    )
}

fn response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "review_item",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "item": {
                        "type": ["string", "null"],
                        "description": "The food item mentioned in the review, or null if not mentioned"
                    },
                    "rating": {
                        "type": "number",
                        "description": "Perceived sentiment from 1-5"
                    }
                },
                "required": ["item", "rating"],
                "additionalProperties": false
            }
        }
    })
}

fn parse_response(response: ChatResponse) -> Result<Option<ExtractedItem>> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("Extraction response had no message content")?;

    let payload: ExtractionPayload =
        serde_json::from_str(&content).context("Extraction response was not valid JSON")?;

    let item = payload
        .item
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty());

    match item {
        Some(item) if payload.rating.is_finite() => Ok(Some(ExtractedItem {
            item,
            sentiment: payload.rating.clamp(1.0, 5.0),
        })),
        _ => Ok(None),
    }
}

// --- Chat completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: Value,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ExtractionPayload {
    item: Option<String>,
    rating: f64,
}
