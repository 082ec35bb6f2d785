// Review extractor trait: the swap point for whatever model reads reviews.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A raw customer review as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub text: String,
    /// The star rating the reviewer gave, if any.
    #[serde(default)]
    pub rating: Option<f64>,
}

/// What an extractor found in one review.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedItem {
    pub item: String,
    /// Perceived sentiment toward the item, 1 (very negative) to 5 (very positive).
    pub sentiment: f64,
}

#[async_trait]
pub trait ReviewExtractor: Send + Sync {
    /// Extract the food item a review talks about, or `None` if it doesn't
    /// mention one.
    async fn extract(&self, text: &str) -> Result<Option<ExtractedItem>>;
}
