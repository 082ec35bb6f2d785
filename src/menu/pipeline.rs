// Menu pipeline: rows in, ranked menu out.
//
//   reviews -> rows -> embeddings -> k -> k-means -> representatives
//           -> merge -> aggregate
//
// The embedding request is the only await point. Everything after it is
// synchronous CPU work over data owned by this call, so separate batches
// (different places) can run concurrently without coordination.

use tracing::{debug, info};

use super::aggregate::aggregate_groups;
use super::models::{prepare_rows, ItemRow, MenuCategory, MenuItem, ProcessedReview};
use crate::clustering::{build_clusters, choose_cluster_count, kmeans, merge_clusters};
use crate::config::EngineConfig;
use crate::embedding::EmbeddingClient;
use crate::error::{PlatterError, Result};

#[derive(Clone)]
pub struct MenuEngine {
    embeddings: EmbeddingClient,
    config: EngineConfig,
}

impl MenuEngine {
    pub fn new(embeddings: EmbeddingClient, config: EngineConfig) -> Self {
        Self { embeddings, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Group extracted (item, rating) pairs into ranked menu items.
    ///
    /// Rows without a usable item name or with a non-finite rating are
    /// dropped. If nothing survives, the result is a single empty
    /// "Menu Items" category and the provider is never called.
    pub async fn build_menu(&self, reviews: &[ProcessedReview]) -> Result<Vec<MenuCategory>> {
        let rows = prepare_rows(reviews);
        if rows.is_empty() {
            debug!(input = reviews.len(), "No usable rows, returning empty menu");
            return Ok(vec![MenuCategory::empty()]);
        }

        let raw_texts: Vec<String> = rows.iter().map(|r| r.raw_text.clone()).collect();
        let embeddings = self.embeddings.embed_items(&raw_texts).await?;

        let items = cluster_rows(&rows, &embeddings, &self.config)?;
        info!(
            rows = rows.len(),
            dropped = reviews.len() - rows.len(),
            items = items.len(),
            "Built menu"
        );

        Ok(vec![MenuCategory::items(items)])
    }
}

/// Cluster rows whose embeddings are already known into menu items.
///
/// `embeddings[i]` belongs to `rows[i]`; any other pairing is rejected with
/// `EmbeddingCountMismatch`.
pub fn cluster_rows(
    rows: &[ItemRow],
    embeddings: &[Vec<f64>],
    config: &EngineConfig,
) -> Result<Vec<MenuItem>> {
    if embeddings.len() != rows.len() {
        return Err(PlatterError::EmbeddingCountMismatch {
            expected: rows.len(),
            actual: embeddings.len(),
        });
    }
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let k = choose_cluster_count(embeddings, config);
    let partition = kmeans(embeddings, k, config.kmeans_params())?;

    let texts: Vec<String> = rows.iter().map(|r| r.raw_text.clone()).collect();
    let clusters = build_clusters(&partition, embeddings, &texts);
    let groups = merge_clusters(&clusters, config);

    debug!(
        k,
        clusters = clusters.len(),
        groups = groups.len(),
        iterations = partition.iterations,
        "Clustered item rows"
    );

    Ok(aggregate_groups(&groups, rows))
}
