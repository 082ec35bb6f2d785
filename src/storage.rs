// Per-place storage of processed reviews.
//
// Each place gets one JSON file named after the SHA-256 of its place id, so
// arbitrary ids (URLs, provider ids with slashes) are always safe file names.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::menu::ProcessedReview;

/// What gets written to disk for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReviews {
    pub place_id: String,
    pub hash: String,
    pub processed_at: DateTime<Utc>,
    pub reviews: Vec<ProcessedReview>,
}

pub struct ReviewStore {
    data_dir: PathBuf,
}

impl ReviewStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, place_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", hash_place_id(place_id)))
    }

    /// Write (or overwrite) the processed reviews for a place. Returns the
    /// file path written.
    pub async fn save(&self, place_id: &str, reviews: &[ProcessedReview]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("Failed to create data dir {}", self.data_dir.display()))?;

        let stored = StoredReviews {
            place_id: place_id.to_string(),
            hash: hash_place_id(place_id),
            processed_at: Utc::now(),
            reviews: reviews.to_vec(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        let path = self.path_for(place_id);
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(place_id, path = %path.display(), reviews = reviews.len(), "Saved processed reviews");
        Ok(path)
    }

    /// Load the stored reviews for a place, or `None` if nothing was saved.
    pub async fn load(&self, place_id: &str) -> Result<Option<StoredReviews>> {
        let path = self.path_for(place_id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let stored = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(stored))
    }
}

/// Hex-encoded SHA-256 of a place id.
pub fn hash_place_id(place_id: &str) -> String {
    hex::encode(Sha256::digest(place_id.as_bytes()))
}
