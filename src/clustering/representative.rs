// Representative selection: label each cluster with its most central member.

use super::kmeans::Partition;
use super::similarity::cosine_distance;

/// A non-empty k-means cluster with its chosen label.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// The k-means label this cluster came from.
    pub id: usize,
    /// Row indices, ascending.
    pub member_indices: Vec<usize>,
    pub centroid: Vec<f64>,
    /// Raw text of the member closest to the centroid.
    pub representative_text: String,
    pub representative_embedding: Vec<f64>,
}

/// Build one [`Cluster`] per non-empty label, in label order.
///
/// `embeddings` and `texts` are indexed by row, matching `partition.labels`.
pub fn build_clusters(partition: &Partition, embeddings: &[Vec<f64>], texts: &[String]) -> Vec<Cluster> {
    partition
        .members()
        .into_iter()
        .enumerate()
        .filter(|(_, members)| !members.is_empty())
        .map(|(id, members)| {
            let centroid = partition.centroids[id].clone();
            let rep = pick_representative(&members, &centroid, embeddings);
            Cluster {
                id,
                representative_text: texts[rep].clone(),
                representative_embedding: embeddings[rep].clone(),
                member_indices: members,
                centroid,
            }
        })
        .collect()
}

/// Index of the member with the smallest cosine distance to `centroid`.
/// Ties (including all-infinite distances) go to the first member.
pub fn pick_representative(members: &[usize], centroid: &[f64], embeddings: &[Vec<f64>]) -> usize {
    let mut best = members[0];
    let mut best_dist = f64::INFINITY;
    for &idx in members {
        let d = cosine_distance(&embeddings[idx], centroid);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}
