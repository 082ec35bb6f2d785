// Cluster-count selection.
//
// The search is capped at n/2 and each cluster beyond two costs a small
// penalty against the silhouette. Each candidate k is an independent k-means trial; trials run in
// parallel on rayon and only read the shared embeddings and distances.

use rayon::prelude::*;
use tracing::{debug, warn};

use super::kmeans::kmeans;
use super::silhouette::silhouette_score;
use super::similarity::DistanceMatrix;
use crate::config::EngineConfig;

/// Outcome of scoring one candidate cluster count.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub k: usize,
    /// Silhouette minus the size penalty, or `None` if the trial failed.
    pub score: Option<f64>,
}

/// Largest k the search will try for `n` points.
pub fn search_upper_bound(n: usize, max_clusters: usize) -> usize {
    max_clusters.min(n).min((n / 2).max(2))
}

/// Pick the number of clusters for a set of embeddings.
///
/// One point gives 1, two points give 2. Otherwise the best penalized
/// silhouette wins, ties going to the smaller k, and if every trial fails
/// the search falls back to 2.
pub fn choose_cluster_count(embeddings: &[Vec<f64>], config: &EngineConfig) -> usize {
    let n = embeddings.len();
    if n <= 1 {
        return 1;
    }
    if n == 2 {
        return 2;
    }

    let candidates = evaluate_candidates(embeddings, config);
    match best_candidate(&candidates) {
        Some(best) => {
            debug!(n, k = best.k, score = ?best.score, "Selected cluster count");
            best.k
        }
        None => {
            warn!(n, "No cluster count produced a usable partition, falling back to 2");
            2
        }
    }
}

/// The highest-scoring candidate; on equal scores the smaller k wins.
/// `None` if no candidate has a score.
pub fn best_candidate(candidates: &[CandidateScore]) -> Option<&CandidateScore> {
    let mut best: Option<(&CandidateScore, f64)> = None;
    for candidate in candidates {
        let Some(score) = candidate.score else {
            continue;
        };
        let better = match best {
            None => true,
            Some((current, top)) => score > top || (score == top && candidate.k < current.k),
        };
        if better {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Score every candidate k in `2..=upper`, in ascending order of k.
pub fn evaluate_candidates(embeddings: &[Vec<f64>], config: &EngineConfig) -> Vec<CandidateScore> {
    let upper = search_upper_bound(embeddings.len(), config.max_clusters);
    if upper < 2 {
        return Vec::new();
    }

    let distances = DistanceMatrix::new(embeddings);
    let params = config.kmeans_params();

    (2..=upper)
        .into_par_iter()
        .map(|k| {
            let score = match kmeans(embeddings, k, params) {
                Ok(partition) => {
                    let silhouette = silhouette_score(&distances, &partition.labels);
                    let penalized = silhouette - config.cluster_penalty * (k - 2) as f64;
                    debug!(k, silhouette, penalized, "Scored candidate cluster count");
                    Some(penalized).filter(|s| s.is_finite())
                }
                Err(e) => {
                    debug!(k, error = %e, "Skipping candidate cluster count");
                    None
                }
            };
            CandidateScore { k, score }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs(centers: &[[f64; 3]], per: usize) -> Vec<Vec<f64>> {
        let mut points = Vec::new();
        for c in centers {
            for i in 0..per {
                let jitter = 0.01 * i as f64;
                points.push(vec![c[0] + jitter, c[1], c[2] + jitter]);
            }
        }
        points
    }

    #[test]
    fn test_fast_paths() {
        let config = EngineConfig::default();
        assert_eq!(choose_cluster_count(&[], &config), 1);
        assert_eq!(choose_cluster_count(&[vec![1.0, 0.0]], &config), 1);
        assert_eq!(
            choose_cluster_count(&[vec![1.0, 0.0], vec![1.0, 0.0]], &config),
            2
        );
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(search_upper_bound(3, 50), 2);
        assert_eq!(search_upper_bound(10, 50), 5);
        assert_eq!(search_upper_bound(200, 50), 50);
        assert_eq!(search_upper_bound(10, 3), 3);
    }

    #[test]
    fn test_finds_three_separated_groups() {
        let points = blobs(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], 4);
        let k = choose_cluster_count(&points, &EngineConfig::default());
        assert_eq!(k, 3);
    }

    #[test]
    fn test_candidates_are_ordered_by_k() {
        let points = blobs(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], 5);
        let scores = evaluate_candidates(&points, &EngineConfig::default());
        let ks: Vec<usize> = scores.iter().map(|c| c.k).collect();
        assert_eq!(ks, vec![2, 3, 4, 5]);
    }

    fn scored(k: usize, score: Option<f64>) -> CandidateScore {
        CandidateScore { k, score }
    }

    #[test]
    fn test_equal_scores_prefer_smaller_k() {
        let candidates = vec![scored(2, Some(0.4)), scored(3, Some(0.7)), scored(4, Some(0.7))];
        assert_eq!(best_candidate(&candidates).map(|c| c.k), Some(3));

        // Order of evaluation does not matter
        let reversed = vec![scored(4, Some(0.7)), scored(3, Some(0.7)), scored(2, Some(0.4))];
        assert_eq!(best_candidate(&reversed).map(|c| c.k), Some(3));
    }

    #[test]
    fn test_failed_candidates_are_skipped() {
        let candidates = vec![scored(2, None), scored(3, Some(-0.2)), scored(4, None)];
        assert_eq!(best_candidate(&candidates).map(|c| c.k), Some(3));
        assert!(best_candidate(&[scored(2, None)]).is_none());
        assert!(best_candidate(&[]).is_none());
    }

    #[test]
    fn test_all_failed_trials_fall_back_to_two() {
        // Ragged vectors make every k-means trial fail
        let points = vec![vec![1.0, 0.0], vec![0.0], vec![1.0, 1.0], vec![0.5]];
        let scores = evaluate_candidates(&points, &EngineConfig::default());
        assert!(scores.iter().all(|c| c.score.is_none()));
        assert_eq!(choose_cluster_count(&points, &EngineConfig::default()), 2);
    }
}
