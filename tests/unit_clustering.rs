// Unit tests for the clustering building blocks.
//
// Covers cluster-count selection on well-separated data, silhouette edge
// cases over a precomputed distance matrix, merge rules around the key
// guard, and the display helpers used when aggregating.

use platter::clustering::merge::should_merge;
use platter::clustering::selector::{evaluate_candidates, search_upper_bound};
use platter::clustering::silhouette::silhouette_score;
use platter::clustering::similarity::DistanceMatrix;
use platter::clustering::{
    build_clusters, choose_cluster_count, cosine_distance, cosine_similarity, kmeans,
    KMeansParams, UnionFind,
};
use platter::config::EngineConfig;
use platter::menu::aggregate::{display_name, round_to_tenth};

/// Three tight groups on orthogonal axes, three points each.
fn three_groups() -> Vec<Vec<f64>> {
    let mut points = Vec::new();
    for axis in 0..3 {
        for wobble in [0.0, 0.02, 0.04] {
            let mut v = vec![0.0; 3];
            v[axis] = 1.0;
            v[(axis + 1) % 3] = wobble;
            points.push(v);
        }
    }
    points
}

// ============================================================
// Cluster-count selection
// ============================================================

#[test]
fn upper_bound_is_half_the_points() {
    assert_eq!(search_upper_bound(9, 50), 4);
    assert_eq!(search_upper_bound(100, 50), 50);
}

#[test]
fn upper_bound_never_below_two_for_small_inputs() {
    assert_eq!(search_upper_bound(3, 50), 2);
    assert_eq!(search_upper_bound(2, 50), 2);
}

#[test]
fn upper_bound_respects_config_cap() {
    assert_eq!(search_upper_bound(40, 5), 5);
}

#[test]
fn selects_the_natural_group_count() {
    let config = EngineConfig::default();
    assert_eq!(choose_cluster_count(&three_groups(), &config), 3);
}

#[test]
fn candidates_cover_two_through_upper_bound() {
    let config = EngineConfig::default();
    let ks: Vec<usize> = evaluate_candidates(&three_groups(), &config)
        .iter()
        .map(|c| c.k)
        .collect();
    assert_eq!(ks, vec![2, 3, 4]);
}

#[test]
fn tiny_inputs_skip_the_search() {
    let config = EngineConfig::default();
    assert_eq!(choose_cluster_count(&[], &config), 1);
    assert_eq!(choose_cluster_count(&[vec![1.0, 0.0]], &config), 1);
    assert_eq!(
        choose_cluster_count(&[vec![1.0, 0.0], vec![0.0, 1.0]], &config),
        2
    );
}

#[test]
fn identical_points_fall_back_to_two() {
    // Every trial collapses to a single label, which scores -1; the smallest
    // k still wins the tie.
    let points = vec![vec![1.0, 1.0]; 6];
    let config = EngineConfig::default();
    assert_eq!(choose_cluster_count(&points, &config), 2);
}

// ============================================================
// Silhouette
// ============================================================

#[test]
fn silhouette_near_one_for_separated_groups() {
    let points = three_groups();
    let distances = DistanceMatrix::new(&points);
    let labels = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
    let score = silhouette_score(&distances, &labels);
    assert!(score > 0.95, "score = {score}");
}

#[test]
fn silhouette_negative_for_scrambled_labels() {
    let points = three_groups();
    let distances = DistanceMatrix::new(&points);
    let labels = vec![0, 1, 2, 0, 1, 2, 0, 1, 2];
    assert!(silhouette_score(&distances, &labels) < 0.0);
}

#[test]
fn silhouette_single_label_is_minus_one() {
    let distances = DistanceMatrix::new(&three_groups());
    assert_eq!(silhouette_score(&distances, &[0; 9]), -1.0);
}

#[test]
fn silhouette_label_length_mismatch_is_minus_one() {
    let distances = DistanceMatrix::new(&three_groups());
    assert_eq!(silhouette_score(&distances, &[0, 1]), -1.0);
}

#[test]
fn silhouette_all_singletons_scores_one() {
    // Singletons have a = 0, so each point scores (b - 0) / b = 1.
    let points = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.6, 0.8]];
    let distances = DistanceMatrix::new(&points);
    let score = silhouette_score(&distances, &[0, 1, 2]);
    assert!((score - 1.0).abs() < 1e-12, "score = {score}");
}

// ============================================================
// Similarity
// ============================================================

#[test]
fn similarity_of_mismatched_lengths_is_minus_one() {
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), -1.0);
}

#[test]
fn similarity_with_zero_vector_is_minus_one() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), -1.0);
}

#[test]
fn distance_is_symmetric_and_zero_on_self() {
    let a = [0.3, 0.9, 0.1];
    let b = [0.7, 0.2, 0.4];
    assert!(cosine_distance(&a, &a).abs() < 1e-12);
    assert_eq!(cosine_distance(&a, &b), cosine_distance(&b, &a));
}

#[test]
fn degenerate_pair_is_infinitely_far() {
    assert!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]).is_infinite());
}

// ============================================================
// K-means and representatives
// ============================================================

#[test]
fn kmeans_labels_every_point_within_range() {
    let points = three_groups();
    let partition = kmeans(&points, 3, KMeansParams::default()).unwrap();
    assert_eq!(partition.labels.len(), points.len());
    assert!(partition.labels.iter().all(|&l| l < 3));
    assert_eq!(partition.centroids.len(), 3);
}

#[test]
fn kmeans_recovers_separated_groups() {
    let points = three_groups();
    let partition = kmeans(&points, 3, KMeansParams::default()).unwrap();
    for group in partition.labels.chunks(3) {
        assert!(group.iter().all(|&l| l == group[0]), "{:?}", partition.labels);
    }
}

#[test]
fn kmeans_same_seed_same_labels() {
    let points = three_groups();
    let params = KMeansParams {
        max_iterations: 100,
        seed: 7,
    };
    let a = kmeans(&points, 4, params).unwrap();
    let b = kmeans(&points, 4, params).unwrap();
    assert_eq!(a.labels, b.labels);
}

#[test]
fn kmeans_rejects_k_above_n() {
    let points = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    assert!(kmeans(&points, 3, KMeansParams::default()).is_err());
}

#[test]
fn every_member_lands_in_exactly_one_cluster() {
    let points = three_groups();
    let texts: Vec<String> = (0..points.len()).map(|i| format!("dish {i}")).collect();
    let partition = kmeans(&points, 3, KMeansParams::default()).unwrap();
    let clusters = build_clusters(&partition, &points, &texts);

    let mut seen: Vec<usize> = clusters
        .iter()
        .flat_map(|c| c.member_indices.iter().copied())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..points.len()).collect::<Vec<_>>());

    for cluster in &clusters {
        assert!(texts.contains(&cluster.representative_text));
    }
}

// ============================================================
// Merge rules
// ============================================================

#[test]
fn union_find_joins_transitively() {
    let mut sets = UnionFind::new(4);
    assert!(sets.union(0, 1));
    assert!(sets.union(1, 2));
    assert!(!sets.union(0, 2));
    assert_eq!(sets.find(0), sets.find(2));
    assert_ne!(sets.find(0), sets.find(3));
}

#[test]
fn merge_below_threshold_never_happens() {
    let config = EngineConfig::default();
    assert!(!should_merge(
        "tacos",
        &[1.0, 0.0],
        "tacos",
        &[0.0, 1.0],
        &config
    ));
}

#[test]
fn merge_with_matching_keys_needs_only_threshold() {
    // cos = 0.89: past the threshold, short of threshold + margin
    let a = [1.0, 0.0];
    let b = [0.89, (1.0f64 - 0.89 * 0.89).sqrt()];
    let config = EngineConfig::default();
    assert!(should_merge("Fish Tacos", &a, "fish taco", &b, &config));
    assert!(should_merge("taco", &a, "fish taco", &b, &config));
}

#[test]
fn merge_with_unrelated_keys_needs_the_margin() {
    let a = [1.0, 0.0];
    let near = [0.89, (1.0f64 - 0.89 * 0.89).sqrt()];
    let nearer = [0.95, (1.0f64 - 0.95 * 0.95).sqrt()];
    let config = EngineConfig::default();
    assert!(!should_merge("horchata", &a, "agua fresca", &near, &config));
    assert!(should_merge("horchata", &a, "agua fresca", &nearer, &config));
}

// ============================================================
// Aggregation helpers
// ============================================================

#[test]
fn display_name_prefers_shortest_then_first() {
    let reps = vec!["guacamole".to_string(), "guac".to_string(), "taco".to_string()];
    assert_eq!(display_name(&reps), "guac");
    assert_eq!(display_name(&[]), "");
}

#[test]
fn display_name_counts_characters_not_bytes() {
    let reps = vec!["crème".to_string(), "cremes".to_string()];
    assert_eq!(display_name(&reps), "crème");
}

#[test]
fn rounding_half_goes_up() {
    assert_eq!(round_to_tenth(4.25), 4.3);
    assert_eq!(round_to_tenth(3.0), 3.0);
    assert_eq!(round_to_tenth(3.333), 3.3);
}
