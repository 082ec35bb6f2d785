// Cosine-distance silhouette score.
//
// For each point:
//   a = mean distance to the other members of its own cluster (0 if alone)
//   b = smallest mean distance to the members of any other cluster
//   s = (b - a) / max(a, b)
// and the overall score is the mean of s over all points.
//
// Degenerate pairs (see `cosine_distance`) are infinitely far apart. A point
// whose every other cluster is infinitely far scores 0. Otherwise the formula
// is applied as-is, so an infinite `a` or `a = b = 0` yields NaN and poisons
// the whole score; the selector treats such a labeling as a failed trial.

use std::collections::BTreeMap;

use super::similarity::DistanceMatrix;

/// Score a labeling against precomputed distances.
///
/// Returns -1.0 when fewer than two distinct labels are present, since a
/// single cluster says nothing about separation.
pub fn silhouette_score(distances: &DistanceMatrix, labels: &[usize]) -> f64 {
    let n = labels.len();
    if n == 0 || distances.len() != n {
        return -1.0;
    }

    let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        clusters.entry(label).or_default().push(idx);
    }
    if clusters.len() < 2 {
        return -1.0;
    }

    let total: f64 = (0..n)
        .map(|i| point_score(distances, &clusters, i, labels[i]))
        .sum();
    total / n as f64
}

fn point_score(
    distances: &DistanceMatrix,
    clusters: &BTreeMap<usize, Vec<usize>>,
    point: usize,
    label: usize,
) -> f64 {
    let mut a = 0.0;
    let mut b = f64::INFINITY;

    for (&other, members) in clusters {
        if other == label {
            let peers = members.len() - 1;
            if peers > 0 {
                let sum: f64 = members
                    .iter()
                    .filter(|&&j| j != point)
                    .map(|&j| distances.get(point, j))
                    .sum();
                a = sum / peers as f64;
            }
        } else {
            let sum: f64 = members.iter().map(|&j| distances.get(point, j)).sum();
            b = b.min(sum / members.len() as f64);
        }
    }

    if b.is_infinite() {
        return 0.0;
    }
    (b - a) / a.max(b)
}
