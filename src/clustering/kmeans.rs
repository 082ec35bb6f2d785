// K-means partitioning with k-means++ seeding.
//
// Seeding draws from a StdRng seeded from the caller's seed, so the search
// phase and the final pass produce the same partition for the same k.
// Assignment uses squared Euclidean distance over the raw vectors; centroids
// are arithmetic means. A centroid whose cluster empties keeps its previous
// position, and the empty label is dropped later by representative selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansParams {
    /// Upper bound on Lloyd iterations after seeding.
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            seed: 42,
        }
    }
}

/// Result of one k-means run: a label in `0..k` per point plus the final centroids.
#[derive(Debug, Clone)]
pub struct Partition {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
}

impl Partition {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Point indices grouped by label, in ascending index order. Labels with
    /// no points yield an empty list.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.centroids.len()];
        for (idx, &label) in self.labels.iter().enumerate() {
            if let Some(list) = members.get_mut(label) {
                list.push(idx);
            }
        }
        members
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartitionError {
    #[error("cannot partition an empty set of points")]
    Empty,

    #[error("cannot split {n} points into {k} clusters")]
    InvalidClusterCount { k: usize, n: usize },

    #[error("point {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("point {index} contains a non-finite value")]
    NonFinite { index: usize },
}

/// Partition `points` into `k` clusters.
pub fn kmeans(
    points: &[Vec<f64>],
    k: usize,
    params: KMeansParams,
) -> Result<Partition, PartitionError> {
    validate(points, k)?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut centroids = seed_centroids(points, k, &mut rng);

    let mut labels: Vec<usize> = points
        .iter()
        .map(|p| nearest_centroid(p, &centroids))
        .collect();

    let mut iterations = 0;
    while iterations < params.max_iterations {
        iterations += 1;
        update_centroids(points, &labels, &mut centroids);

        let mut changed = false;
        for (label, point) in labels.iter_mut().zip(points) {
            let best = nearest_centroid(point, &centroids);
            if *label != best {
                *label = best;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // Keep centroids consistent with the returned labels even when the
    // iteration cap stopped us mid-convergence.
    update_centroids(points, &labels, &mut centroids);

    Ok(Partition {
        labels,
        centroids,
        iterations,
    })
}

fn validate(points: &[Vec<f64>], k: usize) -> Result<(), PartitionError> {
    let n = points.len();
    if n == 0 {
        return Err(PartitionError::Empty);
    }
    if k == 0 || k > n {
        return Err(PartitionError::InvalidClusterCount { k, n });
    }

    let expected = points[0].len();
    for (index, point) in points.iter().enumerate() {
        if point.len() != expected {
            return Err(PartitionError::DimensionMismatch {
                index,
                expected,
                actual: point.len(),
            });
        }
        if point.iter().any(|v| !v.is_finite()) {
            return Err(PartitionError::NonFinite { index });
        }
    }
    Ok(())
}

/// k-means++: first centroid uniformly at random, each following one with
/// probability proportional to its squared distance from the nearest chosen
/// centroid. If every point already coincides with a centroid, fall back to a
/// uniform draw (the duplicate centroid ends up empty).
fn seed_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..n)].clone());

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_euclidean(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let next = if total > 0.0 && total.is_finite() {
            weighted_pick(&nearest, rng.random::<f64>() * total)
        } else {
            rng.random_range(0..n)
        };

        let chosen = points[next].clone();
        for (d, p) in nearest.iter_mut().zip(points) {
            let candidate = squared_euclidean(p, &chosen);
            if candidate < *d {
                *d = candidate;
            }
        }
        centroids.push(chosen);
    }

    centroids
}

fn weighted_pick(weights: &[f64], mut target: f64) -> usize {
    for (idx, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return idx;
        }
        target -= w;
    }
    // Floating-point leftovers land on the last positive weight.
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

fn update_centroids(points: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) {
    let dim = centroids.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (s, v) in sums[label].iter_mut().zip(point) {
            *s += v;
        }
    }

    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count == 0 {
            continue;
        }
        let n = count as f64;
        *centroid = sum.into_iter().map(|s| s / n).collect();
    }
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = squared_euclidean(point, centroid);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}

fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
