// Cosine similarity and distance between embedding vectors.

/// Cosine similarity between two vectors.
///
/// Returns -1.0 when the vectors have different lengths or either has zero
/// magnitude, so degenerate pairs never look similar.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return -1.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        -1.0
    } else {
        dot / denom
    }
}

/// Cosine distance, `1 - similarity`.
///
/// Pairs with similarity below -0.5 (including zero-norm vectors) are treated
/// as infinitely far apart.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let sim = cosine_similarity(a, b);
    if sim < -0.5 {
        f64::INFINITY
    } else {
        1.0 - sim
    }
}

/// Precomputed symmetric cosine distance matrix over a set of embeddings.
///
/// The cluster-count search scores every candidate k against the same
/// points, so the quadratic distance work is done once and shared read-only
/// across trials.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(embeddings: &[Vec<f64>]) -> Self {
        let n = embeddings.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cosine_distance(&embeddings[i], &embeddings[j]);
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }
        Self { n, values }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }
}
