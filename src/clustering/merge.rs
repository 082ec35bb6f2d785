// Second-pass merge of over-fragmented clusters.
//
// K-means often splits one dish across clusters ("guac" vs "guacamole").
// Every pair of cluster representatives is compared; pairs that are
// semantically close, and whose normalized keys agree or are close enough to
// skip that check, are unioned. Connected components become merged groups.

use tracing::debug;

use super::representative::Cluster;
use super::similarity::cosine_similarity;
use crate::config::EngineConfig;
use crate::normalize::normalize_for_key;

/// Disjoint-set forest over `0..n` with path halving.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Join the sets containing `a` and `b`. Returns false if they were
    /// already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        self.parent[rb] = ra;
        true
    }
}

/// One or more clusters that name the same item.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGroup {
    pub member_indices: Vec<usize>,
    /// Representatives of the constituent clusters, in cluster order.
    pub representative_texts: Vec<String>,
}

/// Whether two cluster representatives describe the same item.
pub fn should_merge(
    text_a: &str,
    embedding_a: &[f64],
    text_b: &str,
    embedding_b: &[f64],
    config: &EngineConfig,
) -> bool {
    let sim = cosine_similarity(embedding_a, embedding_b);
    if sim < config.merge_similarity_threshold {
        return false;
    }

    let key_a = normalize_for_key(text_a);
    let key_b = normalize_for_key(text_b);
    key_a == key_b
        || key_a.contains(&key_b)
        || key_b.contains(&key_a)
        || sim >= config.merge_similarity_threshold + config.key_guard_margin
}

/// Union clusters whose representatives pass [`should_merge`].
///
/// Groups come out ordered by their first cluster, and each group lists its
/// clusters' members and representatives in cluster order.
pub fn merge_clusters(clusters: &[Cluster], config: &EngineConfig) -> Vec<MergedGroup> {
    let mut sets = UnionFind::new(clusters.len());

    for i in 0..clusters.len() {
        for j in (i + 1)..clusters.len() {
            let (a, b) = (&clusters[i], &clusters[j]);
            if should_merge(
                &a.representative_text,
                &a.representative_embedding,
                &b.representative_text,
                &b.representative_embedding,
                config,
            ) && sets.union(i, j)
            {
                debug!(
                    a = a.representative_text.as_str(),
                    b = b.representative_text.as_str(),
                    "Merged clusters"
                );
            }
        }
    }

    let mut groups: Vec<MergedGroup> = Vec::new();
    let mut group_of_root: Vec<Option<usize>> = vec![None; clusters.len()];
    for (i, cluster) in clusters.iter().enumerate() {
        let root = sets.find(i);
        let slot = match group_of_root[root] {
            Some(slot) => slot,
            None => {
                groups.push(MergedGroup {
                    member_indices: Vec::new(),
                    representative_texts: Vec::new(),
                });
                group_of_root[root] = Some(groups.len() - 1);
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group
            .representative_texts
            .push(cluster.representative_text.clone());
        group
            .member_indices
            .extend_from_slice(&cluster.member_indices);
    }

    groups
}
