// Clustering engine: k-means over item embeddings, silhouette-based choice
// of k, representative selection, and a similarity merge pass.

pub mod kmeans;
pub mod merge;
pub mod representative;
pub mod selector;
pub mod silhouette;
pub mod similarity;

pub use kmeans::{kmeans, KMeansParams, Partition, PartitionError};
pub use merge::{merge_clusters, MergedGroup, UnionFind};
pub use representative::{build_clusters, Cluster};
pub use selector::choose_cluster_count;
pub use similarity::{cosine_distance, cosine_similarity};
