// Menu building: row filtering, the clustering pipeline, and aggregation
// into ranked menu items.

pub mod aggregate;
pub mod models;
pub mod pipeline;

pub use models::{ItemRow, MenuCategory, MenuItem, ProcessedReview};
pub use pipeline::{cluster_rows, MenuEngine};
