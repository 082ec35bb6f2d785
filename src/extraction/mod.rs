// Review extraction: pull a food item and a sentiment rating out of raw
// review text, producing the (item, rating) rows the menu engine consumes.

pub mod batch;
pub mod openai;
pub mod traits;

pub use batch::{blend_rating, extract_reviews, ExtractionOptions, ExtractionSummary};
pub use openai::OpenAiExtractor;
pub use traits::{ExtractedItem, Review, ReviewExtractor};
