// Batch extraction: run the extractor over many reviews with bounded
// concurrency, keeping input order.
//
// Individual failures never fail the batch: reviews with missing text or
// rating are rejected up front, extractor errors are logged and skipped, and
// reviews that mention no food item are simply not part of the output.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use super::traits::{Review, ReviewExtractor};
use crate::menu::aggregate::round_to_tenth;
use crate::menu::ProcessedReview;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionOptions {
    /// Average the reviewer's own star rating into the sentiment score.
    pub weighted: bool,
    /// Number of extraction requests in flight at once.
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            weighted: false,
            concurrency: 8,
            show_progress: false,
        }
    }
}

/// Outcome of a batch extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSummary {
    /// One row per review that mentioned a food item, in input order.
    pub processed: Vec<ProcessedReview>,
    /// Reviews rejected for missing text or rating.
    pub invalid: usize,
    /// Reviews that mentioned no specific food item.
    pub no_item: usize,
    /// Reviews whose extraction request failed.
    pub failed: usize,
}

/// Combine the reviewer's star rating with the extracted sentiment.
///
/// With `weighted` off, or without a finite user rating, the sentiment is
/// used as-is. Otherwise the two are averaged and rounded to one decimal.
pub fn blend_rating(sentiment: f64, user_rating: Option<f64>, weighted: bool) -> f64 {
    match user_rating {
        Some(user) if weighted && user.is_finite() => round_to_tenth((user + sentiment) / 2.0),
        _ => sentiment,
    }
}

/// Why a review can't be sent to the extractor, if it can't.
pub fn validate_review(index: usize, review: &Review) -> Result<(), String> {
    if review.text.trim().is_empty() {
        return Err(format!(
            "Review at index {index} is missing or has invalid text field"
        ));
    }
    if !review.rating.is_some_and(f64::is_finite) {
        return Err(format!(
            "Review at index {index} is missing or has invalid rating field"
        ));
    }
    Ok(())
}

pub async fn extract_reviews(
    extractor: &dyn ReviewExtractor,
    reviews: &[Review],
    options: ExtractionOptions,
) -> ExtractionSummary {
    let mut summary = ExtractionSummary::default();

    let mut valid = Vec::with_capacity(reviews.len());
    for (index, review) in reviews.iter().enumerate() {
        match validate_review(index, review) {
            Ok(()) => valid.push(review),
            Err(reason) => {
                warn!(index, reason = reason.as_str(), "Skipping invalid review");
                summary.invalid += 1;
            }
        }
    }

    let pb = if options.show_progress {
        let pb = ProgressBar::new(valid.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  Extracting [{bar:30}] {pos}/{len} ({eta})")
        {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<_> = stream::iter(valid.into_iter().map(|review| {
        let pb = &pb;
        async move {
            let result = extractor.extract(&review.text).await;
            pb.inc(1);
            (review, result)
        }
    }))
    .buffered(options.concurrency.max(1))
    .collect()
    .await;
    pb.finish_and_clear();

    for (review, result) in results {
        match result {
            Ok(Some(extracted)) => summary.processed.push(ProcessedReview {
                item: Some(extracted.item),
                rating: blend_rating(extracted.sentiment, review.rating, options.weighted),
            }),
            Ok(None) => summary.no_item += 1,
            Err(e) => {
                warn!(error = %e, "Failed to extract review, skipping");
                summary.failed += 1;
            }
        }
    }

    summary
}
