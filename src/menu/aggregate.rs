// Aggregation: turn merged groups into rated, named, ranked menu items.

use std::cmp::Ordering;

use super::models::{ItemRow, MenuItem};
use crate::clustering::MergedGroup;
use crate::normalize::title_case;

/// Build one [`MenuItem`] per group and rank them by rating, highest first.
///
/// Equal ratings are ordered by name so the output is fully deterministic.
pub fn aggregate_groups(groups: &[MergedGroup], rows: &[ItemRow]) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = groups
        .iter()
        .filter(|g| !g.member_indices.is_empty())
        .map(|group| {
            let total: f64 = group.member_indices.iter().map(|&i| rows[i].rating).sum();
            let count = group.member_indices.len();
            MenuItem {
                name: title_case(display_name(&group.representative_texts)),
                rating: round_to_tenth(total / count as f64),
                review_count: count,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    items
}

/// The shortest representative (by characters), first one on ties.
pub fn display_name(representatives: &[String]) -> &str {
    representatives
        .iter()
        .min_by_key(|r| r.chars().count())
        .map(String::as_str)
        .unwrap_or("")
}

/// Round to one decimal place, halves rounding up.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
