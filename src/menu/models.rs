// Data models for the menu pipeline: input rows in, ranked menu items out.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_for_key;

/// Category label for a non-empty menu.
pub const ITEMS_CATEGORY: &str = "Items";
/// Category label returned when no usable rows survive filtering.
pub const EMPTY_MENU_CATEGORY: &str = "Menu Items";

/// An (item, rating) pair produced by review extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedReview {
    #[serde(default)]
    pub item: Option<String>,
    pub rating: f64,
}

impl ProcessedReview {
    pub fn new(item: impl Into<String>, rating: f64) -> Self {
        Self {
            item: Some(item.into()),
            rating,
        }
    }
}

/// A review row that survived filtering. Its position in the row list is the
/// index used by every later stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub raw_text: String,
    pub normalized_key: String,
    pub rating: f64,
}

impl ItemRow {
    /// Build a row, or `None` if the item normalizes to nothing or the
    /// rating isn't a finite number.
    pub fn from_review(review: &ProcessedReview) -> Option<Self> {
        let raw_text = review.item.as_deref().unwrap_or("").trim().to_string();
        let normalized_key = normalize_for_key(&raw_text);
        if normalized_key.is_empty() || !review.rating.is_finite() {
            return None;
        }
        Some(Self {
            raw_text,
            normalized_key,
            rating: review.rating,
        })
    }
}

/// Keep the usable rows, in input order.
pub fn prepare_rows(reviews: &[ProcessedReview]) -> Vec<ItemRow> {
    reviews.iter().filter_map(ItemRow::from_review).collect()
}

/// One canonical menu item with its aggregated rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    /// Mean rating of the supporting reviews, rounded to one decimal.
    pub rating: f64,
    pub review_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub category: String,
    pub items: Vec<MenuItem>,
}

impl MenuCategory {
    pub fn empty() -> Self {
        Self {
            category: EMPTY_MENU_CATEGORY.to_string(),
            items: Vec::new(),
        }
    }

    pub fn items(items: Vec<MenuItem>) -> Self {
        Self {
            category: ITEMS_CATEGORY.to_string(),
            items,
        }
    }
}
