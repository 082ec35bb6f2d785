// Colored terminal output for menus.

use colored::{ColoredString, Colorize};

use super::clip;
use crate::menu::MenuCategory;

/// Display ranked menu categories in the terminal.
pub fn display_menu(categories: &[MenuCategory]) {
    let total_items: usize = categories.iter().map(|c| c.items.len()).sum();
    if total_items == 0 {
        println!("No menu items found. Reviews need to mention specific dishes.");
        return;
    }

    for category in categories {
        println!(
            "\n{}",
            format!("=== {} ({} items) ===", category.category, category.items.len()).bold()
        );
        println!();
        println!(
            "  {:>4}  {:<36} {:>6}  {:>7}",
            "Rank".dimmed(),
            "Item".dimmed(),
            "Rating".dimmed(),
            "Reviews".dimmed(),
        );
        println!("  {}", "-".repeat(58).dimmed());

        for (i, item) in category.items.iter().enumerate() {
            println!(
                "  {:>4}. {:<36} {:>6}  {:>7}",
                i + 1,
                clip(&item.name, 33),
                colorize_rating(item.rating),
                item.review_count,
            );
        }
    }

    let reviews: usize = categories
        .iter()
        .flat_map(|c| c.items.iter())
        .map(|i| i.review_count)
        .sum();
    println!();
    println!(
        "  {}",
        format!("{total_items} items from {reviews} reviews").dimmed()
    );
}

/// Color a 1-5 rating: green for good, yellow for middling, red for poor.
fn colorize_rating(rating: f64) -> ColoredString {
    let text = format!("{rating:.1}");
    if rating >= 4.0 {
        text.green().bold()
    } else if rating >= 3.0 {
        text.yellow()
    } else {
        text.red()
    }
}
