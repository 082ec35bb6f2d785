// Text normalization for embedding and key comparison.
//
// Both normalizers only touch punctuation, casing, filler words and a
// handful of plurals.
//
// Symbols are anything outside the Unicode letter and number categories, so
// combining marks are replaced too. Word boundaries follow ASCII word rules
// (letters, digits, underscore), so a filler word glued to a non-ASCII letter
// still counts as a standalone word.

use std::sync::LazyLock;

use regex_lite::Regex;

static SYMBOLS: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid symbol regex")
});

static FILLER_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:with|the)\b").expect("valid filler regex"));

/// Plural food words collapsed to their singular form for key comparison.
const SINGULAR_FORMS: &[(&str, &str)] = &[
    ("chips", "chip"),
    ("burritos", "burrito"),
    ("tacos", "taco"),
    ("salsas", "salsa"),
];

static PLURALS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    SINGULAR_FORMS
        .iter()
        .map(|(plural, singular)| {
            let re = Regex::new(&format!(r"\b{plural}\b")).expect("valid plural regex");
            (re, *singular)
        })
        .collect()
});

/// Normalize an item name before it is sent to the embedding provider.
///
/// Lowercases, expands `&` to "and", drops quote characters, replaces any
/// other symbol with a space, removes the standalone words "with" and "the",
/// and collapses whitespace.
pub fn normalize_for_embedding(text: &str) -> String {
    let lowered = text.to_lowercase();
    let expanded = lowered.trim().replace('&', " and ");

    let unquoted: String = expanded.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let cleaned = SYMBOLS.replace_all(&unquoted, " ");

    let without_fillers = FILLER_WORDS.replace_all(&cleaned, " ");
    collapse_whitespace(&without_fillers)
}

/// Normalize an item name into a grouping key.
///
/// Same as [`normalize_for_embedding`], plus a few known plurals are
/// singularized ("tacos" -> "taco").
pub fn normalize_for_key(text: &str) -> String {
    let mut key = normalize_for_embedding(text);
    for (re, singular) in PLURALS.iter() {
        key = re.replace_all(&key, *singular).into_owned();
    }
    key.trim().to_string()
}

/// Capitalize the first letter of each space-separated word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
