// Output formatting: terminal display of menus.

use std::borrow::Cow;

pub mod terminal;

/// Clip `text` to its first `width` characters, marking the cut with "...".
/// Text that already fits is borrowed unchanged.
pub fn clip(text: &str, width: usize) -> Cow<'_, str> {
    match text.char_indices().nth(width) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
