//! Shared utility functions.

/// Shorten `text` to at most `max_chars` characters, appending `...` when
/// anything was cut. Counts characters, not bytes.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
