//! Message pattern normalization: variable tokens become placeholders so that
//! messages differing only in ids, addresses or numbers group together.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Patterns longer than this (in characters) are truncated.
pub const MAX_PATTERN_CHARS: usize = 150;

static RE_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b")
        .unwrap()
});

static RE_IP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}(?::\d{1,5})?\b").unwrap()
});

static RE_HEX_PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0[xX][0-9a-fA-F]+\b").unwrap());

static RE_HEX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9a-fA-F]{8,}\b").unwrap());

static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Reduce a message to its pattern.
///
/// The output never contains an ASCII digit, so applying the function to its
/// own output returns it unchanged.
pub fn normalize_message(message: &str) -> String {
    let text = RE_UUID.replace_all(message, "<UUID>");
    let text = RE_IP.replace_all(&text, "<IP>");
    let text = RE_HEX_PREFIXED.replace_all(&text, "<HEX>");
    // All-letter words such as "deadbeef" or "facade" stay as they are.
    let text = RE_HEX_ID.replace_all(&text, |caps: &Captures| {
        let word = &caps[0];
        if word.bytes().any(|b| b.is_ascii_digit()) {
            "<HEX>".to_string()
        } else {
            word.to_string()
        }
    });
    let text = RE_DIGITS.replace_all(&text, "<N>");
    let text = RE_SPACE.replace_all(text.trim(), " ");

    let mut pattern: String = text.chars().take(MAX_PATTERN_CHARS).collect();
    pattern.truncate(pattern.trim_end().len());
    pattern
}
