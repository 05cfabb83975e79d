// src/utils/text.rs

//! Plain-text cleanup for names and summaries.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").expect("bracket pattern is valid"));

/// Collapse every whitespace run into a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove bracketed markers such as `[1]` or `[citation needed]`.
pub fn strip_bracketed(text: &str) -> String {
    BRACKETED.replace_all(text, "").into_owned()
}

/// Text up to the first `[`, trimmed.
pub fn before_citation(text: &str) -> &str {
    text.split('[').next().unwrap_or(text).trim()
}

/// Decompose (NFD) and drop every combining mark.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Cut `text` down to at most `max` grapheme clusters.
pub fn truncate_graphemes(text: &str, max: usize) -> &str {
    match text.grapheme_indices(true).nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Clean an API extract into a single summary line.
pub fn clean_extract(extract: &str, max_chars: usize) -> String {
    let stripped = strip_bracketed(extract);
    let collapsed = collapse_whitespace(&stripped);
    truncate_graphemes(&collapsed, max_chars).trim_end().to_string()
}
