//! Text canonicalization and token extraction.

use std::collections::BTreeSet;

/// Punctuation with no identity meaning in registry text. Mapped to spaces
/// before tokenization so `"GOVT."`, `"GOVT,"` and `"GOVT"` compare equal.
const NOISE: &[char] = &['.', ',', '-', '\'', '"', '(', ')', '/', ':', ';', '@', '&', '*', '#'];

/// Minimum length for an address keyword to carry identity signal.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Canonicalize free text for comparison: uppercase, noise punctuation to
/// space, whitespace collapsed, ends trimmed.
pub fn canonicalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() || NOISE.contains(&ch) {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        for upper in ch.to_uppercase() {
            out.push(upper);
        }
    }
    out
}

/// All whitespace-delimited tokens of the canonicalized text, as an ordered
/// set. Used for order-insensitive name comparison.
pub fn tokens(text: &str) -> BTreeSet<String> {
    canonicalize(text)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Address tokens that plausibly name a place: canonicalized, at least
/// [`MIN_KEYWORD_LEN`] characters, purely numeric tokens (pincodes, plot
/// numbers) dropped. Ordered, so joining them is deterministic.
pub fn address_keywords(address: &str) -> BTreeSet<String> {
    canonicalize(address)
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_owned)
        .collect()
}
