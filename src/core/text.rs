//! Pure conversions from page text to numbers and clean strings.

use regex::Regex;
use std::sync::LazyLock;

/// Longest leading decimal number, the way a browser's `parseFloat` reads it.
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)").expect("number prefix pattern"));

/// Strips everything but digits, `.` and `-`, then reads the leading number.
/// Anything that leaves no number behind yields 0.
pub fn numeric_parse(text: &str) -> f64 {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    NUMBER_PREFIX
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Fee text: "FREE" in any case is zero, everything else goes through [`numeric_parse`].
pub fn fee_parse(text: &str) -> f64 {
    if text.trim().eq_ignore_ascii_case("free") {
        0.0
    } else {
        numeric_parse(text)
    }
}

/// Whether a block of text advertises a free transfer.
pub fn contains_free_token(text: &str) -> bool {
    text.contains("FREE") || text.contains("Free")
}

/// Collapses every run of whitespace to one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
