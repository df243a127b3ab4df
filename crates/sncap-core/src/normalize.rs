//! Field normalization applied before any comparison.

/// Clean a raw export field for comparison.
///
/// Trims surrounding whitespace and removes the leading apostrophe the
/// accounting system uses to force numeric-looking codes to text
/// (`'0102` becomes `0102`). Repeated apostrophes are all removed so the
/// result never starts with one and `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> &str {
    raw.trim_start_matches(|c: char| c == '\'' || c.is_whitespace())
        .trim_end()
}

/// Normalize an optional field; missing fields become `""`.
pub fn normalize_opt(raw: Option<&str>) -> &str {
    raw.map(normalize).unwrap_or("")
}
