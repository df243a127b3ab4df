//! String formatting utilities for UI rendering.

/// Keep the tail of a path-like string, which carries the file name.
pub fn truncate_start(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().skip(char_count - max_len).collect();
    }
    let tail: String = s.chars().skip(char_count - (max_len - 3)).collect();
    format!("...{}", tail)
}

/// "1 record", "3 records".
pub fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}
