//! Character-bounded string helpers.
//!
//! Every length limit in the pipeline counts Unicode scalar values, not bytes,
//! so slicing never lands inside a multi-byte character.

/// Return the prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Owned variant of [`truncate_chars`].
pub fn truncated(s: &str, max_chars: usize) -> String {
    truncate_chars(s, max_chars).to_string()
}
