//! UTF-8-safe string truncation utilities
//!
//! Extraction limits are expressed in characters, not bytes, so every cut must
//! land on a character boundary.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Never panics on multi-byte input and returns a slice of the original.
///
/// # Examples
/// ```
/// # use competitor_monitor::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("Привет, мир", 6), "Привет");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Number of characters (Unicode scalar values) in `s`
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Truncate `s` to `max_chars` characters, appending `marker` when a cut happened
pub fn truncate_with_marker(s: &str, max_chars: usize, marker: &str) -> String {
    let head = safe_truncate_chars(s, max_chars);
    if head.len() == s.len() {
        s.to_string()
    } else {
        let mut out = String::with_capacity(head.len() + marker.len());
        out.push_str(head);
        out.push_str(marker);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_multibyte_boundaries() {
        let text = "ёжик в тумане";
        assert_eq!(safe_truncate_chars(text, 4), "ёжик");
        assert_eq!(char_len(text), 13);
    }

    #[test]
    fn test_truncate_with_marker_only_when_cut() {
        assert_eq!(truncate_with_marker("short", 10, "[cut]"), "short");
        assert_eq!(truncate_with_marker("abcdefghij", 4, "[cut]"), "abcd[cut]");
        assert_eq!(truncate_with_marker("abcd", 4, "[cut]"), "abcd");
    }
}
