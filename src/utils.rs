//! Small string helpers shared by the fetch and notify layers.

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended. Cuts always land on a `char` boundary, so
/// Korean response bodies are safe to pass in.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Byte offset just past the first `n` chars of `s` (or `s.len()`).
pub fn char_boundary(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // Each Hangul syllable is three bytes in UTF-8.
        let result = truncate_for_log("삼성생명한화생명", 4);
        assert_eq!(result, "삼성생명…(+12 bytes)");
    }

    #[test]
    fn test_char_boundary() {
        assert_eq!(char_boundary("가나다", 2), 6);
        assert_eq!(char_boundary("가나다", 3), 9);
        assert_eq!(char_boundary("가나다", 10), 9);
        assert_eq!(char_boundary("", 0), 0);
    }
}
