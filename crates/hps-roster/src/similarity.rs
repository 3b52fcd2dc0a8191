//! String similarity used for duplicate detection.

use rapidfuzz::distance::levenshtein;

/// Lowercases and collapses whitespace runs.
pub fn normalize_for_compare(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `1 - levenshtein / max_len` over the normalized strings.
///
/// Symmetric, in `[0, 1]`, and `1.0` only when the normalized strings are
/// equal.
///
/// ```
/// use hps_roster::string_similarity;
///
/// assert_eq!(string_similarity("Jon  Smith", "jon smith"), 1.0);
/// assert!((string_similarity("Jon Smith", "John Smith") - 0.9).abs() < 1e-9);
/// ```
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_for_compare(a);
    let b = normalize_for_compare(b);
    if a == b {
        return 1.0;
    }
    levenshtein::normalized_similarity(a.chars(), b.chars())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completely_different() {
        assert_eq!(string_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_one_side_empty() {
        assert_eq!(string_similarity("", "abc"), 0.0);
        assert_eq!(string_similarity("   ", ""), 1.0);
    }

    #[test]
    fn test_id_typo() {
        let score = string_similarity("1234567", "1234568");
        assert!(score > 0.85 && score < 1.0, "got {score}");
    }
}
