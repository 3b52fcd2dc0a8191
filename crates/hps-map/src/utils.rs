//! Utility functions for header matching.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes text for comparison.
///
/// Lowercases, strips diacritics, turns punctuation, underscores and hyphens
/// into spaces, and collapses whitespace.
///
/// ```
/// use hps_map::normalize_text;
///
/// assert_eq!(normalize_text("  Número_de-Estudiante #"), "numero de estudiante");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let folded: String = raw
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims whitespace from a header, preserving the original casing.
pub fn safe_column_name(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Student_ID"), "student id");
        assert_eq!(normalize_text("E-mail Address"), "e mail address");
        assert_eq!(normalize_text("Año"), "ano");
        assert_eq!(normalize_text("Grade (2024)"), "grade 2024");
        assert_eq!(normalize_text("  ...  "), "");
    }

    #[test]
    fn test_safe_column_name() {
        assert_eq!(safe_column_name("  Grade "), "Grade");
    }
}
