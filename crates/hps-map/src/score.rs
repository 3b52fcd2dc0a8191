//! Scoring a single header against a single student field.
//!
//! An exact synonym hit scores 1.0. Anything else scores the best normalized
//! Levenshtein similarity against the field's synonyms.

use std::sync::LazyLock;

use hps_model::StudentField;
use rapidfuzz::distance::levenshtein;
use serde::{Deserialize, Serialize};

use crate::patterns::SynonymTable;
use crate::utils::normalize_text;

static DEFAULT_SYNONYMS: LazyLock<SynonymTable> = LazyLock::new(SynonymTable::default);

/// How a header was matched to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Header is one of the field's synonyms.
    Exact,
    /// Header resembles one of the synonyms.
    Fuzzy,
    /// Header was blank after normalization.
    None,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
            Self::None => "none",
        }
    }
}

/// Score for one header/field pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnMatch {
    /// True when there is any similarity at all; callers apply their own threshold.
    pub matched: bool,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f64,
    pub method: MatchMethod,
}

impl ColumnMatch {
    const NONE: Self = Self {
        matched: false,
        confidence: 0.0,
        method: MatchMethod::None,
    };
}

/// Scores `header` as a name for `field` using the built-in synonyms.
///
/// ```
/// use hps_map::{MatchMethod, find_best_column_match};
/// use hps_model::StudentField;
///
/// let m = find_best_column_match("Nombre", StudentField::FullName);
/// assert_eq!(m.confidence, 1.0);
/// assert_eq!(m.method, MatchMethod::Exact);
/// ```
pub fn find_best_column_match(header: &str, field: StudentField) -> ColumnMatch {
    score_header(&DEFAULT_SYNONYMS, header, field)
}

/// Scores `header` as a name for `field` against `table`.
pub fn score_header(table: &SynonymTable, header: &str, field: StudentField) -> ColumnMatch {
    let normalized = normalize_text(header);
    if normalized.is_empty() {
        return ColumnMatch::NONE;
    }
    let compact = normalized.replace(' ', "");
    let synonyms = table.synonyms(field);

    if synonyms
        .iter()
        .any(|synonym| *synonym == normalized || synonym.replace(' ', "") == compact)
    {
        return ColumnMatch {
            matched: true,
            confidence: 1.0,
            method: MatchMethod::Exact,
        };
    }

    let best = synonyms
        .iter()
        .map(|synonym| levenshtein::normalized_similarity(normalized.chars(), synonym.chars()))
        .fold(0.0_f64, f64::max);
    ColumnMatch {
        matched: best > 0.0,
        confidence: best,
        method: MatchMethod::Fuzzy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_synonym() {
        let m = find_best_column_match("Student ID", StudentField::StudentIdNumber);
        assert_eq!(m.method, MatchMethod::Exact);
        assert_eq!(m.confidence, 1.0);
        assert!(m.matched);
    }

    #[test]
    fn test_exact_ignores_case_punctuation_and_spacing() {
        for header in ["FIRST_NAME", "FirstName", "first-name", "First Name:"] {
            let m = find_best_column_match(header, StudentField::FirstName);
            assert_eq!(m.method, MatchMethod::Exact, "{header}");
        }
    }

    #[test]
    fn test_diacritics_are_ignored() {
        let m = find_best_column_match("Número de Estudiante", StudentField::StudentIdNumber);
        assert_eq!(m.method, MatchMethod::Exact);
    }

    #[test]
    fn test_fuzzy_typo_scores_high() {
        let m = find_best_column_match("Homerom", StudentField::Homeroom);
        assert_eq!(m.method, MatchMethod::Fuzzy);
        assert!(m.confidence > 0.8, "got {}", m.confidence);
        assert!(m.confidence < 1.0);
    }

    #[test]
    fn test_unrelated_header_scores_low() {
        let m = find_best_column_match("Allergies", StudentField::GradeLevel);
        assert!(m.confidence < 0.6, "got {}", m.confidence);
    }

    #[test]
    fn test_blank_header() {
        let m = find_best_column_match(" -- ", StudentField::Email);
        assert!(!m.matched);
        assert_eq!(m.method, MatchMethod::None);
        assert_eq!(m.confidence, 0.0);
    }
}
