//! Mapping engine implementation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use hps_model::StudentField;
use tracing::debug;

use crate::patterns::SynonymTable;
use crate::score::{ColumnMatch, score_header};
use crate::types::{ColumnMapping, MappedColumn, UnmappedColumn, maps_name};
use crate::utils::safe_column_name;

/// Minimum confidence for roster import to commit a column.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// How sure the engine is that a roster column holds a field.
///
/// Shown next to each mapped column so whoever uploads the roster knows
/// which headers to double-check before importing:
/// - `High`: synonym hit or near enough that nobody needs to look
/// - `Medium`: a close spelling; glance at the column before importing
/// - `Low`: accepted, but the header only loosely resembles the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Short note for roster summaries.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "matched a known header",
            Self::Medium => "close spelling, check the column",
            Self::Low => "loose match, confirm before importing",
        }
    }
}

/// Cut-offs between [`ConfidenceLevel`]s.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
    /// Below this a column is not mapped at all.
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.95,
            medium: 0.80,
            low: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl ConfidenceThresholds {
    /// Level for `confidence`, or `None` when it would not be mapped.
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }

    /// Number of committed columns at each level.
    #[must_use]
    pub fn count_by_level(&self, mapping: &ColumnMapping) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for column in mapping.values() {
            if let Some(level) = self.categorize(column.confidence) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Result of a mapping operation.
#[derive(Debug, Clone, Default)]
pub struct MappingResult {
    /// Committed field-to-column assignments.
    pub mapping: ColumnMapping,
    /// Headers that no field accepted, in header order.
    pub unmapped: Vec<UnmappedColumn>,
}

impl MappingResult {
    /// Column index mapped to `field`, if any.
    pub fn column_for(&self, field: StudentField) -> Option<usize> {
        self.mapping.get(&field).map(|column| column.index)
    }

    /// Mapped columns per level, with the default cut-offs.
    #[must_use]
    pub fn count_by_level(&self) -> BTreeMap<ConfidenceLevel, usize> {
        ConfidenceThresholds::default().count_by_level(&self.mapping)
    }

    /// Weakest committed column score; `None` when nothing mapped.
    #[must_use]
    pub fn min_confidence(&self) -> Option<f64> {
        self.mapping
            .values()
            .map(|column| column.confidence)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    /// True if some name source (full name, or first and last) is mapped.
    pub fn has_name(&self) -> bool {
        maps_name(&self.mapping)
    }
}

/// Engine for mapping spreadsheet headers to student fields.
///
/// Headers are scanned left to right. Each header goes to the best-scoring
/// field not yet claimed; on a tie the field earlier in
/// [`StudentField::PRIORITY`] wins. A header whose best score is below
/// `min_confidence` is reported unmapped.
///
/// # Example
///
/// ```
/// use hps_map::MappingEngine;
/// use hps_model::StudentField;
///
/// let engine = MappingEngine::default();
/// let headers = ["Nombre Completo", "ID", "Grado"].map(String::from);
/// let result = engine.suggest(&headers);
/// assert_eq!(result.column_for(StudentField::GradeLevel), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct MappingEngine {
    min_confidence: f64,
    synonyms: SynonymTable,
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE, SynonymTable::default())
    }
}

impl MappingEngine {
    pub fn new(min_confidence: f64, synonyms: SynonymTable) -> Self {
        Self {
            min_confidence,
            synonyms,
        }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Scores one header against one field with this engine's synonyms.
    pub fn score(&self, header: &str, field: StudentField) -> ColumnMatch {
        score_header(&self.synonyms, header, field)
    }

    /// Suggests a one-to-one mapping for a header row.
    pub fn suggest(&self, headers: &[String]) -> MappingResult {
        let mut result = MappingResult::default();

        for (index, header) in headers.iter().enumerate() {
            let mut best: Option<(StudentField, ColumnMatch)> = None;
            for field in StudentField::PRIORITY {
                if result.mapping.contains_key(&field) {
                    continue;
                }
                let candidate = self.score(header, field);
                if best.is_none_or(|(_, current)| candidate.confidence > current.confidence) {
                    best = Some((field, candidate));
                }
            }

            match best {
                Some((field, matched)) if matched.confidence >= self.min_confidence => {
                    debug!(
                        column = index,
                        header = %header.trim(),
                        field = %field,
                        confidence = matched.confidence,
                        method = matched.method.as_str(),
                        "mapped roster column"
                    );
                    result.mapping.insert(
                        field,
                        MappedColumn {
                            index,
                            header: safe_column_name(header),
                            confidence: matched.confidence,
                            method: matched.method,
                        },
                    );
                }
                other => {
                    debug!(column = index, header = %header.trim(), "roster column left unmapped");
                    result.unmapped.push(UnmappedColumn {
                        index,
                        header: safe_column_name(header),
                        closest: other.filter(|(_, m)| m.matched).map(|(field, _)| field),
                        confidence: other.map(|(_, m)| m.confidence).unwrap_or_default(),
                    });
                }
            }
        }

        result
    }
}
