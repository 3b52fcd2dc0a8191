//! Duplicate detection for imported students.
//!
//! Each new record is compared with the existing roster, where the rules are
//! tried in order and the first one that matches any existing student wins:
//!
//! 1. same non-empty student ID → [`DuplicateKind::ExactId`]
//! 2. similar name → [`DuplicateKind::LikelyDuplicate`] (same grade) or
//!    [`DuplicateKind::PossibleDuplicate`]
//! 3. similar but not identical ID → [`DuplicateKind::SimilarId`]
//!
//! Independently, each new record is compared with the records before it in
//! the same upload, so a pair is reported once.

use std::fmt;

use hps_model::StudentRecord;
use hps_sanitize::sanitize_student_id;
use serde::Serialize;
use tracing::debug;

use crate::similarity::{normalize_for_compare, string_similarity};

/// Name similarity that flags a match regardless of grade.
pub const NAME_THRESHOLD: f64 = 0.85;
/// Name similarity that flags a match when grades agree.
pub const SAME_GRADE_NAME_THRESHOLD: f64 = 0.75;
/// ID similarity that flags a likely typo.
pub const SIMILAR_ID_THRESHOLD: f64 = 0.85;
/// Name similarity between two records of one upload.
pub const BATCH_NAME_THRESHOLD: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// Same student ID; the caller should update rather than insert.
    ExactId,
    LikelyDuplicate,
    PossibleDuplicate,
    /// IDs differ by a typo or two.
    SimilarId,
    /// Repeats an earlier row of the same upload.
    BatchDuplicate,
}

impl DuplicateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactId => "exact_id",
            Self::LikelyDuplicate => "likely_duplicate",
            Self::PossibleDuplicate => "possible_duplicate",
            Self::SimilarId => "similar_id",
            Self::BatchDuplicate => "batch_duplicate",
        }
    }
}

impl fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record a new student collided with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DuplicateOf {
    /// A student already on the roster.
    Existing { index: usize, record: StudentRecord },
    /// An earlier record of the same upload.
    Batch { index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateCandidate {
    pub kind: DuplicateKind,
    /// Position of the new record in the upload.
    pub new_index: usize,
    pub new_record: StudentRecord,
    pub duplicate_of: DuplicateOf,
    pub confidence: f64,
    pub reason: String,
}

/// Comparison keys computed once per record.
struct Keys {
    id: String,
    name: String,
    grade: String,
    /// Name as shown to people, for reason text.
    display: String,
}

impl Keys {
    fn of(record: &StudentRecord) -> Self {
        let display = record.display_name();
        Self {
            id: sanitize_student_id(record.student_id_number.as_str()),
            name: normalize_for_compare(&display),
            grade: normalize_for_compare(&record.grade_level),
            display,
        }
    }

    fn same_grade(&self, other: &Self) -> bool {
        !self.grade.is_empty() && self.grade == other.grade
    }
}

/// Finds duplicate candidates for `new` records against `existing` ones and
/// against earlier records of `new`.
///
/// At most one existing-roster candidate and one batch candidate are
/// reported per new record.
pub fn find_duplicates(
    new: &[StudentRecord],
    existing: &[StudentRecord],
) -> Vec<DuplicateCandidate> {
    let existing_keys: Vec<Keys> = existing.iter().map(Keys::of).collect();
    let new_keys: Vec<Keys> = new.iter().map(Keys::of).collect();
    let mut candidates = Vec::new();

    for (new_index, (record, keys)) in new.iter().zip(&new_keys).enumerate() {
        if let Some(hit) = match_existing(keys, &existing_keys) {
            debug!(
                row = new_index,
                existing = hit.index,
                kind = hit.kind.as_str(),
                confidence = hit.confidence,
                "duplicate student candidate"
            );
            candidates.push(DuplicateCandidate {
                kind: hit.kind,
                new_index,
                new_record: record.clone(),
                duplicate_of: DuplicateOf::Existing {
                    index: hit.index,
                    record: existing[hit.index].clone(),
                },
                confidence: hit.confidence,
                reason: hit.reason,
            });
        }

        if let Some(hit) = match_batch(keys, &new_keys[..new_index]) {
            debug!(
                row = new_index,
                earlier = hit.index,
                confidence = hit.confidence,
                "duplicate row within upload"
            );
            candidates.push(DuplicateCandidate {
                kind: hit.kind,
                new_index,
                new_record: record.clone(),
                duplicate_of: DuplicateOf::Batch { index: hit.index },
                confidence: hit.confidence,
                reason: hit.reason,
            });
        }
    }

    candidates
}

struct Hit {
    kind: DuplicateKind,
    index: usize,
    confidence: f64,
    reason: String,
}

fn match_existing(new: &Keys, existing: &[Keys]) -> Option<Hit> {
    exact_id(new, existing)
        .or_else(|| similar_name(new, existing))
        .or_else(|| similar_id(new, existing))
}

fn exact_id(new: &Keys, existing: &[Keys]) -> Option<Hit> {
    if new.id.is_empty() {
        return None;
    }
    let index = existing.iter().position(|other| other.id == new.id)?;
    Some(Hit {
        kind: DuplicateKind::ExactId,
        index,
        confidence: 1.0,
        reason: format!("student ID {} is already on the roster", new.id),
    })
}

fn similar_name(new: &Keys, existing: &[Keys]) -> Option<Hit> {
    if new.name.is_empty() {
        return None;
    }
    existing.iter().enumerate().find_map(|(index, other)| {
        if other.name.is_empty() {
            return None;
        }
        let score = string_similarity(&new.name, &other.name);
        let same_grade = new.same_grade(other);
        let threshold = if same_grade {
            SAME_GRADE_NAME_THRESHOLD
        } else {
            NAME_THRESHOLD
        };
        if score < threshold {
            return None;
        }
        let (kind, grade_note) = if same_grade {
            (DuplicateKind::LikelyDuplicate, "same grade")
        } else {
            (DuplicateKind::PossibleDuplicate, "different grade")
        };
        Some(Hit {
            kind,
            index,
            confidence: score,
            reason: format!(
                "name is {:.0}% similar to '{}' ({grade_note})",
                score * 100.0,
                other.display
            ),
        })
    })
}

fn similar_id(new: &Keys, existing: &[Keys]) -> Option<Hit> {
    if new.id.is_empty() {
        return None;
    }
    existing.iter().enumerate().find_map(|(index, other)| {
        if other.id.is_empty() {
            return None;
        }
        let score = string_similarity(&new.id, &other.id);
        (SIMILAR_ID_THRESHOLD..1.0).contains(&score).then(|| Hit {
            kind: DuplicateKind::SimilarId,
            index,
            confidence: score,
            reason: format!("student ID {} looks like a typo of {}", new.id, other.id),
        })
    })
}

fn match_batch(new: &Keys, earlier: &[Keys]) -> Option<Hit> {
    earlier.iter().enumerate().find_map(|(index, other)| {
        if !new.id.is_empty() && new.id == other.id {
            return Some(Hit {
                kind: DuplicateKind::BatchDuplicate,
                index,
                confidence: 1.0,
                reason: format!("student ID {} repeats row {}", new.id, index + 1),
            });
        }
        if new.name.is_empty() || other.name.is_empty() {
            return None;
        }
        let score = string_similarity(&new.name, &other.name);
        (score >= BATCH_NAME_THRESHOLD).then(|| Hit {
            kind: DuplicateKind::BatchDuplicate,
            index,
            confidence: score,
            reason: format!("name repeats row {} ({:.0}% similar)", index + 1, score * 100.0),
        })
    })
}
