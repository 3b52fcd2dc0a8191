use std::path::PathBuf;

use hps_roster::{DuplicateCandidate, DuplicateKind, RosterImport};
use hps_validate::{SanitizedConfig, ValidationResult};
use serde::Serialize;
use serde_json::Value;

/// Validation outcome for one record of a `hps validate` input file.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// Position in the input array (0 for a single object).
    pub index: usize,
    pub valid: bool,
    pub errors: Vec<String>,
    /// Cleaned record, or `null` if the entry could not be read at all.
    pub sanitized: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateReport {
    pub entity: &'static str,
    pub records: Vec<RecordOutcome>,
}

impl ValidateReport {
    pub fn invalid_count(&self) -> usize {
        self.records.iter().filter(|record| !record.valid).count()
    }

    pub fn has_errors(&self) -> bool {
        self.invalid_count() > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub section: String,
    #[serde(flatten)]
    pub result: ValidationResult<SanitizedConfig>,
}

impl ConfigReport {
    pub fn has_errors(&self) -> bool {
        !self.result.is_valid()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterReport {
    pub source: PathBuf,
    pub rows: usize,
    #[serde(flatten)]
    pub import: RosterImport,
    pub duplicates: Vec<DuplicateCandidate>,
    /// Problems that make the upload unusable as-is.
    pub errors: Vec<String>,
}

impl RosterReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn duplicate_count(&self, kind: DuplicateKind) -> usize {
        self.duplicates
            .iter()
            .filter(|candidate| candidate.kind == kind)
            .count()
    }
}
