//! Column mapping types for spreadsheet-to-roster field mapping.

use std::collections::BTreeMap;

use hps_model::StudentField;
use serde::{Deserialize, Serialize};

use crate::score::MatchMethod;

/// A spreadsheet column committed to a student field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColumn {
    /// Zero-based position of the column in the header row.
    pub index: usize,
    /// Header text as it appeared (trimmed).
    pub header: String,
    /// Confidence score (0.0 to 1.0) for this mapping.
    pub confidence: f64,
    pub method: MatchMethod,
}

/// A header that no field accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmappedColumn {
    pub index: usize,
    pub header: String,
    /// Best field it resembled, even though below the threshold.
    pub closest: Option<StudentField>,
    pub confidence: f64,
}

/// Field → source column assignments.
pub type ColumnMapping = BTreeMap<StudentField, MappedColumn>;

/// True if `mapping` has a name source: full name, or both first and last.
pub fn maps_name(mapping: &ColumnMapping) -> bool {
    mapping.contains_key(&StudentField::FullName)
        || (mapping.contains_key(&StudentField::FirstName)
            && mapping.contains_key(&StudentField::LastName))
}
