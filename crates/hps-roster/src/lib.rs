//! Roster import and duplicate detection.
//!
//! [`import_rows`] maps an uploaded header row with `hps-map` and reads the
//! data rows into sanitized [`StudentRecord`](hps_model::StudentRecord)s.
//! [`find_duplicates`] then compares them with the existing roster and with
//! each other.

pub mod duplicates;
pub mod import;
pub mod similarity;

pub use duplicates::{
    BATCH_NAME_THRESHOLD, DuplicateCandidate, DuplicateKind, DuplicateOf, NAME_THRESHOLD,
    SAME_GRADE_NAME_THRESHOLD, SIMILAR_ID_THRESHOLD, find_duplicates,
};
pub use import::{ImportOptions, RosterImport, SkippedRow, column_values, complete_names, import_rows};
pub use similarity::{normalize_for_compare, string_similarity};
