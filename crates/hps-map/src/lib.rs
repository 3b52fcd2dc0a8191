//! Roster column mapping.
//!
//! Uploaded rosters arrive with whatever headers the exporting system or the
//! person typing the spreadsheet chose ("Student ID", "Nombre Completo",
//! "GR"...). This crate scores each header against the canonical
//! [`StudentField`](hps_model::StudentField)s and commits a one-to-one
//! mapping.
//!
//! - [`utils`]: header normalization (case, diacritics, punctuation)
//! - [`patterns`]: the English/Spanish synonym dictionary
//! - [`score`]: scoring one header against one field
//! - [`engine`]: assigning a whole header row

pub mod engine;
pub mod patterns;
pub mod score;
pub mod types;
pub mod utils;

pub use engine::{
    ConfidenceLevel, ConfidenceThresholds, DEFAULT_MIN_CONFIDENCE, MappingEngine, MappingResult,
};
pub use patterns::SynonymTable;
pub use score::{ColumnMatch, MatchMethod, find_best_column_match, score_header};
pub use types::{ColumnMapping, MappedColumn, UnmappedColumn, maps_name};
pub use utils::normalize_text;
