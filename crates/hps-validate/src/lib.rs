//! Validation of dashboard form submissions.
//!
//! Each `validate_*` function sanitizes a copy of its input through
//! `hps-sanitize`, applies presence and value-set rules, and returns a
//! [`ValidationResult`] holding every error plus the cleaned record. Data
//! problems are never returned as `Err`.
//!
//! # Example
//!
//! ```
//! use hps_model::Pass;
//! use hps_validate::validate_pass;
//!
//! let pass = Pass {
//!     student_id: "1234567".to_string(),
//!     destination: "Library".to_string(),
//!     ..Pass::default()
//! };
//! assert!(validate_pass(&pass).is_valid());
//! ```

mod checks;
pub mod config;
pub mod entities;
pub mod issue;

pub use config::{EconomyConfig, LabelsConfig, SanitizedConfig, validate_config};
pub use entities::{
    MIN_CONFLICT_MEMBERS, ValidationPolicy, Validator, validate_broadcast,
    validate_conflict_group, validate_log_entry, validate_parent_contact, validate_pass,
    validate_school,
};
pub use hps_model::ValidationResult;
pub use issue::FieldIssue;
