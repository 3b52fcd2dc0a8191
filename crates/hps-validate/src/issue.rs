//! Validation issue types.
//!
//! Each variant carries only the data its message needs. The rendered
//! messages are what ends up in `ValidationResult::errors`.

use serde::Serialize;
use thiserror::Error;

/// A single problem found in a submitted record.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldIssue {
    // Presence checks
    /// Field is missing or blank after cleaning.
    #[error("{field} is required")]
    Required { field: &'static str },

    // Value-set checks
    /// Field holds a value outside its closed set.
    #[error("{field} must be one of {allowed} (got '{value}')")]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: String,
    },

    /// Conflict group has fewer distinct members than required.
    #[error("members must list at least {min} distinct students (found {found})")]
    TooFewMembers { found: usize, min: usize },

    /// Staff email outside the allowed domains.
    #[error("{field} must be a school district email address")]
    DomainNotAllowed { field: &'static str },

    // Config checks
    /// Config section payload is not a JSON object.
    #[error("{section} config must be an object")]
    NotAnObject { section: String },

    /// Label list is present but not an array.
    #[error("{field} must be a list of labels")]
    NotAList { field: &'static str },

    /// A label list entry is blank or not a string.
    #[error("{field}[{index}] must be a non-empty string")]
    BlankLabel { field: &'static str, index: usize },

    /// Numeric field holds something else.
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    /// Numeric field outside its closed range.
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Config section name is not recognized.
    #[error("unknown config section '{section}' (expected labels or economy)")]
    UnknownSection { section: String },
}

impl FieldIssue {
    /// Field the issue is attached to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            FieldIssue::Required { field }
            | FieldIssue::InvalidChoice { field, .. }
            | FieldIssue::DomainNotAllowed { field }
            | FieldIssue::NotAList { field }
            | FieldIssue::BlankLabel { field, .. }
            | FieldIssue::NotANumber { field }
            | FieldIssue::OutOfRange { field, .. } => Some(field),
            FieldIssue::TooFewMembers { .. } => Some("members"),
            FieldIssue::NotAnObject { .. } | FieldIssue::UnknownSection { .. } => None,
        }
    }

    pub(crate) fn invalid_choice(field: &'static str, value: &str, allowed: &[&str]) -> Self {
        FieldIssue::InvalidChoice {
            field,
            value: value.to_string(),
            allowed: allowed.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            FieldIssue::Required {
                field: "destination"
            }
            .to_string(),
            "destination is required"
        );
        assert_eq!(
            FieldIssue::invalid_choice("priority", "loud", &["normal", "urgent"]).to_string(),
            "priority must be one of normal, urgent (got 'loud')"
        );
        assert_eq!(
            FieldIssue::OutOfRange {
                field: "studentPointRatio",
                value: 1.5,
                min: 0.0,
                max: 1.0,
            }
            .to_string(),
            "studentPointRatio must be between 0 and 1 (got 1.5)"
        );
    }

    #[test]
    fn test_field_accessor() {
        assert_eq!(
            FieldIssue::TooFewMembers { found: 1, min: 2 }.field(),
            Some("members")
        );
        assert_eq!(
            FieldIssue::UnknownSection {
                section: "x".to_string()
            }
            .field(),
            None
        );
    }
}
