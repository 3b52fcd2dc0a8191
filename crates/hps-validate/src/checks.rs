//! Shared rule helpers.
//!
//! Rules never short-circuit: every check pushes onto the same list so the
//! caller sees all problems at once.

use std::str::FromStr;

use hps_model::ValidationResult;
use hps_sanitize::DomainAllowList;
use tracing::debug;

use crate::issue::FieldIssue;

#[derive(Debug, Default)]
pub(crate) struct Issues {
    issues: Vec<FieldIssue>,
}

impl Issues {
    pub(crate) fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    /// Reports `field` when its cleaned value is blank. Returns true if present.
    pub(crate) fn require(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(FieldIssue::Required { field });
            return false;
        }
        true
    }

    /// Required value that must also parse into a closed set.
    pub(crate) fn require_choice<E: FromStr>(
        &mut self,
        field: &'static str,
        value: &str,
        allowed: &[&str],
    ) -> Option<E> {
        if !self.require(field, value) {
            return None;
        }
        self.choice(field, value, allowed)
    }

    /// Optional value that must parse into a closed set when present.
    pub(crate) fn choice<E: FromStr>(
        &mut self,
        field: &'static str,
        value: &str,
        allowed: &[&str],
    ) -> Option<E> {
        match value.parse::<E>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.push(FieldIssue::invalid_choice(field, value, allowed));
                None
            }
        }
    }

    /// Checks a staff email against the allow-list when one is enforced.
    pub(crate) fn staff_email(
        &mut self,
        field: &'static str,
        raw: &str,
        allow_list: Option<&DomainAllowList>,
    ) {
        if let Some(list) = allow_list
            && !raw.trim().is_empty()
            && !list.is_allowed(raw)
        {
            self.push(FieldIssue::DomainNotAllowed { field });
        }
    }

    pub(crate) fn finish<T>(self, entity: &'static str, sanitized: T) -> ValidationResult<T> {
        if !self.issues.is_empty() {
            debug!(entity, issues = self.issues.len(), "record failed validation");
        }
        let errors = self.issues.iter().map(ToString::to_string).collect();
        ValidationResult::new(errors, sanitized)
    }
}

/// String forms of a closed value set, for error messages.
pub(crate) fn names<E, const N: usize>(
    all: [E; N],
    as_str: fn(&E) -> &'static str,
) -> Vec<&'static str> {
    all.iter().map(as_str).collect()
}
