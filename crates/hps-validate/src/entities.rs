//! Validators for dashboard records.
//!
//! Every validator sanitizes a copy of the record, runs all of its rules
//! against the cleaned values, and returns the copy alongside the errors.

use hps_model::{
    Broadcast, ConflictGroup, ContactType, LogEntry, LogType, ParentContact, Pass, PassStatus,
    Priority, School, ValidationResult,
};
use hps_sanitize::{
    DomainAllowList, sanitize_email, sanitize_student_id, sanitize_student_name, sanitize_text,
};
use serde::{Deserialize, Serialize};

use crate::checks::{Issues, names};
use crate::issue::FieldIssue;

/// Minimum distinct students in a conflict group.
pub const MIN_CONFLICT_MEMBERS: usize = 2;

/// Options shared by all entity validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Reject staff emails (teacher, sender, logger) outside `allowed_domains`.
    pub enforce_staff_domain: bool,
    /// Domains accepted for staff emails.
    pub allowed_domains: DomainAllowList,
}

/// Validates records under a [`ValidationPolicy`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    fn allow_list(&self) -> Option<&DomainAllowList> {
        self.policy
            .enforce_staff_domain
            .then_some(&self.policy.allowed_domains)
    }

    pub fn validate_pass(&self, pass: &Pass) -> ValidationResult<Pass> {
        let sanitized = Pass {
            student_id: sanitize_student_id(&pass.student_id),
            student_name: sanitize_student_name(&pass.student_name),
            student_grade: sanitize_text(&pass.student_grade),
            destination: sanitize_text(&pass.destination),
            teacher_email: sanitize_email(&pass.teacher_email),
            teacher_name: sanitize_text(&pass.teacher_name),
            employee_id: sanitize_text(&pass.employee_id),
            status: sanitize_text(&pass.status),
        };

        let mut issues = Issues::default();
        issues.require("studentId", &sanitized.student_id);
        issues.require("destination", &sanitized.destination);
        if !sanitized.status.is_empty() {
            issues.choice::<PassStatus>(
                "status",
                &sanitized.status,
                &names(PassStatus::ALL, PassStatus::as_str),
            );
        }
        issues.staff_email("teacherEmail", &pass.teacher_email, self.allow_list());
        issues.finish("pass", sanitized)
    }

    pub fn validate_log_entry(&self, entry: &LogEntry) -> ValidationResult<LogEntry> {
        let sanitized = LogEntry {
            kind: sanitize_text(&entry.kind),
            student_id: sanitize_student_id(&entry.student_id),
            student_name: sanitize_student_name(&entry.student_name),
            detail: sanitize_text(&entry.detail),
            by_email: sanitize_email(&entry.by_email),
            employee_id: sanitize_text(&entry.employee_id),
        };

        let mut issues = Issues::default();
        issues.require_choice::<LogType>(
            "type",
            &sanitized.kind,
            &names(LogType::ALL, LogType::as_str),
        );
        issues.require("studentId", &sanitized.student_id);
        issues.staff_email("byEmail", &entry.by_email, self.allow_list());
        issues.finish("log_entry", sanitized)
    }

    /// A missing priority is cleaned to `normal`; an unknown one is an error.
    pub fn validate_broadcast(&self, broadcast: &Broadcast) -> ValidationResult<Broadcast> {
        let priority = sanitize_text(&broadcast.priority);
        let mut sanitized = Broadcast {
            message: sanitize_text(&broadcast.message),
            priority: if priority.is_empty() {
                Priority::default().as_str().to_string()
            } else {
                priority
            },
            sender_email: sanitize_email(&broadcast.sender_email),
            sender_name: sanitize_text(&broadcast.sender_name),
        };

        let mut issues = Issues::default();
        issues.require("message", &sanitized.message);
        if let Some(parsed) = issues.choice::<Priority>(
            "priority",
            &sanitized.priority,
            &names(Priority::ALL, Priority::as_str),
        ) {
            sanitized.priority = parsed.as_str().to_string();
        }
        issues.staff_email("senderEmail", &broadcast.sender_email, self.allow_list());
        issues.finish("broadcast", sanitized)
    }

    /// Members are cleaned as student IDs; blanks and repeats are dropped.
    pub fn validate_conflict_group(&self, group: &ConflictGroup) -> ValidationResult<ConflictGroup> {
        let mut members: Vec<String> = Vec::with_capacity(group.members.len());
        for member in &group.members {
            let id = sanitize_student_id(member);
            if !id.is_empty() && !members.contains(&id) {
                members.push(id);
            }
        }
        let sanitized = ConflictGroup {
            name: sanitize_text(&group.name),
            members,
        };

        let mut issues = Issues::default();
        issues.require("name", &sanitized.name);
        if sanitized.members.len() < MIN_CONFLICT_MEMBERS {
            issues.push(FieldIssue::TooFewMembers {
                found: sanitized.members.len(),
                min: MIN_CONFLICT_MEMBERS,
            });
        }
        issues.finish("conflict_group", sanitized)
    }

    pub fn validate_parent_contact(
        &self,
        contact: &ParentContact,
    ) -> ValidationResult<ParentContact> {
        let sanitized = ParentContact {
            student_id: sanitize_student_id(&contact.student_id),
            student_name: sanitize_student_name(&contact.student_name),
            contact_type: sanitize_text(&contact.contact_type),
            notes: sanitize_text(&contact.notes),
            by_email: sanitize_email(&contact.by_email),
        };

        let mut issues = Issues::default();
        issues.require("studentId", &sanitized.student_id);
        issues.require_choice::<ContactType>(
            "contactType",
            &sanitized.contact_type,
            &names(ContactType::ALL, ContactType::as_str),
        );
        issues.staff_email("byEmail", &contact.by_email, self.allow_list());
        issues.finish("parent_contact", sanitized)
    }

    pub fn validate_school(&self, school: &School) -> ValidationResult<School> {
        let sanitized = School {
            name: sanitize_text(&school.name),
            code: sanitize_text(&school.code),
        };

        let mut issues = Issues::default();
        issues.require("name", &sanitized.name);
        issues.require("code", &sanitized.code);
        issues.finish("school", sanitized)
    }
}

/// Validates a pass with the default policy.
pub fn validate_pass(pass: &Pass) -> ValidationResult<Pass> {
    Validator::default().validate_pass(pass)
}

/// Validates a log entry with the default policy.
pub fn validate_log_entry(entry: &LogEntry) -> ValidationResult<LogEntry> {
    Validator::default().validate_log_entry(entry)
}

/// Validates a broadcast with the default policy.
pub fn validate_broadcast(broadcast: &Broadcast) -> ValidationResult<Broadcast> {
    Validator::default().validate_broadcast(broadcast)
}

/// Validates a conflict group with the default policy.
pub fn validate_conflict_group(group: &ConflictGroup) -> ValidationResult<ConflictGroup> {
    Validator::default().validate_conflict_group(group)
}

/// Validates a parent contact with the default policy.
pub fn validate_parent_contact(contact: &ParentContact) -> ValidationResult<ParentContact> {
    Validator::default().validate_parent_contact(contact)
}

/// Validates a school with the default policy.
pub fn validate_school(school: &School) -> ValidationResult<School> {
    Validator::default().validate_school(school)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_pass() -> Pass {
        Pass {
            student_id: "1234567".to_string(),
            student_name: "john smith".to_string(),
            student_grade: "9".to_string(),
            destination: "Restroom".to_string(),
            teacher_email: "teacher@dadeschools.net".to_string(),
            teacher_name: "Ms. Rivera".to_string(),
            employee_id: "E100".to_string(),
            status: "ACTIVE".to_string(),
        }
    }

    #[test]
    fn test_valid_pass() {
        let result = validate_pass(&valid_pass());
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert_eq!(result.sanitized().student_name, "John Smith");
    }

    #[test]
    fn test_pass_reports_every_problem() {
        let pass = Pass {
            student_id: String::new(),
            destination: "   ".to_string(),
            status: "GONE".to_string(),
            ..valid_pass()
        };
        let result = validate_pass(&pass);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 3);
        assert_eq!(result.errors()[0], "studentId is required");
        assert_eq!(result.errors()[1], "destination is required");
        assert!(result.errors()[2].starts_with("status must be one of ACTIVE"));
    }

    #[test]
    fn test_pass_does_not_mutate_input() {
        let pass = valid_pass();
        let before = pass.clone();
        let _ = validate_pass(&pass);
        assert_eq!(pass, before);
    }

    #[test]
    fn test_staff_domain_enforcement_is_opt_in() {
        let pass = Pass {
            teacher_email: "someone@gmail.com".to_string(),
            ..valid_pass()
        };
        assert!(validate_pass(&pass).is_valid());

        let strict = Validator::new(ValidationPolicy {
            enforce_staff_domain: true,
            ..ValidationPolicy::default()
        });
        let result = strict.validate_pass(&pass);
        assert_eq!(
            result.errors(),
            ["teacherEmail must be a school district email address".to_string()]
        );
    }

    #[test]
    fn test_broadcast_priority_defaults_to_normal() {
        let broadcast = Broadcast {
            message: "Lockdown drill at 10".to_string(),
            ..Broadcast::default()
        };
        let result = validate_broadcast(&broadcast);
        assert!(result.is_valid());
        assert_eq!(result.sanitized().priority, "normal");
    }

    #[test]
    fn test_conflict_group_dedupes_members() {
        let group = ConflictGroup {
            name: "Cafeteria".to_string(),
            members: vec!["s-1".to_string(), "S1".to_string(), "!!".to_string()],
        };
        let result = validate_conflict_group(&group);
        assert!(!result.is_valid());
        assert_eq!(result.sanitized().members, vec!["S1"]);
        assert_eq!(
            result.errors(),
            ["members must list at least 2 distinct students (found 1)".to_string()]
        );
    }

    #[test]
    fn test_school_requires_name_and_code() {
        let result = validate_school(&School::default());
        assert_eq!(result.errors().len(), 2);

        let ok = validate_school(&School {
            name: "Coral Reef Senior High".to_string(),
            code: "7171".to_string(),
        });
        assert!(ok.is_valid());
    }
}
