//! Dashboard records as submitted by forms.
//!
//! The same types carry both the raw submission and its sanitized copy; a
//! validator never mutates its input, it builds a new record instead.
//! Field names serialize in camelCase to match the dashboard payloads.

use serde::{Deserialize, Serialize};

use crate::text::lenient;

/// A hall pass issued by a teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pass {
    #[serde(deserialize_with = "lenient::text")]
    pub student_id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub student_name: String,
    #[serde(deserialize_with = "lenient::text_or_number")]
    pub student_grade: String,
    #[serde(deserialize_with = "lenient::text")]
    pub destination: String,
    #[serde(deserialize_with = "lenient::text")]
    pub teacher_email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub teacher_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub employee_id: String,
    /// Raw status text; empty when the form did not send one.
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
}

/// An append-only behavior log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEntry {
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::text")]
    pub student_id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub student_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub detail: String,
    #[serde(deserialize_with = "lenient::text")]
    pub by_email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub employee_id: String,
}

/// A school-wide message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Broadcast {
    #[serde(deserialize_with = "lenient::text")]
    pub message: String,
    #[serde(deserialize_with = "lenient::text")]
    pub priority: String,
    #[serde(deserialize_with = "lenient::text")]
    pub sender_email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub sender_name: String,
}

/// Students who must not hold passes at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConflictGroup {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text_list")]
    pub members: Vec<String>,
}

/// A logged contact with a student's parent or guardian.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentContact {
    #[serde(deserialize_with = "lenient::text")]
    pub student_id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub student_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub contact_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,
    #[serde(deserialize_with = "lenient::text")]
    pub by_email: String,
}

/// A school tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct School {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_pass_decodes_camel_case() {
        let pass: Pass = serde_json::from_value(json!({
            "studentId": "123",
            "studentName": "Ana",
            "studentGrade": 9,
            "destination": "Library",
        }))
        .unwrap();
        assert_eq!(pass.student_id, "123");
        assert_eq!(pass.student_grade, "9");
        assert_eq!(pass.destination, "Library");
        assert!(pass.status.is_empty());
    }

    #[test]
    fn test_wrongly_typed_fields_decode_as_empty() {
        let entry: LogEntry = serde_json::from_value(json!({
            "type": 7,
            "studentId": null,
            "detail": ["x"],
        }))
        .unwrap();
        assert!(entry.kind.is_empty());
        assert!(entry.student_id.is_empty());
        assert!(entry.detail.is_empty());
    }

    #[test]
    fn test_conflict_members_keep_only_strings() {
        let group: ConflictGroup = serde_json::from_value(json!({
            "name": "Hallway A",
            "members": ["S1", 2, null, "S3"],
        }))
        .unwrap();
        assert_eq!(group.members, vec!["S1", "S3"]);
    }

    #[test]
    fn test_log_entry_serializes_type_key() {
        let entry = LogEntry {
            kind: "TARDY".to_string(),
            ..LogEntry::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "TARDY");
    }
}
