//! Student roster fields and records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical roster field a spreadsheet column can be mapped onto.
///
/// Declaration order is the assignment priority: when two fields compete for
/// the same column, the earlier one claims it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentField {
    FullName,
    FirstName,
    LastName,
    StudentIdNumber,
    GradeLevel,
    Email,
    HouseId,
    Homeroom,
}

impl StudentField {
    /// All fields in assignment priority order.
    pub const PRIORITY: [Self; 8] = [
        Self::FullName,
        Self::FirstName,
        Self::LastName,
        Self::StudentIdNumber,
        Self::GradeLevel,
        Self::Email,
        Self::HouseId,
        Self::Homeroom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::StudentIdNumber => "student_id_number",
            Self::GradeLevel => "grade_level",
            Self::Email => "email",
            Self::HouseId => "house_id",
            Self::Homeroom => "homeroom",
        }
    }

    /// Looks a field up by its snake_case name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student as read from a roster upload or the existing roster.
///
/// Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRecord {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub student_id_number: String,
    pub grade_level: String,
    pub email: String,
    pub house_id: String,
    pub homeroom: String,
}

impl StudentRecord {
    /// Shorthand for the fields duplicate detection looks at.
    pub fn new(
        full_name: impl Into<String>,
        student_id_number: impl Into<String>,
        grade_level: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            student_id_number: student_id_number.into(),
            grade_level: grade_level.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: StudentField) -> &str {
        match field {
            StudentField::FullName => &self.full_name,
            StudentField::FirstName => &self.first_name,
            StudentField::LastName => &self.last_name,
            StudentField::StudentIdNumber => &self.student_id_number,
            StudentField::GradeLevel => &self.grade_level,
            StudentField::Email => &self.email,
            StudentField::HouseId => &self.house_id,
            StudentField::Homeroom => &self.homeroom,
        }
    }

    pub fn set(&mut self, field: StudentField, value: String) {
        let slot = match field {
            StudentField::FullName => &mut self.full_name,
            StudentField::FirstName => &mut self.first_name,
            StudentField::LastName => &mut self.last_name,
            StudentField::StudentIdNumber => &mut self.student_id_number,
            StudentField::GradeLevel => &mut self.grade_level,
            StudentField::Email => &mut self.email,
            StudentField::HouseId => &mut self.house_id,
            StudentField::Homeroom => &mut self.homeroom,
        };
        *slot = value;
    }

    /// Full name, or "first last" when only the parts are known.
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.trim().to_string();
        }
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_matches_declaration_order() {
        let mut sorted = StudentField::PRIORITY;
        sorted.sort();
        assert_eq!(sorted, StudentField::PRIORITY);
    }

    #[test]
    fn test_parse_field_name() {
        assert_eq!(StudentField::parse("grade_level"), Some(StudentField::GradeLevel));
        assert_eq!(StudentField::parse("nope"), None);
    }

    #[test]
    fn test_display_name_falls_back_to_parts() {
        let mut record = StudentRecord::default();
        record.set(StudentField::FirstName, "Ana".to_string());
        record.set(StudentField::LastName, "Diaz".to_string());
        assert_eq!(record.display_name(), "Ana Diaz");

        record.set(StudentField::FullName, "Ana M. Diaz".to_string());
        assert_eq!(record.display_name(), "Ana M. Diaz");
    }
}
