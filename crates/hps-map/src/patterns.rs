//! Header synonym dictionary.
//!
//! Rosters come from district exports, teacher spreadsheets and Spanish
//! language templates, so each field carries English and Spanish variants.
//! Entries are stored normalized.

use std::collections::BTreeMap;

use hps_model::StudentField;

use crate::utils::normalize_text;

fn builtin_synonyms(field: StudentField) -> &'static [&'static str] {
    match field {
        StudentField::FullName => &[
            "full name",
            "name",
            "student name",
            "student full name",
            "nombre",
            "nombre completo",
            "nombre del estudiante",
            "nombre del alumno",
            "estudiante",
            "alumno",
        ],
        StudentField::FirstName => &[
            "first name",
            "first",
            "given name",
            "fname",
            "student first name",
            "primer nombre",
            "nombre de pila",
            "nombres",
        ],
        StudentField::LastName => &[
            "last name",
            "last",
            "surname",
            "family name",
            "lname",
            "student last name",
            "apellido",
            "apellidos",
        ],
        StudentField::StudentIdNumber => &[
            "student id",
            "id",
            "student number",
            "id number",
            "student id number",
            "sid",
            "student no",
            "numero de estudiante",
            "id del estudiante",
            "identificacion",
            "matricula",
        ],
        StudentField::GradeLevel => &[
            "grade",
            "grade level",
            "gr",
            "class year",
            "grado",
            "nivel",
            "nivel de grado",
            "curso",
        ],
        StudentField::Email => &[
            "email",
            "e mail",
            "email address",
            "student email",
            "correo",
            "correo electronico",
            "email del estudiante",
        ],
        StudentField::HouseId => &["house", "house id", "house name", "team", "casa", "equipo"],
        StudentField::Homeroom => &[
            "homeroom",
            "home room",
            "hr",
            "advisory",
            "homeroom teacher",
            "salon",
            "salon hogar",
            "aula",
        ],
    }
}

/// Normalized synonyms for every student field.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: BTreeMap<StudentField, Vec<String>>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        let entries = StudentField::PRIORITY
            .into_iter()
            .map(|field| {
                let synonyms = builtin_synonyms(field)
                    .iter()
                    .map(|s| normalize_text(s))
                    .collect();
                (field, synonyms)
            })
            .collect();
        Self { entries }
    }
}

impl SynonymTable {
    /// Adds site-specific header names for `field`.
    pub fn extend<I, S>(&mut self, field: StudentField, synonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = self.entries.entry(field).or_default();
        for synonym in synonyms {
            let normalized = normalize_text(synonym.as_ref());
            if !normalized.is_empty() && !list.contains(&normalized) {
                list.push(normalized);
            }
        }
    }

    pub fn synonyms(&self, field: StudentField) -> &[String] {
        self.entries.get(&field).map(Vec::as_slice).unwrap_or_default()
    }
}
