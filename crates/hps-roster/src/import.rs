//! Turning spreadsheet rows into student records.

use hps_map::{
    ColumnMapping, DEFAULT_MIN_CONFIDENCE, MappingEngine, SynonymTable, UnmappedColumn, maps_name,
};
use hps_model::{StudentField, StudentRecord};
use hps_sanitize::{sanitize_email, sanitize_student_id, sanitize_student_name, sanitize_text};
use serde::Serialize;
use tracing::{debug, info};

/// Options for [`import_rows`].
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Minimum header confidence to commit a column.
    pub min_confidence: f64,
    pub synonyms: SynonymTable,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            synonyms: SynonymTable::default(),
        }
    }
}

/// A row that produced no student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Zero-based index into the data rows (header excluded).
    pub row: usize,
    pub reason: &'static str,
}

/// Outcome of importing one roster upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RosterImport {
    pub mapping: ColumnMapping,
    pub unmapped: Vec<UnmappedColumn>,
    pub students: Vec<StudentRecord>,
    /// Data row each entry of `students` came from.
    pub source_rows: Vec<usize>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl RosterImport {
    /// True if some name source (full name, or first and last) is mapped.
    pub fn has_name(&self) -> bool {
        maps_name(&self.mapping)
    }
}

/// Maps `headers`, then reads every row through the mapping.
///
/// Rows shorter than the header are read as if padded with empty cells;
/// extra cells are ignored. A row with neither a name nor a student ID is
/// skipped.
pub fn import_rows(
    headers: &[String],
    rows: &[Vec<String>],
    options: &ImportOptions,
) -> RosterImport {
    let engine = MappingEngine::new(options.min_confidence, options.synonyms.clone());
    let result = engine.suggest(headers);
    let mut import = RosterImport {
        mapping: result.mapping,
        unmapped: result.unmapped,
        ..RosterImport::default()
    };

    for (row_index, row) in rows.iter().enumerate() {
        let mut record = StudentRecord::default();
        for (field, column) in &import.mapping {
            let cell = row.get(column.index).map(String::as_str).unwrap_or_default();
            record.set(*field, cell.trim().to_string());
        }
        complete_names(&mut record);
        let record = sanitize_record(&record);

        if record.display_name().is_empty() && record.student_id_number.is_empty() {
            debug!(row = row_index, "skipping roster row without name or ID");
            import.skipped_rows.push(SkippedRow {
                row: row_index,
                reason: "no name or student ID",
            });
            continue;
        }
        import.students.push(record);
        import.source_rows.push(row_index);
    }

    info!(
        columns = headers.len(),
        mapped = import.mapping.len(),
        students = import.students.len(),
        skipped = import.skipped_rows.len(),
        "roster import complete"
    );
    import
}

/// Fills whichever of full name / first + last is missing from the other.
///
/// "Last, First" full names are split on the comma; otherwise the first word
/// is the first name and the rest the last name.
pub fn complete_names(record: &mut StudentRecord) {
    let has_full = !record.full_name.trim().is_empty();
    let has_first = !record.first_name.trim().is_empty();
    let has_last = !record.last_name.trim().is_empty();

    if has_full && !(has_first && has_last) {
        let (first, last) = split_full_name(&record.full_name);
        if !has_first {
            record.first_name = first;
        }
        if !has_last {
            record.last_name = last;
        }
    }

    if !has_full && (has_first || has_last) {
        record.full_name = record.display_name();
    }
}

fn split_full_name(full: &str) -> (String, String) {
    if let Some((last, first)) = full.split_once(',') {
        return (first.trim().to_string(), last.trim().to_string());
    }
    let mut words = full.split_whitespace();
    let first = words.next().unwrap_or_default().to_string();
    let last = words.collect::<Vec<_>>().join(" ");
    (first, last)
}

fn sanitize_record(raw: &StudentRecord) -> StudentRecord {
    StudentRecord {
        full_name: sanitize_student_name(raw.full_name.as_str()),
        first_name: sanitize_student_name(raw.first_name.as_str()),
        last_name: sanitize_student_name(raw.last_name.as_str()),
        student_id_number: sanitize_student_id(raw.student_id_number.as_str()),
        grade_level: sanitize_text(raw.grade_level.as_str()),
        email: sanitize_email(raw.email.as_str()),
        house_id: sanitize_text(raw.house_id.as_str()),
        homeroom: sanitize_text(raw.homeroom.as_str()),
    }
}

/// Value of `field` for every imported student, in order.
pub fn column_values(import: &RosterImport, field: StudentField) -> Vec<&str> {
    import.students.iter().map(|s| s.get(field)).collect()
}
