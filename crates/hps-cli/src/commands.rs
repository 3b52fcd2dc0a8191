use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use hps_model::{
    Broadcast, ConflictGroup, LogEntry, ParentContact, Pass, School, ValidationResult,
};
use hps_roster::{find_duplicates, import_rows};
use hps_sanitize::{RateLimiters, SystemClock};
use hps_validate::{Validator, validate_config};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, info_span, trace, warn};

use crate::cli::{ConfigArgs, EntityArg, RosterArgs, ValidateArgs};
use crate::logging::redact_value;
use crate::settings::Settings;
use crate::types::{ConfigReport, RecordOutcome, RosterReport, ValidateReport};

/// Header row and data rows of a CSV file.
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads a CSV file whose first row is the header.
///
/// Rows may have a different number of cells than the header.
pub fn read_csv(path: &Path) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read header row of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(CsvTable { headers, rows })
}

pub fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse JSON in {}", path.display()))
}

pub fn run_roster(args: &RosterArgs, settings: &Settings) -> Result<RosterReport> {
    let span = info_span!("roster", file = %args.roster.display());
    let _guard = span.enter();

    let options = settings.import_options(args.min_confidence);
    let upload = read_csv(&args.roster)?;
    let import = import_rows(&upload.headers, &upload.rows, &options);
    for (student, row) in import.students.iter().zip(&import.source_rows) {
        trace!(
            row = *row,
            student = redact_value(&student.display_name()),
            id = redact_value(&student.student_id_number),
            "imported student"
        );
    }

    let existing = match &args.existing {
        Some(path) => {
            let table = read_csv(path)?;
            let students = import_rows(&table.headers, &table.rows, &options).students;
            info!(path = %path.display(), students = students.len(), "loaded existing roster");
            students
        }
        None => Vec::new(),
    };

    let duplicates = find_duplicates(&import.students, &existing);
    for candidate in &duplicates {
        debug!(
            row = candidate.new_index,
            student = redact_value(&candidate.new_record.display_name()),
            kind = candidate.kind.as_str(),
            "duplicate"
        );
    }

    let mut errors = Vec::new();
    if !import.has_name() {
        warn!("no column matched a student name");
        errors.push("no column could be matched to a student name".to_string());
    }
    if !upload.rows.is_empty() && import.students.is_empty() {
        errors.push("no students could be read from the file".to_string());
    }

    Ok(RosterReport {
        source: args.roster.clone(),
        rows: upload.rows.len(),
        import,
        duplicates,
        errors,
    })
}

pub fn run_validate(args: &ValidateArgs, settings: &Settings) -> Result<ValidateReport> {
    let span = info_span!("validate", entity = args.entity.as_str());
    let _guard = span.enter();

    let value = read_json(&args.input)?;
    let entries = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let validator = settings.validator();
    let limiters = args
        .enforce_limits
        .then(|| settings.rate_limiters(Arc::new(SystemClock)));
    let limiter_name = limiter_for(args.entity);

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let mut outcome = check_record(&validator, args.entity, index, entry);
        trace!(
            record = index,
            sanitized = redact_value(&outcome.sanitized.to_string()),
            valid = outcome.valid,
            "checked record"
        );
        if let (Some(limiters), Some(name)) = (&limiters, limiter_name)
            && !limiters.check(name)?
        {
            debug!(record = index, limiter = name, "rate limit reached");
            outcome.valid = false;
            outcome.errors.push(format!("rate limit '{name}' exceeded"));
        }
        records.push(outcome);
    }

    let report = ValidateReport {
        entity: args.entity.as_str(),
        records,
    };
    info!(
        records = report.records.len(),
        invalid = report.invalid_count(),
        "validation complete"
    );
    Ok(report)
}

pub fn run_config(args: &ConfigArgs) -> Result<ConfigReport> {
    let value = read_json(&args.input)?;
    let result = validate_config(&args.section, &value);
    Ok(ConfigReport {
        section: args.section.clone(),
        result,
    })
}

/// Limiter that guards creating records of `entity`, if any.
pub fn limiter_for(entity: EntityArg) -> Option<&'static str> {
    match entity {
        EntityArg::Pass => Some(RateLimiters::ISSUE_PASS),
        EntityArg::LogEntry => Some(RateLimiters::LOG_INFRACTION),
        EntityArg::Broadcast => Some(RateLimiters::SEND_BROADCAST),
        EntityArg::ConflictGroup | EntityArg::ParentContact | EntityArg::School => None,
    }
}

/// Validates one decoded JSON entry as `entity`.
pub fn check_record(
    validator: &Validator,
    entity: EntityArg,
    index: usize,
    entry: &Value,
) -> RecordOutcome {
    if !entry.is_object() {
        return RecordOutcome {
            index,
            valid: false,
            errors: vec!["record must be a JSON object".to_string()],
            sanitized: Value::Null,
        };
    }
    match entity {
        EntityArg::Pass => outcome(index, entry, |r: &Pass| validator.validate_pass(r)),
        EntityArg::LogEntry => {
            outcome(index, entry, |r: &LogEntry| validator.validate_log_entry(r))
        }
        EntityArg::Broadcast => {
            outcome(index, entry, |r: &Broadcast| validator.validate_broadcast(r))
        }
        EntityArg::ConflictGroup => outcome(index, entry, |r: &ConflictGroup| {
            validator.validate_conflict_group(r)
        }),
        EntityArg::ParentContact => outcome(index, entry, |r: &ParentContact| {
            validator.validate_parent_contact(r)
        }),
        EntityArg::School => outcome(index, entry, |r: &School| validator.validate_school(r)),
    }
}

fn outcome<T, F>(index: usize, entry: &Value, validate: F) -> RecordOutcome
where
    T: DeserializeOwned + Serialize,
    F: FnOnce(&T) -> ValidationResult<T>,
{
    match serde_json::from_value::<T>(entry.clone()) {
        Ok(record) => {
            let result = validate(&record);
            RecordOutcome {
                index,
                valid: result.is_valid(),
                errors: result.errors().to_vec(),
                sanitized: serde_json::to_value(result.sanitized()).unwrap_or_default(),
            }
        }
        Err(error) => RecordOutcome {
            index,
            valid: false,
            errors: vec![format!("record could not be read: {error}")],
            sanitized: Value::Null,
        },
    }
}
