//! Integration tests for the command layer.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hps_cli::cli::{ConfigArgs, EntityArg, RosterArgs, ValidateArgs};
use hps_cli::commands::{read_csv, run_config, run_roster, run_validate};
use hps_cli::logging::REDACTED_VALUE;
use hps_cli::settings::Settings;
use hps_cli::summary::{duplicates_table, mapping_table, validate_table};
use hps_roster::DuplicateKind;
use hps_sanitize::RateLimitConfig;
use regex::Regex;
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn validate_args(entity: EntityArg, input: &Path) -> ValidateArgs {
    ValidateArgs {
        entity,
        input: input.to_path_buf(),
        json: false,
        enforce_limits: false,
    }
}

const UPLOAD: &str = "\
Nombre Completo,ID,Grado,Transporte
Ana Diaz,1002003,9,Bus 4
jon smith,,10,
,,,
Ana  Diaz,,9,
";

const EXISTING: &str = "\
Student Name,Student ID,Grade
Ana Diaz,1002003,9
John Smith,2000001,10
";

#[test]
fn read_csv_keeps_ragged_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "ragged.csv", "Name,ID\nAna,1,extra\nLuis\n");
    let table = read_csv(&path).unwrap();
    assert_eq!(table.headers, vec!["Name", "ID"]);
    assert_eq!(table.rows[0].len(), 3);
    assert_eq!(table.rows[1], vec!["Luis"]);
}

#[test]
fn roster_reports_mapping_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let args = RosterArgs {
        roster: write_file(&dir, "upload.csv", UPLOAD),
        existing: Some(write_file(&dir, "existing.csv", EXISTING)),
        min_confidence: None,
        json: false,
    };
    let report = run_roster(&args, &Settings::default()).unwrap();

    assert!(!report.has_errors(), "{:?}", report.errors);
    assert_eq!(report.rows, 4);
    assert_eq!(report.import.students.len(), 3);
    assert_eq!(report.import.source_rows, vec![0, 1, 3]);
    assert_eq!(report.import.unmapped[0].header, "Transporte");

    let kinds: Vec<(usize, DuplicateKind)> = report
        .duplicates
        .iter()
        .map(|candidate| (candidate.new_index, candidate.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (0, DuplicateKind::ExactId),
            (1, DuplicateKind::LikelyDuplicate),
            (2, DuplicateKind::LikelyDuplicate),
            (2, DuplicateKind::BatchDuplicate),
        ]
    );
    assert_eq!(report.duplicate_count(DuplicateKind::LikelyDuplicate), 2);

    let mut mapping = mapping_table(&report);
    mapping.force_no_tty();
    let mapping = mapping.to_string();
    assert!(Regex::new(r"full_name\s*│\s*1\s*│\s*Nombre Completo\s*│\s*1\.00\s*│\s*exact").unwrap().is_match(&mapping), "{mapping}");
    assert!(Regex::new(r"grade_level\s*│\s*3\s*│\s*Grado").unwrap().is_match(&mapping), "{mapping}");

    let mut duplicates = duplicates_table(&report);
    duplicates.force_no_tty();
    let duplicates = duplicates.to_string();
    let likely = Regex::new(r"(?m)^.*Jon Smith.*likely_duplicate.*John Smith.*0\.90.*$").unwrap();
    assert!(likely.is_match(&duplicates), "{duplicates}");
    let batch = Regex::new(r"(?m)^.*5.*batch_duplicate.*upload row 2.*$").unwrap();
    assert!(batch.is_match(&duplicates), "{duplicates}");
}

#[test]
fn roster_without_name_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let args = RosterArgs {
        roster: write_file(&dir, "ids.csv", "Student ID,Grade\n100,9\n"),
        existing: None,
        min_confidence: None,
        json: false,
    };
    let report = run_roster(&args, &Settings::default()).unwrap();
    assert!(report.has_errors());
    assert_eq!(report.import.students.len(), 1);
}

#[test]
fn min_confidence_flag_overrides_settings() {
    let dir = TempDir::new().unwrap();
    let args = RosterArgs {
        roster: write_file(&dir, "typo.csv", "Student Name,Homerom\nAna Diaz,204\n"),
        existing: None,
        min_confidence: Some(0.99),
        json: false,
    };
    let report = run_roster(&args, &Settings::default()).unwrap();
    assert_eq!(report.import.mapping.len(), 1);
    assert_eq!(report.import.unmapped[0].header, "Homerom");
}

#[test]
fn missing_roster_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let args = RosterArgs {
        roster: dir.path().join("missing.csv"),
        existing: None,
        min_confidence: None,
        json: false,
    };
    let error = run_roster(&args, &Settings::default()).unwrap_err();
    assert!(format!("{error:#}").contains("missing.csv"));
}

#[test]
fn validate_pass_file_snapshot() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "passes.json",
        r#"[
            {"studentId": "a-1", "destination": "Library"},
            {"destination": "<b>Gym</b>", "studentGrade": 7}
        ]"#,
    );
    let report = run_validate(&validate_args(EntityArg::Pass, &input), &Settings::default())
        .unwrap();
    assert!(report.has_errors());
    assert_eq!(report.invalid_count(), 1);

    insta::with_settings!({sort_maps => true}, {
        insta::assert_json_snapshot!(report, @r###"
        {
          "entity": "pass",
          "records": [
            {
              "index": 0,
              "valid": true,
              "errors": [],
              "sanitized": {
                "destination": "Library",
                "employeeId": "",
                "status": "",
                "studentGrade": "",
                "studentId": "A1",
                "studentName": "",
                "teacherEmail": "",
                "teacherName": ""
              }
            },
            {
              "index": 1,
              "valid": false,
              "errors": [
                "studentId is required"
              ],
              "sanitized": {
                "destination": "&lt;b&gt;Gym&lt;&#x2F;b&gt;",
                "employeeId": "",
                "status": "",
                "studentGrade": "7",
                "studentId": "",
                "studentName": "",
                "teacherEmail": "",
                "teacherName": ""
              }
            }
          ]
        }
        "###);
    });

    let mut table = validate_table(&report);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(Regex::new(r"2\s*│\s*INVALID\s*│\s*studentId is required").unwrap().is_match(&rendered), "{rendered}");
}

#[test]
fn validate_single_object_and_non_objects() {
    let dir = TempDir::new().unwrap();
    let single = write_file(&dir, "school.json", r#"{"name": "Hialeah High", "code": "7071"}"#);
    let report = run_validate(&validate_args(EntityArg::School, &single), &Settings::default())
        .unwrap();
    assert_eq!(report.records.len(), 1);
    assert!(!report.has_errors());

    let mixed = write_file(&dir, "mixed.json", r#"[42, null, {"name": "X"}]"#);
    let report = run_validate(&validate_args(EntityArg::School, &mixed), &Settings::default())
        .unwrap();
    assert_eq!(report.invalid_count(), 3);
    assert_eq!(report.records[0].errors, vec!["record must be a JSON object"]);
}

#[test]
fn enforced_limits_reject_the_burst_tail() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "burst.json",
        r#"[
            {"studentId": "1", "destination": "Office"},
            {"studentId": "2", "destination": "Office"},
            {"studentId": "3", "destination": "Office"}
        ]"#,
    );
    let settings = Settings {
        rate_limits: BTreeMap::from([("issue_pass".to_string(), RateLimitConfig::new(2, 60))]),
        ..Settings::default()
    };
    let mut args = validate_args(EntityArg::Pass, &input);
    args.enforce_limits = true;

    let report = run_validate(&args, &settings).unwrap();
    let valid: Vec<bool> = report.records.iter().map(|record| record.valid).collect();
    assert_eq!(valid, vec![true, true, false]);
    assert_eq!(report.records[2].errors, vec!["rate limit 'issue_pass' exceeded"]);
}

#[test]
fn config_economy_out_of_range() {
    let dir = TempDir::new().unwrap();
    let args = ConfigArgs {
        section: "economy".to_string(),
        input: write_file(
            &dir,
            "economy.json",
            r#"{"studentPointRatio": 1.5, "teamPointRatio": 0.6}"#,
        ),
        json: false,
    };
    let report = run_config(&args).unwrap();
    assert!(report.has_errors());
    assert!(report.result.errors()[0].contains("studentPointRatio"));
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn record_trace_events_are_redacted() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "passes.json",
        r#"[{"studentId": "77", "studentName": "Ana Diaz", "destination": "Library"}]"#,
    );
    let captured = CapturedLog::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let report = tracing::subscriber::with_default(subscriber, || {
        run_validate(&validate_args(EntityArg::Pass, &input), &Settings::default())
    })
    .unwrap();
    assert!(!report.has_errors());

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("checked record"), "{output}");
    assert!(output.contains(REDACTED_VALUE), "{output}");
    assert!(!output.contains("Ana Diaz"), "{output}");
}
