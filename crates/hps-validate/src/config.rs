//! Validation of admin configuration sections.
//!
//! Config screens post a section name and a loosely typed JSON object. The
//! section decides which rules apply; an unknown section is reported as an
//! error in the result rather than rejected outright.

use hps_model::ValidationResult;
use hps_sanitize::sanitize_text;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::checks::Issues;
use crate::issue::FieldIssue;

pub const LABELS_SECTION: &str = "labels";
pub const ECONOMY_SECTION: &str = "economy";

const LABEL_LISTS: [&str; 3] = ["infractionButtons", "incentiveButtons", "passDestinations"];
const RATIO_FIELDS: [&str; 2] = ["studentPointRatio", "teamPointRatio"];

/// Button and destination labels shown in the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelsConfig {
    pub infraction_buttons: Vec<String>,
    pub incentive_buttons: Vec<String>,
    pub pass_destinations: Vec<String>,
}

/// How earned points split between students and their team (house).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomyConfig {
    /// Clamped into [0, 1]; `None` when missing or not a number.
    pub student_point_ratio: Option<f64>,
    pub team_point_ratio: Option<f64>,
}

/// Cleaned config payload, shaped by section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SanitizedConfig {
    Labels(LabelsConfig),
    Economy(EconomyConfig),
    /// Section name was not recognized; serializes as `null`.
    Unknown,
}

/// Validates one configuration section.
pub fn validate_config(section: &str, config: &Value) -> ValidationResult<SanitizedConfig> {
    let mut issues = Issues::default();
    match section.trim() {
        LABELS_SECTION => {
            let labels = check_labels(config, &mut issues);
            issues.finish("config.labels", SanitizedConfig::Labels(labels))
        }
        ECONOMY_SECTION => {
            let economy = check_economy(config, &mut issues);
            issues.finish("config.economy", SanitizedConfig::Economy(economy))
        }
        other => {
            issues.push(FieldIssue::UnknownSection {
                section: other.to_string(),
            });
            issues.finish("config", SanitizedConfig::Unknown)
        }
    }
}

fn section_object<'a>(
    section: &str,
    config: &'a Value,
    issues: &mut Issues,
) -> Option<&'a Map<String, Value>> {
    let object = config.as_object();
    if object.is_none() {
        issues.push(FieldIssue::NotAnObject {
            section: section.to_string(),
        });
    }
    object
}

fn check_labels(config: &Value, issues: &mut Issues) -> LabelsConfig {
    let Some(object) = section_object(LABELS_SECTION, config, issues) else {
        return LabelsConfig::default();
    };
    let [infraction, incentive, destinations] =
        LABEL_LISTS.map(|field| check_label_list(field, object.get(field), issues));
    LabelsConfig {
        infraction_buttons: infraction,
        incentive_buttons: incentive,
        pass_destinations: destinations,
    }
}

/// Absent lists count as empty; present lists must hold non-blank strings.
fn check_label_list(field: &'static str, value: Option<&Value>, issues: &mut Issues) -> Vec<String> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            issues.push(FieldIssue::NotAList { field });
            return Vec::new();
        }
    };
    let mut labels = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let label = sanitize_text(item);
        if label.is_empty() {
            issues.push(FieldIssue::BlankLabel { field, index });
        } else {
            labels.push(label);
        }
    }
    labels
}

fn check_economy(config: &Value, issues: &mut Issues) -> EconomyConfig {
    let Some(object) = section_object(ECONOMY_SECTION, config, issues) else {
        return EconomyConfig::default();
    };
    let [student, team] = RATIO_FIELDS.map(|field| check_ratio(field, object.get(field), issues));
    EconomyConfig {
        student_point_ratio: student,
        team_point_ratio: team,
    }
}

fn check_ratio(field: &'static str, value: Option<&Value>, issues: &mut Issues) -> Option<f64> {
    let ratio = match value {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::Required { field });
            return None;
        }
        Some(value) => match value.as_f64() {
            Some(ratio) => ratio,
            None => {
                issues.push(FieldIssue::NotANumber { field });
                return None;
            }
        },
    };
    if !(0.0..=1.0).contains(&ratio) {
        issues.push(FieldIssue::OutOfRange {
            field,
            value: ratio,
            min: 0.0,
            max: 1.0,
        });
    }
    Some(ratio.clamp(0.0, 1.0))
}
