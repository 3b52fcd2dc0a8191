use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hps_map::{ConfidenceLevel, ConfidenceThresholds};
use hps_roster::{DuplicateKind, DuplicateOf};
use hps_sanitize::RateLimiters;

use crate::types::{ConfigReport, RosterReport, ValidateReport};

pub fn print_roster_report(report: &RosterReport) {
    println!("Roster: {}", report.source.display());
    println!(
        "Rows: {}  Students: {}  Skipped: {}",
        report.rows,
        report.import.students.len(),
        report.import.skipped_rows.len()
    );
    println!("{}", mapping_table(report));
    let levels = ConfidenceThresholds::default().count_by_level(&report.import.mapping);
    for (level, count) in levels.iter().rev() {
        println!("  {count} column(s): {}", level.description());
    }
    if !report.import.unmapped.is_empty() {
        let headers: Vec<&str> = report
            .import
            .unmapped
            .iter()
            .map(|column| column.header.as_str())
            .collect();
        println!("Unmapped columns: {}", headers.join(", "));
    }
    if !report.duplicates.is_empty() {
        println!();
        println!("Possible duplicates:");
        println!("{}", duplicates_table(report));
    }
    print_errors(&report.errors);
}

pub fn print_validate_report(report: &ValidateReport) {
    println!("{}", validate_table(report));
    println!(
        "{} of {} {} record(s) valid",
        report.records.len() - report.invalid_count(),
        report.records.len(),
        report.entity
    );
}

pub fn print_config_report(report: &ConfigReport) {
    if report.result.is_valid() {
        println!("{}: valid", report.section);
    } else {
        println!("{}: invalid", report.section);
        print_errors(report.result.errors());
    }
}

pub fn print_limits(limiters: &RateLimiters) {
    println!("{}", limits_table(limiters));
}

fn print_errors(errors: &[String]) {
    if !errors.is_empty() {
        eprintln!("Errors:");
        for error in errors {
            eprintln!("- {error}");
        }
    }
}

/// Field → column assignments, in field priority order.
pub fn mapping_table(report: &RosterReport) -> Table {
    let thresholds = ConfidenceThresholds::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Header"),
        header_cell("Confidence"),
        header_cell("Method"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (field, column) in &report.import.mapping {
        table.add_row(vec![
            Cell::new(field.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(column.index + 1),
            Cell::new(&column.header),
            confidence_cell(column.confidence, thresholds.categorize(column.confidence)),
            dim_cell(column.method.as_str()),
        ]);
    }
    table
}

pub fn duplicates_table(report: &RosterReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Student"),
        header_cell("Kind"),
        header_cell("Matches"),
        header_cell("Confidence"),
        header_cell("Reason"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for candidate in &report.duplicates {
        let row = report
            .import
            .source_rows
            .get(candidate.new_index)
            .copied()
            .unwrap_or(candidate.new_index);
        let matches = match &candidate.duplicate_of {
            DuplicateOf::Existing { record, .. } => record.display_name(),
            DuplicateOf::Batch { index } => {
                let earlier = report
                    .import
                    .source_rows
                    .get(*index)
                    .copied()
                    .unwrap_or(*index);
                format!("upload row {}", earlier + 2)
            }
        };
        table.add_row(vec![
            // +2: one for the header row, one for 1-based numbering
            Cell::new(row + 2),
            Cell::new(candidate.new_record.display_name()),
            kind_cell(candidate.kind),
            Cell::new(matches),
            Cell::new(format!("{:.2}", candidate.confidence)),
            Cell::new(&candidate.reason),
        ]);
    }
    table
}

pub fn validate_table(report: &ValidateReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Status"),
        header_cell("Errors"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    for record in &report.records {
        let status = if record.valid {
            Cell::new("OK").fg(Color::Green)
        } else {
            Cell::new("INVALID")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        };
        let errors = if record.errors.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(record.errors.join("\n"))
        };
        table.add_row(vec![Cell::new(record.index + 1), status, errors]);
    }
    table
}

pub fn limits_table(limiters: &RateLimiters) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Limiter"),
        header_cell("Requests"),
        header_cell("Window (s)"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for name in limiters.names() {
        let Some(limiter) = limiters.get(name) else {
            continue;
        };
        let config = limiter.config();
        table.add_row(vec![
            Cell::new(name),
            Cell::new(config.max_requests),
            Cell::new(config.window_secs),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn confidence_cell(confidence: f64, level: Option<ConfidenceLevel>) -> Cell {
    let cell = Cell::new(format!("{confidence:.2}"));
    match level {
        Some(ConfidenceLevel::High) => cell.fg(Color::Green),
        Some(ConfidenceLevel::Medium) => cell.fg(Color::Yellow),
        Some(ConfidenceLevel::Low) | None => cell.fg(Color::Red),
    }
}

fn kind_cell(kind: DuplicateKind) -> Cell {
    let cell = Cell::new(kind.as_str());
    match kind {
        DuplicateKind::ExactId | DuplicateKind::BatchDuplicate => {
            cell.fg(Color::Red).add_attribute(Attribute::Bold)
        }
        DuplicateKind::LikelyDuplicate => cell.fg(Color::Red),
        DuplicateKind::PossibleDuplicate | DuplicateKind::SimilarId => cell.fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
