//! Terminal rendering of record lists and reports.
//!
//! Any row type that can be exported to CSV can also be printed: the CSV
//! headers become the column titles.

use std::fmt::Write as _;

use serde::Serialize;

use super::OutputFormat;
use crate::error::Result;
use crate::export::CsvRow;

/// Render `rows` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render<T: CsvRow + Serialize>(rows: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Plain => Ok(plain(rows)),
        OutputFormat::Table => Ok(table(rows)),
    }
}

/// One line per row, fields separated by " | ".
#[must_use]
pub fn plain<T: CsvRow>(rows: &[T]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.fields().join(" | "));
        out.push('\n');
    }
    out
}

/// Aligned columns under a header line.
#[must_use]
pub fn table<T: CsvRow>(rows: &[T]) -> String {
    let lines: Vec<Vec<String>> = rows.iter().map(CsvRow::fields).collect();
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.chars().count()).collect();
    for line in &lines {
        for (width, field) in widths.iter_mut().zip(line) {
            *width = (*width).max(field.chars().count());
        }
    }

    let mut out = String::new();
    let headers: Vec<String> = T::HEADERS.iter().map(|h| (*h).to_string()).collect();
    push_row(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for line in &lines {
        push_row(&mut out, line, &widths);
    }
    let _ = writeln!(out, "({} rows)", rows.len());
    out
}

fn push_row(out: &mut String, fields: &[String], widths: &[usize]) {
    let cells: Vec<String> = fields
        .iter()
        .zip(widths)
        .map(|(field, width)| {
            let pad = width.saturating_sub(field.chars().count());
            format!("{field}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(cells.join("  ").trim_end());
    out.push('\n');
}
