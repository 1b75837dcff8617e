//! Wide and long table assembly from flattened records.

use anyhow::{Context, Result};

use crate::extract::{FieldValue, FlatRecord, CODING_SEPARATOR, EXPLODE_COLUMNS};

/// Worksheet-name length limit imposed by the spreadsheet format.
const SHEET_NAME_LIMIT: usize = 31;

/// A named, column-ordered table ready for the workbook writer.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The wide `total` table: one row per resource, every column kept,
/// sequence cells rendered as their JSON array text.
pub fn wide_table(records: &[FlatRecord]) -> Result<Table> {
    let columns: Vec<String> = FlatRecord::COLUMNS.iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let mut row = Vec::with_capacity(columns.len());
        for column in FlatRecord::COLUMNS {
            row.push(render_cell(record, column)?);
        }
        rows.push(row);
    }

    Ok(Table {
        name: "total".to_string(),
        columns,
        rows,
    })
}

/// One long table: `column` exploded into a row per sequence element, the
/// composite split into `_system`/`_code`/`_display` columns, rows without
/// a code dropped, and the other designated sequence columns omitted.
pub fn long_table(records: &[FlatRecord], column: &str) -> Result<Table> {
    let kept: Vec<&str> = FlatRecord::COLUMNS
        .iter()
        .copied()
        .filter(|c| !EXPLODE_COLUMNS.contains(c))
        .collect();

    let mut columns: Vec<String> = kept.iter().map(|c| c.to_string()).collect();
    columns.push(format!("{column}_system"));
    columns.push(format!("{column}_code"));
    columns.push(format!("{column}_display"));

    let mut rows = Vec::new();
    for record in records {
        let Some(FieldValue::List(elements)) = record.field(column) else {
            continue;
        };
        for element in elements {
            let (system, code, display) = split_composite(element);
            if code.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(columns.len());
            for kept_column in &kept {
                row.push(render_cell(record, kept_column)?);
            }
            row.push(system.to_string());
            row.push(code.to_string());
            row.push(display.to_string());
            rows.push(row);
        }
    }

    Ok(Table {
        name: sheet_name(column),
        columns,
        rows,
    })
}

/// Split a composite string into its (system, code, display) parts.
///
/// Only the first two separators split; a display containing the separator
/// stays whole, so formatting then splitting round-trips.
pub fn split_composite(composite: &str) -> (&str, &str, &str) {
    let mut parts = composite.splitn(3, CODING_SEPARATOR);
    (
        parts.next().unwrap_or(""),
        parts.next().unwrap_or(""),
        parts.next().unwrap_or(""),
    )
}

/// Sheet name for a column: the last dot-separated segment, truncated to
/// the worksheet-name limit.
pub fn sheet_name(column: &str) -> String {
    let segment = column.rsplit('.').next().unwrap_or(column);
    segment.chars().take(SHEET_NAME_LIMIT).collect()
}

fn render_cell(record: &FlatRecord, column: &str) -> Result<String> {
    match record.field(column) {
        Some(FieldValue::Text(text)) => Ok(text.to_string()),
        Some(FieldValue::List(list)) => {
            serde_json::to_string(list).context("failed to render sequence cell")
        }
        None => Ok(String::new()),
    }
}
