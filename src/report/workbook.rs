//! Output emission: the multi-sheet workbook and the JSON dump.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::extract::FlatRecord;
use crate::report::tables::Table;

const WORKBOOK_SUFFIX: &str = "final_extracted_data_multiple_sheets.xlsx";
const JSON_SUFFIX: &str = "final_extracted_data.json";

/// Where the two outputs of a run go.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub workbook: PathBuf,
    pub json: PathBuf,
}

/// Derive the output paths from the input file name.
///
/// The prefix is the file name's text before its first underscore (the
/// whole name when it has none). Outputs land next to the input unless
/// `output_dir` overrides.
pub fn output_paths(input: &Path, output_dir: Option<&Path>) -> OutputPaths {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = file_name.split('_').next().unwrap_or("").to_string();

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    OutputPaths {
        workbook: dir.join(format!("{prefix}_{WORKBOOK_SUFFIX}")),
        json: dir.join(format!("{prefix}_{JSON_SUFFIX}")),
    }
}

/// Write every table to one workbook and close it.
///
/// `save` flushes and releases the workbook handle; a failure on any sheet
/// aborts before success is reported.
pub fn write_workbook(path: &Path, tables: &[Table]) -> Result<()> {
    let mut workbook = build_workbook(tables)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to save workbook to {}", path.display()))?;
    Ok(())
}

fn build_workbook(tables: &[Table]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&table.name)
            .with_context(|| format!("invalid sheet name {:?}", table.name))?;
        for (col, name) in table.columns.iter().enumerate() {
            sheet
                .write_string(0, col as u16, name)
                .with_context(|| format!("failed to write header of sheet {:?}", table.name))?;
        }
        for (row, cells) in table.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                sheet
                    .write_string(row as u32 + 1, col as u16, cell)
                    .with_context(|| format!("failed to write row of sheet {:?}", table.name))?;
            }
        }
    }
    Ok(workbook)
}

/// Dump the full record list as pretty JSON.
///
/// Four-space indentation, non-ASCII preserved literally.
pub fn write_json(path: &Path, records: &[FlatRecord]) -> Result<()> {
    let bytes = records_to_json(records)?;
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn records_to_json(records: &[FlatRecord]) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    records
        .serialize(&mut serializer)
        .context("failed to serialize records")?;
    Ok(bytes)
}
