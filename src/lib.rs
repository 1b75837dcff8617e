//! # Allergytab - FHIR AllergyIntolerance bundle flattener
//!
//! Converts FHIR JSON bundles of AllergyIntolerance resources into a
//! multi-sheet review spreadsheet (one wide sheet plus long-format sheets
//! for the multi-valued fields) and a flattened JSON dump.
//!
//! ## Pipeline
//!
//! - **loader**: read the bundle file and yield its `entry` records
//! - **extract**: flatten each resource into a fixed-schema [`FlatRecord`]
//! - **report**: assemble the wide `total` table, explode the designated
//!   sequence columns into long sheets, write the workbook and the JSON dump
//!
//! ## Quick start
//!
//! ```rust
//! use allergytab::extract::flatten_resource;
//! use serde_json::json;
//!
//! let resource = json!({
//!     "id": "allergy-1",
//!     "criticality": "high",
//!     "reaction": [{
//!         "substance": {
//!             "coding": [{
//!                 "system": "http://www.whocc.no/atc",
//!                 "code": "B01AC06",
//!                 "display": "Aspirin"
//!             }]
//!         }
//!     }]
//! });
//!
//! let extraction = flatten_resource(&resource);
//! assert_eq!(
//!     extraction.record.substance_info,
//!     vec!["http://www.whocc.no/atc##B01AC06##Aspirin"]
//! );
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

pub mod extract;
pub mod loader;
pub mod report;

// Re-export commonly used types for convenience
pub use extract::{flatten_resource, Extraction, FlatRecord};
pub use loader::{load_entries, LoadError};
pub use report::{OutputPaths, Table};

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub outputs: OutputPaths,
    pub resources: usize,
    /// Risk substance codings that reached no bucket because their
    /// exposure-risk category never resolved.
    pub unbucketed_substances: usize,
}

/// Main entry point: flatten one bundle file into its workbook and JSON
/// dump.
///
/// Whole-dataset-in-memory batch conversion; any stage failure aborts the
/// run. Outputs land next to the input unless `output_dir` overrides.
pub fn run(input: &Path, output_dir: Option<&Path>) -> Result<RunSummary> {
    let entries = loader::load_entries(input)
        .with_context(|| format!("failed to load bundle {}", input.display()))?;

    let null = Value::Null;
    let mut records = Vec::with_capacity(entries.len());
    let mut unbucketed_substances = 0;
    for entry in &entries {
        let resource = entry.get("resource").unwrap_or(&null);
        let extraction = flatten_resource(resource);
        unbucketed_substances += extraction.unbucketed_substances;
        records.push(extraction.record);
    }

    let mut tables = vec![report::wide_table(&records)?];
    for column in extract::EXPLODE_COLUMNS {
        tables.push(report::long_table(&records, column)?);
    }

    let outputs = report::output_paths(input, output_dir);
    report::write_workbook(&outputs.workbook, &tables)?;
    report::write_json(&outputs.json, &records)?;

    Ok(RunSummary {
        outputs,
        resources: records.len(),
        unbucketed_substances,
    })
}
