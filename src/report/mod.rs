//! Reshaping and output - wide/long tables, the workbook, the JSON dump.

pub mod tables;
pub mod workbook;

pub use tables::{long_table, sheet_name, split_composite, wide_table, Table};
pub use workbook::{output_paths, write_json, write_workbook, OutputPaths};
