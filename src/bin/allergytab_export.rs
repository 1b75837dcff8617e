//! allergytab-export: flatten a FHIR AllergyIntolerance bundle into a
//! review workbook and a JSON dump.
//!
//! Usage:
//!   # Outputs land next to the input file
//!   allergytab-export 충북대_통합조정_20240507.json
//!
//!   # Or in an explicit directory
//!   allergytab-export bundle_20240507.json --output-dir ./out

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "allergytab-export")]
#[command(about = "Flatten a FHIR AllergyIntolerance bundle into spreadsheets", long_about = None)]
struct Args {
    /// Input bundle file (FHIR JSON)
    #[arg(value_name = "BUNDLE")]
    input: PathBuf,

    /// Directory for the output files (default: next to the input)
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let summary = allergytab::run(&args.input, args.output_dir.as_deref())?;

    if summary.unbucketed_substances > 0 {
        eprintln!(
            "⚠ Warning: {} risk substance coding(s) had no resolved exposure-risk category and were left out of the risk sheets.",
            summary.unbucketed_substances
        );
    }

    println!(
        "Processed {} AllergyIntolerance resource(s).",
        summary.resources
    );
    println!(
        "Data saved to Excel: {}",
        summary.outputs.workbook.display()
    );
    println!("Data saved to JSON: {}", summary.outputs.json.display());

    Ok(())
}
