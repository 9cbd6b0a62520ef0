//! `fairlinked-validate`: checks a conversion output directory.
//!
//! Runs the artifact integrity, file naming and Data Cube structure
//! validators. With `--table`, the output is also pivoted back and compared
//! with the source table.
//!
//! **Usage:**
//! ```text
//! fairlinked-validate --output output [--slices 1] [--cradle] [--table data.csv]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use fairlinked::{pivot, Table};
use fairlinked_conformance::validators::roundtrip;
use fairlinked_conformance::{run_all, OutputPaths};
use fairlinked_graph::NamespaceRegistry;

/// Validate FAIRLinked conversion output.
#[derive(Parser)]
#[command(name = "fairlinked-validate", about = "Validate FAIRLinked conversion output")]
struct Args {
    /// Directory holding ttl/, jsonld/ and hash/.
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Slices expected per Turtle file.
    #[arg(long)]
    slices: Option<usize>,

    /// Require CRADLE file names.
    #[arg(long)]
    cradle: bool,

    /// Source table for the round-trip comparison.
    #[arg(long)]
    table: Option<PathBuf>,

    /// Identifier column for the round-trip comparison.
    #[arg(long, default_value = "ExperimentId")]
    identifier: String,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    fairlinked_clients::init_logging(args.verbose);

    let mut report = run_all(&OutputPaths {
        root: args.output.clone(),
        expected_slices: args.slices,
        cradle: args.cradle,
    })?;

    if let Some(path) = &args.table {
        let original = Table::from_csv_path(path)?;
        let pivoted = pivot::parse(&args.output.join("ttl"), &NamespaceRegistry::standard())?;
        report.extend(roundtrip::validate(&original, &pivoted.table, &args.identifier));
    }

    println!("FAIRLinked Validation Report");
    println!("============================");
    println!();
    println!("{report}");

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Validation FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }
    println!("Validation PASSED.");
    Ok(())
}
