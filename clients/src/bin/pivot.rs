//! `fairlinked-pivot`: reads RDF back into a wide table.
//!
//! **Outputs:**
//! - `<table>.parquet` with `.json`, `.csv` and `.xlsx` siblings
//! - `<metadata>.json` and, beside it, a `.csv` with one row per variable
//!
//! With `--templates`, the input is a directory of filled metadata templates
//! and the outputs are `<table>.csv` (with type, unit and study stage header
//! rows), `.parquet` and `.json`.
//!
//! **Usage:**
//! ```text
//! fairlinked-pivot --input output/ttl [--table output/table.parquet] [--metadata output/variables.json]
//! fairlinked-pivot --templates --input filled/ [--table output/merged_output.parquet]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fairlinked::pivot;
use fairlinked_graph::NamespaceRegistry;

/// Pivot RDF files into a table.
#[derive(Parser)]
#[command(name = "fairlinked-pivot", about = "Pivot RDF files into a wide table")]
struct Args {
    /// RDF file or directory searched recursively.
    #[arg(long)]
    input: PathBuf,

    /// Parquet output path; the other formats are written beside it.
    #[arg(long, default_value = "output/table.parquet")]
    table: PathBuf,

    /// Variable metadata JSON output path.
    #[arg(long, default_value = "output/variable_metadata.json")]
    metadata: PathBuf,

    /// Read filled metadata templates, one row per file.
    #[arg(long)]
    templates: bool,

    /// Extra namespaces as a two-column CSV, used to compact column names.
    #[arg(long)]
    namespaces: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    fairlinked_clients::init_logging(args.verbose);

    let mut registry = NamespaceRegistry::standard();
    if let Some(path) = &args.namespaces {
        registry.merge(&NamespaceRegistry::from_csv_path(path)?)?;
    }

    if args.templates {
        let templates = pivot::parse_templates(&args.input, &registry)?;
        let dir = args.table.parent().map(PathBuf::from).unwrap_or_default();
        let basename = args
            .table
            .file_stem()
            .map_or_else(|| "merged_output".to_owned(), |s| s.to_string_lossy().into_owned());
        let paths = pivot::export_templates(&templates, &dir, &basename)?;
        println!("Templates read: {}", templates.table.len());
        for path in [&paths.csv, &paths.parquet, &paths.json] {
            println!("  Written: {}", path.display());
        }
        return Ok(());
    }

    let result = pivot::parse(&args.input, &registry)?;
    let paths = pivot::export(&result.table, &result.metadata, &args.table, &args.metadata)?;

    println!("{}", result.stats);
    for path in [&paths.parquet, &paths.json, &paths.csv, &paths.xlsx, &paths.metadata] {
        println!("  Written: {}", path.display());
    }
    if let Some(path) = &paths.metadata_csv {
        println!("  Written: {}", path.display());
    }
    Ok(())
}
