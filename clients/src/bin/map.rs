//! `fairlinked-map`: resolves the columns of a CSV table against an ontology.
//!
//! **Outputs** (under `--out`):
//! - `matched_log.txt`: `column => fragment`, one per line
//! - `unmatched_log.txt`: unmatched column names, sorted
//! - `metadata_template.jsonld`: JSON-LD template with one node per column
//! - `variable_metadata.json`: variable metadata seeded from the matches
//!
//! **Usage:**
//! ```text
//! fairlinked-map --table data.csv --ontology mds.ttl [--out output] [--prefix mds]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fairlinked::mapper::metadata_template;
use fairlinked::{ColumnMapper, Table, TermIndex, VariableMetadataModel};
use fairlinked_graph::NamespaceRegistry;

/// Map table columns to ontology terms.
#[derive(Parser)]
#[command(name = "fairlinked-map", about = "Map CSV columns to ontology terms")]
struct Args {
    /// CSV table whose header row is mapped.
    #[arg(long)]
    table: PathBuf,

    /// Ontology file (Turtle, JSON-LD or N-Triples).
    #[arg(long)]
    ontology: PathBuf,

    /// Output directory.
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Prefix for the template identifiers.
    #[arg(long, default_value = "mds")]
    prefix: String,

    /// Extra namespaces as a two-column CSV.
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

    let index = TermIndex::from_path(&args.ontology)
        .with_context(|| format!("Failed to index {}", args.ontology.display()))?;
    let table = Table::from_csv_path(&args.table)?;
    println!("Indexed {} ontology labels", index.len());

    let mut mapper = ColumnMapper::new(&index);
    let annotations = mapper.annotate(table.columns());
    let log = mapper.into_log();

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory: {}", args.out.display()))?;
    log.write(
        &args.out.join("matched_log.txt"),
        &args.out.join("unmatched_log.txt"),
    )?;

    let created = chrono::Local::now().format("%Y-%m-%d").to_string();
    let template = metadata_template(&annotations, &registry, &args.prefix, &created);
    let template_path = args.out.join("metadata_template.jsonld");
    fs::write(&template_path, serde_json::to_string_pretty(&template)?)
        .with_context(|| format!("Failed to write {}", template_path.display()))?;

    let metadata = VariableMetadataModel::from_annotations(&annotations);
    let metadata_path = args.out.join("variable_metadata.json");
    fs::write(&metadata_path, serde_json::to_string_pretty(&metadata.to_json())?)
        .with_context(|| format!("Failed to write {}", metadata_path.display()))?;

    println!(
        "Columns: {} matched, {} unmatched",
        log.matched().len(),
        log.unmatched().len()
    );
    println!("  Written: {}", template_path.display());
    println!("  Written: {}", metadata_path.display());
    Ok(())
}
