//! `fairlinked-convert`: converts a CSV table into RDF Data Cube graphs.
//!
//! **Modes:**
//! - `row`: one dataset per row, files named `{prefix}_{id}_{timestamp}`
//! - `cradle`: the same graphs, files named `{letter}-{prefix}-{id}-{timestamp}`
//! - `dataset`: one dataset with a slice per row
//!
//! Every graph is written as Turtle and JSON-LD with a SHA-256 digest of the
//! Turtle bytes under `--out/{ttl,jsonld,hash}`. Variables lacking a unit or
//! category are asked for on stdin unless `--no-prompt` is given.
//!
//! **Usage:**
//! ```text
//! fairlinked-convert --table data.csv --metadata variables.json --orcid 0000-0001-2345-6789 [--mode row]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use fairlinked::cube::{self, identifier_columns, timestamp_now, OutputFolders};
use fairlinked::{
    ConversionConfig, ConversionContext, PromptCompletion, Table, TermIndex, UnitVocabulary,
    VariableMetadataModel,
};
use fairlinked_clients::StdinPrompt;
use fairlinked_graph::parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One file set per row.
    Row,
    /// One file set per row, CRADLE file names.
    Cradle,
    /// A single dataset.
    Dataset,
}

/// Convert a table to RDF Data Cube graphs.
#[derive(Parser)]
#[command(name = "fairlinked-convert", about = "Convert a CSV table to RDF Data Cube graphs")]
struct Args {
    /// CSV table to convert.
    #[arg(long)]
    table: PathBuf,

    /// Variable metadata JSON.
    #[arg(long)]
    metadata: PathBuf,

    /// Conversion configuration TOML.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Creator ORCID; overrides the configuration.
    #[arg(long)]
    orcid: Option<String>,

    /// Dataset title for `--mode dataset`; overrides the configuration.
    #[arg(long)]
    dataset_name: Option<String>,

    /// Addressing mode.
    #[arg(long, value_enum, default_value_t = Mode::Row)]
    mode: Mode,

    /// Ontology to harvest additional units from.
    #[arg(long)]
    ontology: Option<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Fail instead of prompting for missing metadata.
    #[arg(long)]
    no_prompt: bool,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<ConversionConfig> {
    let mut config = match (&args.config, &args.orcid) {
        (Some(path), _) => ConversionConfig::from_path(path)?,
        (None, Some(orcid)) => ConversionConfig::new(orcid.clone()),
        (None, None) => bail!("either --config or --orcid is required"),
    };
    if let Some(orcid) = &args.orcid {
        config.creator = orcid.clone();
    }
    if let Some(name) = &args.dataset_name {
        config.dataset_name = Some(name.clone());
    }
    Ok(config)
}

fn unit_vocabulary(config: &ConversionConfig, ontology: Option<&PathBuf>) -> Result<UnitVocabulary> {
    let mut units = config.unit_vocabulary();
    if let Some(path) = ontology {
        let graph = parser::parse_file(path)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        units.extend(&UnitVocabulary::from_graph(&graph));
        tracing::info!(units = units.len(), terms = TermIndex::build(&graph).len(), "loaded ontology");
    }
    Ok(units)
}

fn main() -> Result<()> {
    let args = Args::parse();
    fairlinked_clients::init_logging(args.verbose);

    let config = load_config(&args)?;
    let registry = config.namespace_registry()?;
    let table = Table::from_csv_path(&args.table)?;
    let mut metadata = VariableMetadataModel::from_json_path(&args.metadata)?;
    let ctx = ConversionContext::from_config(&config, &registry, timestamp_now());
    let identifiers = identifier_columns(&table, &ctx);

    let incomplete = metadata.incomplete(&identifiers);
    if !incomplete.is_empty() {
        if args.no_prompt {
            bail!("incomplete metadata for: {}", incomplete.join(", "));
        }
        let units = unit_vocabulary(&config, args.ontology.as_ref())?;
        let mut provider = PromptCompletion::new(StdinPrompt);
        let completed = metadata.complete(&mut provider, &units, &identifiers)?;
        println!("Completed metadata for {completed} variables");
    }

    let summary = match args.mode {
        Mode::Row => cube::convert_row_by_row(&table, &metadata, &ctx, &args.out)?,
        Mode::Cradle => cube::convert_row_by_row_cradle(&table, &metadata, &ctx, &args.out)?,
        Mode::Dataset => {
            let name = config.dataset_name.as_deref().unwrap_or("SampleDataset");
            cube::convert_entire_dataset(&table, &metadata, &ctx, name, &OutputFolders::under(&args.out))?
        }
    };

    for artifact in &summary.artifacts {
        println!("  Written: {} ({} triples)", artifact.turtle.display(), artifact.triples);
    }
    println!(
        "{} graphs written, {} failed, {} triples total",
        summary.artifacts.len(),
        summary.failures.len(),
        summary.total_triples
    );
    if !summary.failures.is_empty() {
        for failure in &summary.failures {
            eprintln!("  {}: {}", failure.key, failure.message);
        }
        process::exit(1);
    }
    Ok(())
}
