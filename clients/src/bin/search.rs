//! `fairlinked-search`: keyword search over the subjects of an RDF file.
//!
//! Each keyword is matched token by token against subject labels with an
//! edit distance that grows with the keyword length. Hits go to a CSV file.
//!
//! **Usage:**
//! ```text
//! fairlinked-search --ontology mds.ttl --out hits.csv temperature pressure
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fairlinked::search;
use fairlinked_graph::{parser, NamespaceRegistry};

/// Search an ontology by keyword.
#[derive(Parser)]
#[command(name = "fairlinked-search", about = "Fuzzy keyword search over RDF subjects")]
struct Args {
    /// RDF file to search.
    #[arg(long)]
    ontology: PathBuf,

    /// CSV file for the hits.
    #[arg(long, default_value = "search_results.csv")]
    out: PathBuf,

    /// Keywords, tried in order.
    #[arg(required = true)]
    keywords: Vec<String>,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    fairlinked_clients::init_logging(args.verbose);

    let graph = parser::parse_file(&args.ontology)
        .with_context(|| format!("Failed to parse {}", args.ontology.display()))?;
    let details = search::extract_subject_details(&graph, &NamespaceRegistry::standard());
    let keywords: Vec<&str> = args.keywords.iter().map(String::as_str).collect();
    let hits = search::search_subjects(&details, &keywords);

    for hit in &hits {
        println!("[{}] {} ({})", hit.searched_keyword, hit.label, hit.subject_id);
    }
    search::write_csv(&hits, &args.out)?;
    println!("{} hits across {} subjects", hits.len(), details.len());
    println!("  Written: {}", args.out.display());
    Ok(())
}
