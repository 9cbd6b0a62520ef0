//! FAIRLinked conformance suite.
//!
//! Validators for the files a conversion run leaves behind and for the
//! tables the pivot recovers from them.
//!
//! # Conformance Scope
//!
//! | Output | Check |
//! |--------|-------|
//! | Turtle graphs | RDF Data Cube structure: one DataSet, one SliceKey, slices, observations |
//! | Digest files | 64 lowercase hex, equal to a re-hash of the Turtle bytes |
//! | Output folders | `ttl/`, `jsonld/` and `hash/` hold the same number of files |
//! | CRADLE file names | lowercase letter and hyphen first, no underscores |
//! | Pivot tables | one row per source row, identifier values recovered |
//!
//! # Entry Point
//!
//! ```no_run
//! use fairlinked_conformance::{run_all, OutputPaths};
//! use std::path::PathBuf;
//!
//! let paths = OutputPaths {
//!     root: PathBuf::from("output"),
//!     expected_slices: Some(1),
//!     cradle: false,
//! };
//! let report = run_all(&paths).expect("Failed to run validation");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::PathBuf;

use walkdir::WalkDir;

pub use report::{Check, Severity, ValidationReport};

/// A conversion output directory and what it should contain.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Directory holding `ttl/`, `jsonld/` and `hash/`.
    pub root: PathBuf,
    /// Slices expected in each Turtle file; `None` requires at least one.
    pub expected_slices: Option<usize>,
    /// Whether file names follow CRADLE naming.
    pub cradle: bool,
}

/// Runs every output validator and returns the combined report.
///
/// Validators run in this order:
/// 1. Artifact integrity (folder counts, digests)
/// 2. CRADLE file names, when requested
/// 3. Data Cube structure of every Turtle file
///
/// # Errors
///
/// Returns an error only if a file cannot be read or parsed.
pub fn run_all(paths: &OutputPaths) -> anyhow::Result<ValidationReport> {
    let mut report = ValidationReport::new();

    report.extend(validators::artifacts::validate(&paths.root)?);

    if paths.cradle {
        for folder in ["ttl", "jsonld", "hash"] {
            report.extend(validators::artifacts::check_cradle_names(&paths.root.join(folder))?);
        }
    }

    let mut turtle: Vec<PathBuf> = WalkDir::new(paths.root.join("ttl"))
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|x| x == "ttl"))
        .collect();
    turtle.sort();
    for path in &turtle {
        tracing::debug!(path = %path.display(), "validating cube structure");
        report.extend(validators::cube::validate_file(path, paths.expected_slices)?);
    }

    Ok(report)
}
