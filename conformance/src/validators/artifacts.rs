//! Artifact integrity validator.
//!
//! A conversion output directory holds `ttl/`, `jsonld/` and `hash/`. Every
//! `.sha256` file must hold a lowercase 64-hex digest equal to a fresh hash
//! of the Turtle file with the same stem, and the three folders must hold
//! the same number of files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fairlinked_graph::hash;
use regex::Regex;
use walkdir::WalkDir;

use crate::report::{Check, ValidationReport};

const VALIDATOR: &str = "artifacts/integrity";
const NAMING: &str = "artifacts/naming";

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|x| x == ext))
        .collect();
    files.sort();
    files
}

/// Validates the output directory `root`.
///
/// # Errors
///
/// Returns an error if an artifact file exists but cannot be read.
pub fn validate(root: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();

    let folders = [("ttl", "ttl"), ("jsonld", "jsonld"), ("hash", "sha256")];
    let mut counts = Vec::new();
    for (folder, ext) in folders {
        let dir = root.join(folder);
        if !dir.is_dir() {
            report.push(Check::fail(VALIDATOR, format!("{folder}/ not found in {}", root.display())));
            return Ok(report);
        }
        counts.push((folder, files_with_extension(&dir, ext).len()));
    }
    if counts.windows(2).all(|w| w[0].1 == w[1].1) {
        report.push(Check::pass(
            VALIDATOR,
            format!("ttl/, jsonld/ and hash/ each hold {} files", counts[0].1),
        ));
    } else {
        let details = counts.iter().map(|(f, n)| format!("{f}/: {n}")).collect();
        report.push(Check::fail(VALIDATOR, "file counts differ across folders").with_details(details));
    }

    let mut bad = Vec::new();
    let digests = files_with_extension(&root.join("hash"), "sha256");
    for digest_path in &digests {
        let digest = std::fs::read_to_string(digest_path)
            .with_context(|| format!("Failed to read {}", digest_path.display()))?;
        let digest = digest.trim();
        let name = digest_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if !hash::is_digest(digest) {
            bad.push(format!("{name}: not a 64-character lowercase hex digest"));
            continue;
        }
        let ttl = root.join("ttl").join(digest_path.with_extension("ttl").file_name().unwrap_or_default());
        if !ttl.is_file() {
            bad.push(format!("{name}: no matching Turtle file"));
            continue;
        }
        let bytes = std::fs::read(&ttl).with_context(|| format!("Failed to read {}", ttl.display()))?;
        if hash::sha256_hex(&bytes) != digest {
            bad.push(format!("{name}: digest does not match {}", ttl.display()));
        }
    }
    if bad.is_empty() {
        report.push(Check::pass(
            VALIDATOR,
            format!("{} digests match their Turtle files", digests.len()),
        ));
    } else {
        report.push(
            Check::fail(VALIDATOR, format!("{} digest files are invalid", bad.len())).with_details(bad),
        );
    }

    Ok(report)
}

/// Checks that every file under `dir` follows CRADLE naming: a lowercase
/// letter and a hyphen first, no underscores.
///
/// # Errors
///
/// Returns an error if the naming pattern cannot be compiled.
pub fn check_cradle_names(dir: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();
    let pattern = Regex::new(r"^[a-z]-[^_]+$").context("Invalid CRADLE name pattern")?;

    let names: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    if names.is_empty() {
        report.push(Check::warn(NAMING, format!("no files under {}", dir.display())));
        return Ok(report);
    }
    let bad: Vec<String> = names.iter().filter(|n| !pattern.is_match(n)).cloned().collect();
    if bad.is_empty() {
        report.push(Check::pass(NAMING, format!("{} file names follow CRADLE naming", names.len())));
    } else {
        report.push(
            Check::fail(NAMING, format!("{} file names break CRADLE naming", bad.len())).with_details(bad),
        );
    }
    Ok(report)
}
