//! RDF Data Cube construction from tabular data.
//!
//! Three addressing modes share one triple builder:
//! - [`convert_row_by_row`]: one dataset per row, one file set per row
//! - [`convert_row_by_row_cradle`]: the same graphs under letter-prefixed,
//!   hyphen-separated file names
//! - [`convert_entire_dataset`]: one dataset holding a slice per row
//!
//! Minted IRIs follow `{prefix}:{Kind}-{key}-{timestamp}`, so identical
//! input and timestamp always give identical graphs. Every graph is written
//! as Turtle and JSON-LD, and the SHA-256 of the Turtle bytes goes to
//! `hash/{stem}.sha256`. A row that fails to write is logged and recorded in
//! the [`ConversionSummary`]; the batch continues.

mod builder;
pub mod naming;

use std::path::{Path, PathBuf};

use fairlinked_graph::{hash, serializer, Graph, NamespaceRegistry, RdfFormat};

pub use builder::{identifier_columns, typed_literal};
use builder::{CubePlan, UsedKeys};
use naming::{slug, Naming};

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::metadata::VariableMetadataModel;
use crate::table::Table;

/// Everything a conversion run shares across rows.
#[derive(Debug, Clone)]
pub struct ConversionContext<'a> {
    /// Namespace bindings; must bind `prefix`.
    pub namespaces: &'a NamespaceRegistry,
    /// Prefix minted identifiers live under.
    pub prefix: String,
    /// Creator identifier (ORCID), attached verbatim.
    pub creator: String,
    /// Run timestamp, `%Y%m%d%H%M%S`.
    pub timestamp: String,
    /// Configured identifier columns; empty means auto-detect.
    pub identifier_columns: Vec<String>,
}

impl<'a> ConversionContext<'a> {
    /// Creates a context with auto-detected identifier columns.
    pub fn new(
        namespaces: &'a NamespaceRegistry,
        prefix: impl Into<String>,
        creator: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            namespaces,
            prefix: prefix.into(),
            creator: creator.into(),
            timestamp: timestamp.into(),
            identifier_columns: Vec::new(),
        }
    }

    /// Context for a loaded configuration.
    pub fn from_config(
        config: &ConversionConfig,
        namespaces: &'a NamespaceRegistry,
        timestamp: impl Into<String>,
    ) -> Self {
        Self::new(namespaces, &config.prefix, &config.creator, timestamp)
            .with_identifier_columns(config.identifier_columns.clone())
    }

    /// Sets the identifier columns.
    #[must_use]
    pub fn with_identifier_columns(mut self, columns: Vec<String>) -> Self {
        self.identifier_columns = columns;
        self
    }
}

/// Current local time as `%Y%m%d%H%M%S`.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Destination directories for Turtle, JSON-LD and digest files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFolders {
    /// Turtle files.
    pub ttl: PathBuf,
    /// JSON-LD files.
    pub jsonld: PathBuf,
    /// `.sha256` files.
    pub hash: PathBuf,
}

impl OutputFolders {
    /// `ttl/`, `jsonld/` and `hash/` under `root`.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            ttl: root.join("ttl"),
            jsonld: root.join("jsonld"),
            hash: root.join("hash"),
        }
    }
}

/// One written graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Row key or dataset name the graph is scoped to.
    pub key: String,
    /// Turtle file.
    pub turtle: PathBuf,
    /// JSON-LD file.
    pub jsonld: PathBuf,
    /// Digest file of the Turtle bytes.
    pub digest_file: PathBuf,
    /// SHA-256 of the Turtle bytes.
    pub turtle_digest: String,
    /// SHA-256 of the JSON-LD bytes.
    pub jsonld_digest: String,
    /// Triples in the graph.
    pub triples: usize,
}

/// A row or dataset that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// Zero-based row index, `None` for a whole-dataset write.
    pub row: Option<usize>,
    /// Key of the failed unit.
    pub key: String,
    /// Error message.
    pub message: String,
}

/// Outcome of a conversion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Written graphs in row order.
    pub artifacts: Vec<Artifact>,
    /// Units that failed.
    pub failures: Vec<RowFailure>,
    /// Sum of triples over every written graph.
    pub total_triples: usize,
}

impl ConversionSummary {
    fn push(&mut self, artifact: Artifact) {
        self.total_triples += artifact.triples;
        self.artifacts.push(artifact);
    }
}

/// One graph per row, keyed by the row's identifier.
///
/// Rows without an identifier value are keyed `row{n}` (1-based). Keys are
/// unique across the batch: a row whose key, or its CRADLE spelling, is
/// already taken becomes `{key}-row{n}`.
///
/// # Errors
///
/// Returns an error if `ctx.prefix` is unbound or a unit or concept CURIE
/// uses an unbound prefix.
pub fn row_graphs(
    table: &Table,
    metadata: &VariableMetadataModel,
    ctx: &ConversionContext<'_>,
) -> Result<Vec<(String, Graph)>> {
    let plan = CubePlan::new(table, metadata, ctx)?;
    let mut used = UsedKeys::default();
    Ok(table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let number = i + 1;
            let title = plan.row_key(row).unwrap_or_else(|| format!("row{number}"));
            let key = used.claim_row(plan.slice_key_of(number, row), number);
            let graph = plan.build(&key, &title, &[(key.clone(), row.as_slice())]);
            (key, graph)
        })
        .collect())
}

/// A single graph with one slice per row.
///
/// # Errors
///
/// Same conditions as [`row_graphs`].
pub fn dataset_graph(
    table: &Table,
    metadata: &VariableMetadataModel,
    ctx: &ConversionContext<'_>,
    dataset_name: &str,
) -> Result<Graph> {
    let plan = CubePlan::new(table, metadata, ctx)?;
    if plan.dimension_count() == 0 {
        tracing::warn!("table has no identifier column");
    }
    let mut used = UsedKeys::default();
    let rows: Vec<(String, &[String])> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let key = used.claim_row(plan.slice_key_of(i + 1, row), i + 1);
            (key, row.as_slice())
        })
        .collect();
    Ok(plan.build(dataset_name, dataset_name, &rows))
}

/// Writes one graph per row under `output_root/{ttl,jsonld,hash}`.
///
/// # Errors
///
/// Returns an error only for run-level problems (see [`row_graphs`]);
/// per-row write failures are recorded in the summary.
pub fn convert_row_by_row(
    table: &Table,
    metadata: &VariableMetadataModel,
    ctx: &ConversionContext<'_>,
    output_root: &Path,
) -> Result<ConversionSummary> {
    convert_rows(table, metadata, ctx, output_root, Naming::Standard)
}

/// [`convert_row_by_row`] with CRADLE file names.
///
/// Triple content is identical to the standard mode.
///
/// # Errors
///
/// Same conditions as [`convert_row_by_row`].
pub fn convert_row_by_row_cradle(
    table: &Table,
    metadata: &VariableMetadataModel,
    ctx: &ConversionContext<'_>,
    output_root: &Path,
) -> Result<ConversionSummary> {
    convert_rows(table, metadata, ctx, output_root, Naming::Cradle)
}

fn convert_rows(
    table: &Table,
    metadata: &VariableMetadataModel,
    ctx: &ConversionContext<'_>,
    output_root: &Path,
    naming: Naming,
) -> Result<ConversionSummary> {
    let folders = OutputFolders::under(output_root);
    let mut rng = rand::rng();
    let mut summary = ConversionSummary::default();
    for (i, (key, graph)) in row_graphs(table, metadata, ctx)?.into_iter().enumerate() {
        let stem = naming.stem(&slug(&ctx.prefix), &key, &ctx.timestamp, &mut rng);
        match write_graph(&graph, ctx.namespaces, &folders, &stem, &key) {
            Ok(artifact) => summary.push(artifact),
            Err(e) => {
                tracing::error!(row = i, %key, error = %e, "failed to write row graph");
                summary.failures.push(RowFailure {
                    row: Some(i),
                    key,
                    message: e.to_string(),
                });
            }
        }
    }
    tracing::info!(
        rows = table.len(),
        written = summary.artifacts.len(),
        failed = summary.failures.len(),
        triples = summary.total_triples,
        ?naming,
        "row-by-row conversion finished"
    );
    Ok(summary)
}

/// Writes a single graph with one slice per row.
///
/// # Errors
///
/// Returns an error only for run-level problems (see [`row_graphs`]); a
/// write failure is recorded in the summary.
pub fn convert_entire_dataset(
    table: &Table,
    metadata: &VariableMetadataModel,
    ctx: &ConversionContext<'_>,
    dataset_name: &str,
    folders: &OutputFolders,
) -> Result<ConversionSummary> {
    let graph = dataset_graph(table, metadata, ctx, dataset_name)?;
    let key = slug(dataset_name);
    let stem = Naming::Standard.stem(&slug(&ctx.prefix), &key, &ctx.timestamp, &mut rand::rng());
    let mut summary = ConversionSummary::default();
    match write_graph(&graph, ctx.namespaces, folders, &stem, &key) {
        Ok(artifact) => summary.push(artifact),
        Err(e) => {
            tracing::error!(dataset = dataset_name, error = %e, "failed to write dataset graph");
            summary.failures.push(RowFailure {
                row: None,
                key,
                message: e.to_string(),
            });
        }
    }
    tracing::info!(
        rows = table.len(),
        triples = summary.total_triples,
        "whole-dataset conversion finished"
    );
    Ok(summary)
}

fn write_graph(
    graph: &Graph,
    namespaces: &NamespaceRegistry,
    folders: &OutputFolders,
    stem: &str,
    key: &str,
) -> Result<Artifact> {
    let mut bytes = serializer::serialize(graph, namespaces, &[RdfFormat::Turtle, RdfFormat::JsonLd]);
    let ttl_bytes = bytes.remove(&RdfFormat::Turtle).unwrap_or_default();
    let jsonld_bytes = bytes.remove(&RdfFormat::JsonLd).unwrap_or_default();

    let turtle = folders.ttl.join(format!("{stem}.ttl"));
    let jsonld = folders.jsonld.join(format!("{stem}.jsonld"));
    let digest_file = folders.hash.join(format!("{stem}.sha256"));

    let turtle_digest = hash::write_with_digest(&turtle, &ttl_bytes, &digest_file)?;
    hash::write_file(&jsonld, &jsonld_bytes)?;
    tracing::debug!(%key, path = %turtle.display(), digest = %turtle_digest, "wrote graph");

    Ok(Artifact {
        key: key.to_owned(),
        turtle,
        jsonld,
        digest_file,
        turtle_digest,
        jsonld_digest: hash::sha256_hex(&jsonld_bytes),
        triples: graph.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::VariableMetadata;
    use fairlinked_graph::{vocab, Term};

    fn table() -> Table {
        Table::new(
            vec!["ExperimentId".into(), "Temperature".into(), "Material".into()],
            vec![
                vec!["EXP001".into(), "25.0".into(), "Si".into()],
                vec!["EXP002".into(), "".into(), "Ge".into()],
                vec!["".into(), "35.0".into(), "Si".into()],
            ],
        )
    }

    fn metadata() -> VariableMetadataModel {
        let mut m = VariableMetadataModel::new();
        m.insert(VariableMetadata::new("ExperimentId"));
        m.insert(VariableMetadata::measure("Temperature", "unit:DEG_C"));
        m.insert(VariableMetadata::new("Material"));
        m
    }

    #[test]
    fn identical_input_gives_identical_graphs() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "0000-0001-2345-6789", "20250128120000");
        let a = dataset_graph(&table(), &metadata(), &ctx, "TestDataset").expect("graph");
        let b = dataset_graph(&table(), &metadata(), &ctx, "TestDataset").expect("graph");
        let ttl = |g: &Graph| serializer::turtle::to_turtle(g, &registry);
        assert_eq!(ttl(&a), ttl(&b));
    }

    #[test]
    fn observations_only_for_filled_measure_cells() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        let g = dataset_graph(&table(), &metadata(), &ctx, "TestDataset").expect("graph");
        assert_eq!(g.subjects_of_type(vocab::QB_OBSERVATION).len(), 2);
        assert_eq!(g.subjects_of_type(vocab::QB_SLICE).len(), 3);
        let unit = Term::iri(format!("{}DEG_C", vocab::UNIT));
        assert!(g.iter().any(|t| t.object == unit));
        let material = Term::iri(format!("{}Material", vocab::MDS));
        assert!(g.iter().all(|t| t.subject != material && t.predicate != material));
    }

    #[test]
    fn missing_identifier_falls_back_to_row_number() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        let graphs = row_graphs(&table(), &metadata(), &ctx).expect("graphs");
        let keys: Vec<_> = graphs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["EXP001", "EXP002", "row3"]);
        let (_, g) = &graphs[2];
        let slice = g.subjects_of_type(vocab::QB_SLICE)[0].clone();
        let id_prop = format!("{}ExperimentId", vocab::MDS);
        assert!(g.value(&slice, &id_prop).is_none());
    }

    #[test]
    fn duplicate_identifiers_get_distinct_keys() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        let table = Table::new(
            vec!["ExperimentId".into(), "Temperature".into(), "Material".into()],
            vec![
                vec!["EXP001".into(), "1".into(), "".into()],
                vec!["EXP001".into(), "2".into(), "".into()],
                vec!["EXP 1".into(), "3".into(), "".into()],
                vec!["EXP_1".into(), "4".into(), "".into()],
                vec!["EXP-1".into(), "5".into(), "".into()],
            ],
        );
        let graphs = row_graphs(&table, &metadata(), &ctx).expect("graphs");
        let keys: Vec<_> = graphs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["EXP001", "EXP001-row2", "EXP_1", "EXP_1-row4", "EXP-1-row5"]);
    }

    #[test]
    fn colliding_column_slugs_stay_separate() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        let table = Table::new(
            vec!["ExperimentId".into(), "Temp (C)".into(), "Temp [C]".into()],
            vec![vec!["EXP001".into(), "1".into(), "2".into()]],
        );
        let mut m = VariableMetadataModel::new();
        m.insert(VariableMetadata::new("ExperimentId"));
        m.insert(VariableMetadata::measure("Temp (C)", "unit:DEG_C"));
        m.insert(VariableMetadata::measure("Temp [C]", "unit:DEG_C"));
        let g = dataset_graph(&table, &m, &ctx, "TestDataset").expect("graph");
        assert_eq!(g.subjects_of_type(vocab::QB_OBSERVATION).len(), 2);
        assert_eq!(g.subjects_of_type(vocab::QB_MEASURE_PROPERTY).len(), 2);
        let second = Term::iri(format!("{}Temp_C-2", vocab::MDS));
        assert_eq!(g.value(&second, vocab::RDFS_LABEL), Some(&Term::literal("Temp [C]")));
    }

    #[test]
    fn measure_without_unit_gets_an_empty_unit() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        let mut m = metadata();
        m.insert(VariableMetadata {
            is_measure: true,
            ..VariableMetadata::new("Temperature")
        });
        let g = dataset_graph(&table(), &m, &ctx, "TestDataset").expect("graph");
        let observations = g.subjects_of_type(vocab::QB_OBSERVATION);
        assert_eq!(observations.len(), 2);
        for obs in observations {
            assert_eq!(g.value(obs, vocab::QUDT_HAS_UNIT), Some(&Term::literal("")));
        }
    }

    #[test]
    fn unbound_unit_prefix_is_a_run_error() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        let mut m = metadata();
        m.insert(VariableMetadata::measure("Temperature", "nope:DEG_C"));
        assert!(row_graphs(&table(), &m, &ctx).is_err());
    }
}
