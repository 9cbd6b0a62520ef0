//! RDF to wide-table pivot.
//!
//! Input is a single RDF file or a directory searched recursively for
//! `.ttl`, `.jsonld`, `.json-ld` and `.nt` files. Each parsed graph becomes
//! rows of a [`PivotTable`]:
//!
//! - graphs with `qb:Slice` nodes give one row per slice, one column per
//!   component property (named by its `rdfs:label`), with the slice key's
//!   dimension as identifier column
//! - any other graph gives one row per subject, one column per compacted
//!   predicate, with a `subject` identifier column
//!
//! Repeated values for the same cell are kept in order as a list. Files
//! that fail to parse are logged and skipped; only an input with no
//! parseable file is an error.

mod export;
pub mod template;

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use fairlinked_graph::{parser, vocab, Graph, NamespaceRegistry, RdfFormat, Term};
use serde::{Deserialize, Serialize, Serializer};
use walkdir::WalkDir;

pub use export::{export, write_table, ExportPaths, CELL_SEPARATOR};
pub use template::{export_templates, parse_templates, TemplateTable};

use crate::error::{Error, Result};
use crate::mapper::iri_fragment;

/// Identifier column of a generic (non Data Cube) pivot.
pub const SUBJECT_COLUMN: &str = "subject";

/// Wide table whose cells are ordered value lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotTable {
    /// Column names, identifier first.
    pub columns: Vec<String>,
    /// Rows, one cell per column; an empty cell is an empty list.
    pub rows: Vec<Vec<Vec<String>>>,
    /// Identifier column, if the input had one.
    pub identifier: Option<String>,
}

impl PivotTable {
    /// Position of a column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, row by row.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [String]> + 'a {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .map(move |row| idx.map_or(&[][..], |i| row[i].as_slice()))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn yes_no<S: Serializer>(value: &bool, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(if *value { "Yes" } else { "No" })
}

fn from_yes_no<'de, D: serde::Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let text = String::deserialize(d)?;
    Ok(text.eq_ignore_ascii_case("yes"))
}

/// Variable metadata recovered from the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Human-readable label.
    #[serde(rename = "AltLabel")]
    pub alt_label: Option<String>,
    /// Category or study stage.
    #[serde(rename = "Category")]
    pub category: Option<String>,
    /// Units seen for the variable, sorted.
    #[serde(rename = "Unit")]
    pub units: BTreeSet<String>,
    /// Whether any input declared it a measure.
    #[serde(rename = "IsMeasure", serialize_with = "yes_no", deserialize_with = "from_yes_no")]
    pub is_measure: bool,
}

impl ColumnMetadata {
    /// Folds `other` in: units are unioned, empty text fields are filled,
    /// and a measure flag may only go from "No" to "Yes".
    pub fn merge(&mut self, other: ColumnMetadata) {
        self.units.extend(other.units);
        if self.alt_label.is_none() {
            self.alt_label = other.alt_label;
        }
        if self.category.is_none() {
            self.category = other.category;
        }
        self.is_measure |= other.is_measure;
    }
}

/// Metadata of every column, by name.
pub type PivotMetadata = BTreeMap<String, ColumnMetadata>;

/// Summary of a pivot run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotStats {
    /// Files collected.
    pub files: usize,
    /// Files parsed successfully.
    pub parsed: usize,
    /// Table rows.
    pub rows: usize,
    /// Table columns.
    pub columns: usize,
    /// Distinct non-empty categories among the columns.
    pub categories: BTreeSet<String>,
}

impl fmt::Display for PivotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files parsed: {}/{}", self.parsed, self.files)?;
        writeln!(f, "Total rows: {}", self.rows)?;
        writeln!(f, "Total columns: {}", self.columns)?;
        let cats: Vec<&str> = self.categories.iter().map(String::as_str).collect();
        if cats.is_empty() {
            write!(f, "Distinct categories: 0")
        } else {
            write!(f, "Distinct categories: {} ({})", cats.len(), cats.join(", "))
        }
    }
}

/// Result of [`parse`].
#[derive(Debug, Clone, Default)]
pub struct Pivot {
    /// The merged table.
    pub table: PivotTable,
    /// Merged variable metadata.
    pub metadata: PivotMetadata,
    /// Run statistics.
    pub stats: PivotStats,
}

/// RDF files under `path`, sorted.
///
/// A directory may hold the same graph in several serializations, as a
/// conversion's `ttl/` and `jsonld/` folders do. Files sharing a stem are
/// collected once, preferring Turtle, then N-Triples, then JSON-LD.
///
/// # Errors
///
/// Returns [`fairlinked_graph::GraphError::UnknownFormat`] for a single file
/// with an unrecognized extension and [`Error::Io`] if `path` does not exist.
pub fn collect_rdf_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        RdfFormat::from_path(path)?;
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(Error::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        ));
    }
    let found: Vec<(PathBuf, RdfFormat)> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let format = RdfFormat::from_path(e.path()).ok()?;
            Some((e.into_path(), format))
        })
        .collect();

    let mut best: BTreeMap<OsString, u8> = BTreeMap::new();
    for (file, format) in &found {
        let rank = family_rank(*format);
        best.entry(stem_of(file))
            .and_modify(|r| *r = (*r).min(rank))
            .or_insert(rank);
    }
    let mut files: Vec<PathBuf> = found
        .into_iter()
        .filter(|(file, format)| {
            let keep = best.get(&stem_of(file)) == Some(&family_rank(*format));
            if !keep {
                tracing::debug!(file = %file.display(), "same graph already collected in another format");
            }
            keep
        })
        .map(|(file, _)| file)
        .collect();
    files.sort();
    Ok(files)
}

/// Preference among serializations of the same graph, lowest first.
fn family_rank(format: RdfFormat) -> u8 {
    match format {
        RdfFormat::Turtle => 0,
        RdfFormat::NTriples => 1,
        RdfFormat::JsonLd => 2,
    }
}

fn stem_of(path: &Path) -> OsString {
    path.file_stem().map(OsStr::to_os_string).unwrap_or_default()
}

/// Lazily parses collected files in order.
#[derive(Debug)]
pub struct RdfFiles {
    paths: std::vec::IntoIter<PathBuf>,
}

impl RdfFiles {
    /// Iterator over the RDF files under `path`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`collect_rdf_files`].
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            paths: collect_rdf_files(path)?.into_iter(),
        })
    }
}

impl Iterator for RdfFiles {
    type Item = (PathBuf, fairlinked_graph::Result<Graph>);

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let graph = parser::parse_file(&path);
        Some((path, graph))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

/// Rows and metadata of one graph, before merging.
#[derive(Debug, Default)]
struct FilePivot {
    identifier: Option<String>,
    rows: Vec<BTreeMap<String, Vec<String>>>,
    metadata: PivotMetadata,
}

/// Pivots one file or every RDF file under a directory.
///
/// # Errors
///
/// Returns the errors of [`collect_rdf_files`], and [`Error::NoValidFiles`]
/// when nothing could be parsed.
pub fn parse(path: &Path, registry: &NamespaceRegistry) -> Result<Pivot> {
    let files = RdfFiles::open(path)?;
    let mut stats = PivotStats {
        files: files.size_hint().0,
        ..PivotStats::default()
    };
    let mut pivots = Vec::new();
    for (file, graph) in files {
        match graph {
            Ok(graph) => {
                tracing::info!(file = %file.display(), triples = graph.len(), "parsed RDF file");
                pivots.push(pivot_graph(&graph, registry));
            }
            Err(e) => tracing::warn!(file = %file.display(), error = %e, "skipping unparseable file"),
        }
    }
    if pivots.is_empty() {
        return Err(Error::NoValidFiles {
            path: path.to_path_buf(),
        });
    }
    stats.parsed = pivots.len();

    let (table, metadata) = merge(pivots);
    stats.rows = table.len();
    stats.columns = table.columns.len();
    stats.categories = table
        .columns
        .iter()
        .filter_map(|c| metadata.get(c).and_then(|m| m.category.clone()))
        .filter(|c| !c.is_empty())
        .collect();
    tracing::info!(
        files = stats.files,
        parsed = stats.parsed,
        rows = stats.rows,
        columns = stats.columns,
        categories = stats.categories.len(),
        "pivot finished"
    );
    if let Some(first) = table.rows.first() {
        tracing::debug!(row = ?table.columns.iter().zip(first).collect::<Vec<_>>(), "first row");
    }
    Ok(Pivot {
        table,
        metadata,
        stats,
    })
}

/// Pivots one in-memory graph.
#[must_use]
pub fn pivot(graph: &Graph, registry: &NamespaceRegistry) -> (PivotTable, PivotMetadata) {
    merge(vec![pivot_graph(graph, registry)])
}

fn pivot_graph(graph: &Graph, registry: &NamespaceRegistry) -> FilePivot {
    if graph.subjects_of_type(vocab::QB_SLICE).is_empty() {
        pivot_generic(graph, registry)
    } else {
        pivot_cube(graph, registry)
    }
}

fn property_label(graph: &Graph, property: &Term) -> String {
    graph
        .value(property, vocab::RDFS_LABEL)
        .map(|l| l.lexical().to_owned())
        .unwrap_or_else(|| iri_fragment(property.lexical()).to_owned())
}

fn pivot_cube(graph: &Graph, registry: &NamespaceRegistry) -> FilePivot {
    let mut out = FilePivot::default();
    let dimensions = graph.subjects_of_type(vocab::QB_DIMENSION_PROPERTY);
    let measures = graph.subjects_of_type(vocab::QB_MEASURE_PROPERTY);

    for (props, is_measure) in [(&dimensions, false), (&measures, true)] {
        for p in props {
            let label = property_label(graph, p);
            let meta = ColumnMetadata {
                alt_label: Some(label.clone()),
                category: graph
                    .value(p, vocab::MDS_HAS_STUDY_STAGE)
                    .map(|c| c.lexical().to_owned()),
                units: graph
                    .objects(p, vocab::QUDT_HAS_UNIT)
                    .map(|u| registry.shorten(u.lexical()))
                    .collect(),
                is_measure,
            };
            out.metadata.entry(label).or_default().merge(meta);
        }
    }

    out.identifier = graph
        .subjects_of_type(vocab::QB_SLICE_KEY)
        .first()
        .and_then(|sk| graph.value(sk, vocab::QB_COMPONENT_PROPERTY))
        .map(|p| property_label(graph, p));

    for slice in graph.subjects_of_type(vocab::QB_SLICE) {
        let mut row: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for d in &dimensions {
            let values: Vec<String> = graph.objects(slice, d.lexical()).map(|v| v.lexical().to_owned()).collect();
            if !values.is_empty() {
                row.entry(property_label(graph, d)).or_default().extend(values);
            }
        }
        for obs in graph.objects(slice, vocab::QB_OBSERVATION_PROP) {
            for m in &measures {
                for v in graph.objects(obs, m.lexical()) {
                    row.entry(property_label(graph, m))
                        .or_default()
                        .push(v.lexical().to_owned());
                }
            }
        }
        if let Some(id) = &out.identifier {
            if !row.contains_key(id) {
                tracing::warn!(slice = %slice.lexical(), identifier = %id, "slice has no identifier value");
            }
        }
        out.rows.push(row);
    }
    out
}

fn pivot_generic(graph: &Graph, registry: &NamespaceRegistry) -> FilePivot {
    let mut out = FilePivot {
        identifier: Some(SUBJECT_COLUMN.to_owned()),
        ..FilePivot::default()
    };
    for subject in graph.subjects() {
        let mut row: BTreeMap<String, Vec<String>> = BTreeMap::new();
        row.insert(SUBJECT_COLUMN.to_owned(), vec![subject.lexical().to_owned()]);
        for (p, o) in graph.predicate_objects(subject) {
            let column = registry.shorten(p.lexical());
            out.metadata.entry(column.clone()).or_default();
            row.entry(column).or_default().push(o.lexical().to_owned());
        }
        out.rows.push(row);
    }
    out
}

fn merge(pivots: Vec<FilePivot>) -> (PivotTable, PivotMetadata) {
    let mut metadata = PivotMetadata::new();
    let mut identifier: Option<String> = None;
    let mut names: BTreeSet<String> = BTreeSet::new();
    let mut rows: Vec<BTreeMap<String, Vec<String>>> = Vec::new();

    for p in pivots {
        if identifier.is_none() {
            identifier = p.identifier;
        }
        for (name, meta) in p.metadata {
            match metadata.get_mut(&name) {
                Some(existing) => existing.merge(meta),
                None => {
                    metadata.insert(name, meta);
                }
            }
        }
        for row in &p.rows {
            names.extend(row.keys().cloned());
        }
        rows.extend(p.rows);
    }

    let category = |name: &str| {
        metadata
            .get(name)
            .and_then(|m| m.category.clone())
            .unwrap_or_default()
    };
    let mut columns: Vec<String> = names
        .into_iter()
        .filter(|c| Some(c) != identifier.as_ref())
        .collect();
    columns.sort_by_cached_key(|c| (category(c), c.clone()));
    let has_identifier = identifier.is_some()
        && rows
            .iter()
            .any(|r| identifier.as_ref().is_some_and(|id| r.contains_key(id)));
    if let Some(id) = identifier.as_ref().filter(|_| has_identifier) {
        columns.insert(0, id.clone());
        rows.sort_by(|a, b| a.get(id).cmp(&b.get(id)));
    }

    let rows = rows
        .into_iter()
        .map(|mut row| {
            columns
                .iter()
                .map(|c| row.remove(c).unwrap_or_default())
                .collect()
        })
        .collect();
    let table = PivotTable {
        columns,
        rows,
        identifier: identifier.filter(|_| has_identifier),
    };
    (table, metadata)
}
