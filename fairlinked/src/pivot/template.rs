//! Filled metadata templates back to a table.
//!
//! A template written by [`crate::mapper::metadata_template`] holds one node
//! per column, labelled with `skos:altLabel`, whose `qudt:value` is filled in
//! by hand. A directory of filled templates reads as one row per file, with
//! columns sorted by label and a trailing [`SOURCE_FILE_COLUMN`]. Each
//! column also gets a type, unit and study stage, taken from the first file
//! that supplies them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fairlinked_graph::{parser, vocab, Graph, NamespaceRegistry, RdfFormat, Term};
use walkdir::WalkDir;

use super::{write_table, PivotTable, CELL_SEPARATOR};
use crate::error::{Error, Result};

/// Column naming the file a row was read from.
pub const SOURCE_FILE_COLUMN: &str = "__source_file__";
/// Leading column of the headered CSV.
pub const LABEL_COLUMN: &str = "__Label__";
/// Trailing column of the headered CSV holding each file's `mds:row`.
pub const ROW_KEY_COLUMN: &str = "__rowkey__";

/// One filled template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Values by column label; empty values are dropped.
    pub values: BTreeMap<String, Vec<String>>,
    /// Compacted `@type` by column label.
    pub types: BTreeMap<String, String>,
    /// Compacted unit by column label.
    pub units: BTreeMap<String, String>,
    /// Study stage by column label.
    pub study_stages: BTreeMap<String, String>,
    /// The file's `mds:row` value, if any.
    pub row_key: Option<String>,
}

impl TemplateRecord {
    /// Reads the column nodes of one parsed template.
    #[must_use]
    pub fn from_graph(graph: &Graph, registry: &NamespaceRegistry) -> Self {
        let mut record = Self::default();
        for subject in graph.subjects() {
            let Some(label) = graph
                .value(subject, vocab::SKOS_ALT_LABEL)
                .map(|l| l.lexical().trim().to_owned())
                .filter(|l| !l.is_empty())
            else {
                continue;
            };
            let shortened = |predicate: &str| {
                let values: Vec<String> = graph
                    .objects(subject, predicate)
                    .map(|o| compact(o, registry))
                    .filter(|v| !v.is_empty())
                    .collect();
                values.join(CELL_SEPARATOR)
            };
            fill(&mut record.types, &label, shortened(vocab::RDF_TYPE));
            fill(&mut record.units, &label, shortened(vocab::QUDT_HAS_UNIT));
            fill(&mut record.study_stages, &label, shortened(vocab::MDS_HAS_STUDY_STAGE));

            let values = record.values.entry(label).or_default();
            values.extend(
                graph
                    .objects(subject, vocab::QUDT_VALUE)
                    .map(|v| v.lexical().trim().to_owned())
                    .filter(|v| !v.is_empty()),
            );
        }
        record.row_key = graph
            .iter()
            .find(|t| t.predicate.as_iri() == Some(vocab::MDS_ROW))
            .map(|t| t.object.lexical().to_owned());
        record
    }
}

fn compact(term: &Term, registry: &NamespaceRegistry) -> String {
    match term {
        Term::Iri(iri) => registry.shorten(iri),
        other => other.lexical().trim().to_owned(),
    }
}

fn fill(map: &mut BTreeMap<String, String>, label: &str, value: String) {
    let slot = map.entry(label.to_owned()).or_default();
    if slot.is_empty() {
        *slot = value;
    }
}

/// Header rows of a template table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateHeaders {
    /// Type per column.
    pub types: BTreeMap<String, String>,
    /// Unit per column.
    pub units: BTreeMap<String, String>,
    /// Study stage per column.
    pub study_stages: BTreeMap<String, String>,
}

/// Templates read from a directory.
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    /// One row per file; the last column is [`SOURCE_FILE_COLUMN`].
    pub table: PivotTable,
    /// Type, unit and study stage per column.
    pub headers: TemplateHeaders,
    /// `mds:row` of each file, in row order; empty when absent.
    pub row_keys: Vec<String>,
}

/// Reads every `.jsonld` template under `dir`.
///
/// Files are read in path order. A file that fails to parse is logged and
/// skipped.
///
/// # Errors
///
/// Returns [`Error::NoValidFiles`] when no template could be read and
/// [`Error::Io`] if `dir` does not exist.
pub fn parse_templates(dir: &Path, registry: &NamespaceRegistry) -> Result<TemplateTable> {
    if !dir.exists() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        ));
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && matches!(RdfFormat::from_path(e.path()), Ok(RdfFormat::JsonLd))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let mut records = Vec::new();
    for file in &files {
        match parser::parse_file(file) {
            Ok(graph) => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                records.push((name, TemplateRecord::from_graph(&graph, registry)));
            }
            Err(e) => tracing::warn!(file = %file.display(), error = %e, "skipping unparseable template"),
        }
    }
    if records.is_empty() {
        return Err(Error::NoValidFiles {
            path: dir.to_path_buf(),
        });
    }
    let table = tabulate(records);
    tracing::info!(
        files = files.len(),
        rows = table.table.len(),
        columns = table.table.columns.len(),
        "templates read"
    );
    Ok(table)
}

/// Builds the table from `(file name, record)` pairs in row order.
#[must_use]
pub fn tabulate(records: Vec<(String, TemplateRecord)>) -> TemplateTable {
    let mut headers = TemplateHeaders::default();
    for (_, record) in &records {
        for (label, value) in &record.types {
            fill(&mut headers.types, label, value.clone());
        }
        for (label, value) in &record.units {
            fill(&mut headers.units, label, value.clone());
        }
        for (label, value) in &record.study_stages {
            fill(&mut headers.study_stages, label, value.clone());
        }
    }
    let mut columns: Vec<String> = records
        .iter()
        .flat_map(|(_, r)| r.values.keys().cloned())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .filter(|c| c != SOURCE_FILE_COLUMN)
        .collect();
    columns.push(SOURCE_FILE_COLUMN.to_owned());

    let mut row_keys = Vec::with_capacity(records.len());
    let rows = records
        .into_iter()
        .map(|(file, mut record)| {
            row_keys.push(record.row_key.take().unwrap_or_default());
            columns
                .iter()
                .map(|c| {
                    if c == SOURCE_FILE_COLUMN {
                        vec![file.clone()]
                    } else {
                        record.values.remove(c).unwrap_or_default()
                    }
                })
                .collect()
        })
        .collect();
    TemplateTable {
        table: PivotTable {
            columns,
            rows,
            identifier: None,
        },
        headers,
        row_keys,
    }
}

/// Files written by [`export_templates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    /// CSV with type, unit and study stage header rows.
    pub csv: PathBuf,
    /// Parquet of the data rows.
    pub parquet: PathBuf,
    /// JSON records of the data rows.
    pub json: PathBuf,
}

/// Writes `{basename}.csv`, `.parquet` and `.json` under `output_dir`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or a file cannot be created and
/// [`Error::Export`] on a writer failure.
pub fn export_templates(
    templates: &TemplateTable,
    output_dir: &Path,
    basename: &str,
) -> Result<TemplatePaths> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
    let paths = TemplatePaths {
        csv: output_dir.join(format!("{basename}.csv")),
        parquet: output_dir.join(format!("{basename}.parquet")),
        json: output_dir.join(format!("{basename}.json")),
    };
    write_headered_csv(templates, &paths.csv)?;
    write_table(&templates.table, &paths.parquet)?;
    write_table(&templates.table, &paths.json)?;
    Ok(paths)
}

/// CSV whose first three rows carry type, units and study stage.
///
/// A leading [`LABEL_COLUMN`] names each row (`Type`, `Units`,
/// `Study Stage`, then `1..`) and a trailing [`ROW_KEY_COLUMN`] holds the
/// files' row keys.
///
/// # Errors
///
/// Returns [`Error::Table`] on a CSV writer failure.
pub fn write_headered_csv(templates: &TemplateTable, path: &Path) -> Result<()> {
    let table_err = |source| Error::Table {
        path: path.to_path_buf(),
        source,
    };
    let columns = &templates.table.columns;
    let mut writer = csv::Writer::from_path(path).map_err(table_err)?;
    writer
        .write_record(
            std::iter::once(LABEL_COLUMN)
                .chain(columns.iter().map(String::as_str))
                .chain(std::iter::once(ROW_KEY_COLUMN)),
        )
        .map_err(table_err)?;
    let headers = &templates.headers;
    for (name, map) in [
        ("Type", &headers.types),
        ("Units", &headers.units),
        ("Study Stage", &headers.study_stages),
    ] {
        writer
            .write_record(
                std::iter::once(name)
                    .chain(columns.iter().map(|c| map.get(c).map_or("", String::as_str)))
                    .chain(std::iter::once("")),
            )
            .map_err(table_err)?;
    }
    for (i, row) in templates.table.rows.iter().enumerate() {
        let key = templates.row_keys.get(i).map_or("", String::as_str);
        writer
            .write_record(
                std::iter::once((i + 1).to_string())
                    .chain(row.iter().map(|cell| cell.join(CELL_SEPARATOR)))
                    .chain(std::iter::once(key.to_owned())),
            )
            .map_err(table_err)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(value: &str, row: Option<&str>) -> String {
        let row = row.map_or(String::new(), |r| format!(r#", {{"@id": "mds:meta", "mds:row": "{r}"}}"#));
        format!(
            r#"{{
            "@context": {{
                "mds": "https://cwrusdle.bitbucket.io/mds/",
                "skos": "http://www.w3.org/2004/02/skos/core#",
                "qudt": "http://qudt.org/schema/qudt/",
                "unit": "http://qudt.org/vocab/unit/"
            }},
            "@id": "mds:dataset",
            "@graph": [
                {{"@id": "mds:Temperature", "@type": "mds:Temperature",
                  "skos:altLabel": "Temperature",
                  "qudt:value": [{{"@value": "{value}"}}],
                  "qudt:hasUnit": {{"@id": "unit:DEG_C"}},
                  "mds:hasStudyStage": "Result"}},
                {{"@id": "mds:Operator", "@type": "mds:Operator",
                  "skos:altLabel": "Operator",
                  "qudt:value": [{{"@value": ""}}]}}{row}
            ]
        }}"#
        )
    }

    #[test]
    fn record_reads_labels_values_and_headers() {
        let graph = fairlinked_graph::parser::jsonld::parse_jsonld(&filled("25.0", Some("r1")))
            .expect("valid json-ld");
        let record = TemplateRecord::from_graph(&graph, &NamespaceRegistry::standard());
        assert_eq!(record.values["Temperature"], vec!["25.0"]);
        assert!(record.values["Operator"].is_empty());
        assert_eq!(record.types["Temperature"], "mds:Temperature");
        assert_eq!(record.units["Temperature"], "unit:DEG_C");
        assert_eq!(record.study_stages["Temperature"], "Result");
        assert_eq!(record.row_key.as_deref(), Some("r1"));
    }

    #[test]
    fn directory_reads_one_row_per_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.jsonld"), filled("25.0", Some("r1"))).expect("write");
        std::fs::write(dir.path().join("b.jsonld"), filled("30.0", None)).expect("write");
        std::fs::write(dir.path().join("broken.jsonld"), "{").expect("write");
        std::fs::write(dir.path().join("notes.ttl"), "ignored").expect("write");

        let templates = parse_templates(dir.path(), &NamespaceRegistry::standard()).expect("templates");
        let table = &templates.table;
        assert_eq!(table.columns, vec!["Operator", "Temperature", SOURCE_FILE_COLUMN]);
        assert_eq!(table.len(), 2);
        let temps: Vec<_> = table.column("Temperature").collect();
        assert_eq!(temps, vec![&["25.0".to_owned()][..], &["30.0".to_owned()][..]]);
        assert_eq!(table.rows[1][2], vec!["b.jsonld"]);
        assert_eq!(templates.row_keys, vec!["r1", ""]);
        assert_eq!(templates.headers.units["Temperature"], "unit:DEG_C");

        let out = dir.path().join("out");
        let paths = export_templates(&templates, &out, "merged_output").expect("export");
        let csv = std::fs::read_to_string(&paths.csv).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "__Label__,Operator,Temperature,__source_file__,__rowkey__");
        assert_eq!(lines[1], "Type,mds:Operator,mds:Temperature,,");
        assert_eq!(lines[2], "Units,,unit:DEG_C,,");
        assert_eq!(lines[3], "Study Stage,,Result,,");
        assert_eq!(lines[4], "1,,25.0,a.jsonld,r1");
        assert!(paths.parquet.exists());
        assert!(paths.json.exists());
    }

    #[test]
    fn empty_directory_is_no_valid_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = parse_templates(dir.path(), &NamespaceRegistry::standard()).expect_err("must fail");
        assert!(matches!(err, Error::NoValidFiles { .. }));
    }
}
