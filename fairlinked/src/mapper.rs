//! Column name to ontology term resolution.
//!
//! Resolution is exact-first: a column whose normalized name equals some
//! term's normalized label always maps to the first such term. Only when no
//! exact match exists is the closest label above [`DEFAULT_CUTOFF`] taken.
//! Every outcome is recorded in an [`AuditLog`] so mis-mappings can be
//! reviewed after the batch.

use std::fs;
use std::path::Path;

use fairlinked_graph::{vocab, NamespaceRegistry};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::fuzzy::{closest_match, DEFAULT_CUTOFF};
use crate::ontology::{normalize, OntologyTerm, TermIndex};

/// How a column was matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// Normalized names are equal.
    Exact,
    /// Closest label, with its similarity score.
    Fuzzy(f64),
}

/// Outcome of resolving one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// The column maps to a term.
    Matched(&'a OntologyTerm, MatchKind),
    /// No term within the cutoff.
    Unmatched,
}

/// Resolves `column` against `index` without recording anything.
#[must_use]
pub fn resolve<'a>(column: &str, index: &'a TermIndex) -> Resolution<'a> {
    let norm = normalize(column);
    if let Some(term) = index.exact(&norm) {
        return Resolution::Matched(term, MatchKind::Exact);
    }
    let labels = index.terms().iter().map(|t| t.normalized.as_str());
    match closest_match(&norm, labels, DEFAULT_CUTOFF) {
        Some((i, score)) => Resolution::Matched(&index.terms()[i], MatchKind::Fuzzy(score)),
        None => Resolution::Unmatched,
    }
}

/// Segment of an IRI after the last `/` or `#`.
#[must_use]
pub fn iri_fragment(iri: &str) -> &str {
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}

/// A column with the identifier it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Column name as it appears in the table.
    pub column: String,
    /// IRI fragment of the matched term, or the raw column name.
    pub fragment: String,
    /// Full IRI of the matched term.
    pub iri: Option<String>,
    /// Match kind, `None` when unmatched.
    pub kind: Option<MatchKind>,
}

/// Matched and unmatched columns of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    matched: Vec<String>,
    unmatched: Vec<String>,
}

impl AuditLog {
    /// Records one resolution.
    pub fn record(&mut self, column: &str, resolution: &Resolution<'_>) {
        match resolution {
            Resolution::Matched(term, _) => self
                .matched
                .push(format!("{column} => {}", iri_fragment(&term.iri))),
            Resolution::Unmatched => self.unmatched.push(column.to_owned()),
        }
    }

    /// `column => fragment` lines in resolution order.
    #[must_use]
    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    /// Unmatched column names, de-duplicated and sorted.
    #[must_use]
    pub fn unmatched(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.unmatched.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Writes both logs, one entry per line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if either file cannot be written.
    pub fn write(&self, matched_path: &Path, unmatched_path: &Path) -> Result<()> {
        for path in [matched_path, unmatched_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        fs::write(matched_path, self.matched.join("\n")).map_err(|e| Error::io(matched_path, e))?;
        fs::write(unmatched_path, self.unmatched().join("\n"))
            .map_err(|e| Error::io(unmatched_path, e))?;
        tracing::info!(
            matched = self.matched.len(),
            unmatched = self.unmatched().len(),
            "wrote column audit logs"
        );
        Ok(())
    }
}

/// Resolves columns against one index, recording every outcome.
#[derive(Debug)]
pub struct ColumnMapper<'a> {
    index: &'a TermIndex,
    log: AuditLog,
}

impl<'a> ColumnMapper<'a> {
    /// Creates a mapper with an empty log.
    #[must_use]
    pub fn new(index: &'a TermIndex) -> Self {
        Self {
            index,
            log: AuditLog::default(),
        }
    }

    /// Resolves and records one column.
    pub fn resolve(&mut self, column: &str) -> Resolution<'a> {
        let resolution = resolve(column, self.index);
        match &resolution {
            Resolution::Matched(term, kind) => {
                tracing::debug!(column, iri = %term.iri, ?kind, "matched column")
            }
            Resolution::Unmatched => tracing::warn!(column, "no ontology term for column"),
        }
        self.log.record(column, &resolution);
        resolution
    }

    /// Resolves every column in order.
    pub fn annotate<S: AsRef<str>>(&mut self, columns: &[S]) -> Vec<Annotation> {
        columns
            .iter()
            .map(|c| {
                let column = c.as_ref();
                match self.resolve(column) {
                    Resolution::Matched(term, kind) => Annotation {
                        column: column.to_owned(),
                        fragment: iri_fragment(&term.iri).to_owned(),
                        iri: Some(term.iri.clone()),
                        kind: Some(kind),
                    },
                    Resolution::Unmatched => Annotation {
                        column: column.to_owned(),
                        fragment: column.to_owned(),
                        iri: None,
                        kind: None,
                    },
                }
            })
            .collect()
    }

    /// Log collected so far.
    #[must_use]
    pub fn log(&self) -> &AuditLog {
        &self.log
    }

    /// Consumes the mapper, returning its log.
    #[must_use]
    pub fn into_log(self) -> AuditLog {
        self.log
    }
}

/// JSON-LD metadata template with one placeholder node per column.
///
/// `created` is written as the template's `dcterms:created` date.
#[must_use]
pub fn metadata_template(
    annotations: &[Annotation],
    registry: &NamespaceRegistry,
    prefix: &str,
    created: &str,
) -> Value {
    let context: Map<String, Value> = registry
        .iter()
        .map(|(p, base)| (p.to_owned(), json!(base)))
        .collect();
    let graph: Vec<Value> = annotations
        .iter()
        .map(|a| {
            let id = format!("{prefix}:{}", a.fragment);
            json!({
                "@id": id,
                "@type": id,
                "skos:altLabel": a.column,
                "skos:definition": "",
                "qudt:value": [{ "@value": "" }],
                "qudt:hasUnit": { "@id": "" },
                "qudt:hasQuantityKind": { "@id": "" },
                "prov:generatedAtTime": { "@value": "", "@type": "xsd:dateTime" },
                "skos:note": { "@value": "placeholder note for user to fill", "@language": "en" }
            })
        })
        .collect();
    json!({
        "@context": Value::Object(context),
        "@id": format!("{prefix}:dataset"),
        "dcterms:created": { "@value": created, "@type": registry.shorten(vocab::XSD_DATETIME) },
        "@graph": graph
    })
}
