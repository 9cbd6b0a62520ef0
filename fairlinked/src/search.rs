//! Keyword search over the subjects of an ontology graph.

use std::collections::HashSet;
use std::path::Path;

use fairlinked_graph::serializer::turtle::term_to_turtle;
use fairlinked_graph::{vocab, Graph, NamespaceRegistry};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::fuzzy;

/// Label predicates, highest priority first.
const LABEL_PREDICATES: [&str; 7] = [
    vocab::SKOS_PREF_LABEL,
    vocab::SKOS_ALT_LABEL,
    vocab::SKOS_HIDDEN_LABEL,
    vocab::RDFS_LABEL,
    vocab::RDFS_COMMENT,
    vocab::DCTERMS_SUBJECT,
    vocab::DC_SUBJECT,
];

/// Display summary of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectDetails {
    /// Subject IRI or blank node label.
    pub subject_id: String,
    /// Best available label, empty when the subject has none.
    pub label: String,
    /// `predicate → object` pairs joined by ` | `.
    pub info: String,
}

/// A subject found by [`search_subjects`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Keyword that first matched this subject.
    pub searched_keyword: String,
    /// Subject IRI or blank node label.
    pub subject_id: String,
    /// Subject label.
    pub label: String,
    /// Subject predicate/object summary.
    pub info: String,
}

/// Summarizes every subject of `graph` in order of first appearance.
#[must_use]
pub fn extract_subject_details(graph: &Graph, registry: &NamespaceRegistry) -> Vec<SubjectDetails> {
    graph
        .subjects()
        .into_iter()
        .map(|subject| {
            let label = LABEL_PREDICATES
                .iter()
                .find_map(|p| {
                    graph
                        .value(subject, p)
                        .map(|o| o.lexical().to_owned())
                        .filter(|l| !l.is_empty())
                })
                .unwrap_or_default();
            let info = graph
                .predicate_objects(subject)
                .map(|(p, o)| {
                    format!("{} → {}", term_to_turtle(p, registry), term_to_turtle(o, registry))
                })
                .collect::<Vec<_>>()
                .join(" | ");
            SubjectDetails {
                subject_id: subject.lexical().to_owned(),
                label,
                info,
            }
        })
        .collect()
}

/// Finds subjects whose label has a token close to one of `keywords`.
///
/// Each keyword uses [`fuzzy::adaptive_distance`]. Keywords are tried in
/// order and a subject is reported once, tagged with the first keyword that
/// found it.
#[must_use]
pub fn search_subjects(details: &[SubjectDetails], keywords: &[&str]) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    for keyword in keywords.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        let distance = fuzzy::adaptive_distance(keyword);
        for d in details {
            if !fuzzy::strict_token_match(keyword, &d.label, distance) {
                continue;
            }
            if seen.insert(d.subject_id.as_str()) {
                hits.push(SearchHit {
                    searched_keyword: keyword.to_owned(),
                    subject_id: d.subject_id.clone(),
                    label: d.label.clone(),
                    info: d.info.clone(),
                });
            }
        }
        tracing::debug!(keyword, distance, hits = hits.len(), "searched subjects");
    }
    hits
}

/// Writes serializable rows to a CSV file with a header.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let table_err = |source| Error::Table {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(table_err)?;
    for row in rows {
        writer.serialize(row).map_err(table_err)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}
