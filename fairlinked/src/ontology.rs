//! Normalized label index over the classes of an ontology.
//!
//! Each `owl:Class` subject contributes one [`OntologyTerm`] per label:
//! `skos:altLabel` values first, then `rdfs:label` values. Classes are
//! visited in declaration order, which is also the tie-break order when two
//! terms share a normalized label.

use std::collections::HashMap;
use std::path::Path;

use fairlinked_graph::{parser, vocab, Graph, Term};

use crate::error::Result;

/// One (class, label) pair with its precomputed normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyTerm {
    /// Class IRI.
    pub iri: String,
    /// Label as written in the ontology, trimmed.
    pub label: String,
    /// Lowercased label with every non-alphanumeric character removed.
    pub normalized: String,
}

/// Lowercases `text` and strips every character outside `[a-z0-9]`.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Ordered term list plus an exact-match lookup on normalized labels.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    terms: Vec<OntologyTerm>,
    exact: HashMap<String, usize>,
}

impl TermIndex {
    /// Builds the index from a parsed ontology graph.
    ///
    /// Classes without any label are absent from the index.
    #[must_use]
    pub fn build(graph: &Graph) -> Self {
        let mut index = Self::default();
        for class in graph.subjects_of_type(vocab::OWL_CLASS) {
            let Term::Iri(iri) = class else { continue };
            let labels = graph
                .objects(class, vocab::SKOS_ALT_LABEL)
                .chain(graph.objects(class, vocab::RDFS_LABEL))
                .filter_map(Term::as_literal);
            for lit in labels {
                index.push(OntologyTerm {
                    iri: iri.clone(),
                    label: lit.value.trim().to_owned(),
                    normalized: normalize(&lit.value),
                });
            }
        }
        tracing::debug!(terms = index.len(), "built ontology term index");
        index
    }

    /// Parses an ontology file and builds its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let graph = parser::parse_file(path)?;
        Ok(Self::build(&graph))
    }

    /// Appends a term; the first term for a normalized label keeps the exact slot.
    pub fn push(&mut self, term: OntologyTerm) {
        if term.normalized.is_empty() {
            return;
        }
        self.exact
            .entry(term.normalized.clone())
            .or_insert(self.terms.len());
        self.terms.push(term);
    }

    /// First term whose normalized label equals `normalized`.
    #[must_use]
    pub fn exact(&self, normalized: &str) -> Option<&OntologyTerm> {
        self.exact.get(normalized).map(|&i| &self.terms[i])
    }

    /// All terms in index order.
    #[must_use]
    pub fn terms(&self) -> &[OntologyTerm] {
        &self.terms
    }

    /// Number of indexed (class, label) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if no term was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
