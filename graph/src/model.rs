//! Core RDF model types.
//!
//! A [`Graph`] is an append-only, duplicate-free list of [`Triple`]s that keeps
//! insertion order, so serializing the same graph twice yields the same bytes.

use std::collections::HashSet;
use std::fmt;

use crate::vocab;

/// An RDF literal: lexical value plus optional datatype or language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    /// Lexical form of the literal.
    pub value: String,
    /// Full datatype IRI, or `None` for a plain string.
    pub datatype: Option<String>,
    /// Language tag, or `None`.
    pub language: Option<String>,
}

/// An RDF term in subject, predicate or object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, identified by its label (without the `_:` prefix).
    BlankNode(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Creates an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Creates a blank node term.
    pub fn blank(id: impl Into<String>) -> Self {
        Term::BlankNode(id.into())
    }

    /// Creates a plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: None,
        })
    }

    /// Creates a literal with an explicit datatype IRI.
    ///
    /// `xsd:string` is folded into the plain form so both spellings compare equal.
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Term::Literal(Literal {
            value: value.into(),
            datatype: (datatype != vocab::XSD_STRING).then_some(datatype),
            language: None,
        })
    }

    /// Creates a language-tagged literal.
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        })
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns the IRI, blank node label or literal value as plain text.
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(s) | Term::BlankNode(s) => s,
            Term::Literal(lit) => &lit.value,
        }
    }

    /// Returns true for literals.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::Literal(lit) => match (&lit.datatype, &lit.language) {
                (_, Some(lang)) => write!(f, "\"{}\"@{lang}", lit.value),
                (Some(dt), None) => write!(f, "\"{}\"^^<{dt}>", lit.value),
                (None, None) => write!(f, "\"{}\"", lit.value),
            },
        }
    }
}

/// A single RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject (IRI or blank node).
    pub subject: Term,
    /// Predicate (IRI).
    pub predicate: Term,
    /// Object (any term).
    pub object: Term,
}

impl Triple {
    /// Creates a triple.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// An insertion-ordered set of triples.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple; returns false if it was already present.
    pub fn insert(&mut self, subject: Term, predicate: Term, object: Term) -> bool {
        self.push(Triple::new(subject, predicate, object))
    }

    /// Adds a prepared triple; returns false if it was already present.
    pub fn push(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Appends every triple of `other` that is not yet present.
    pub fn extend(&mut self, other: Graph) {
        for triple in other.triples {
            self.push(triple);
        }
    }

    /// Number of distinct triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Returns true if the exact triple is present.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    /// Distinct subjects in order of first appearance.
    #[must_use]
    pub fn subjects(&self) -> Vec<&Term> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .map(|t| &t.subject)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Distinct subjects typed `rdf:type <type_iri>`, in order of the type statement.
    #[must_use]
    pub fn subjects_of_type(&self, type_iri: &str) -> Vec<&Term> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .filter(|t| {
                t.predicate.as_iri() == Some(vocab::RDF_TYPE)
                    && t.object.as_iri() == Some(type_iri)
            })
            .map(|t| &t.subject)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Returns true if `subject` is typed `type_iri`.
    #[must_use]
    pub fn has_type(&self, subject: &Term, type_iri: &str) -> bool {
        self.objects(subject, vocab::RDF_TYPE)
            .any(|o| o.as_iri() == Some(type_iri))
    }

    /// Objects of `(subject, predicate, ?)` in insertion order.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate.as_iri() == Some(predicate))
            .map(|t| &t.object)
    }

    /// First object of `(subject, predicate, ?)`, if any.
    #[must_use]
    pub fn value<'a>(&'a self, subject: &'a Term, predicate: &'a str) -> Option<&'a Term> {
        self.objects(subject, predicate).next()
    }

    /// All `(predicate, object)` pairs of a subject in insertion order.
    pub fn predicate_objects<'a>(
        &'a self,
        subject: &'a Term,
    ) -> impl Iterator<Item = (&'a Term, &'a Term)> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject)
            .map(|t| (&t.predicate, &t.object))
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
