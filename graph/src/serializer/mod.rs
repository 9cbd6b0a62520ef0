//! Serializers for FAIRLinked graphs.
//!
//! Three serialization formats are supported:
//! - **Turtle** ([`turtle`]): one block per subject, prefixes from the registry
//! - **JSON-LD** ([`jsonld`]): compact form with an inline `@context`
//! - **N-Triples** ([`ntriples`]): one absolute triple per line
//!
//! All three walk the graph in insertion order, so identical graphs produce
//! identical bytes and therefore identical digests.

pub mod jsonld;
pub mod ntriples;
pub mod turtle;

use std::collections::{BTreeMap, HashMap};

use crate::model::{Graph, Term};
use crate::namespace::NamespaceRegistry;
use crate::parser::RdfFormat;

/// Serializes `graph` once per requested format.
///
/// # Errors
///
/// This function is infallible; every format always produces bytes.
#[must_use]
pub fn serialize(
    graph: &Graph,
    registry: &NamespaceRegistry,
    formats: &[RdfFormat],
) -> BTreeMap<RdfFormat, Vec<u8>> {
    formats
        .iter()
        .map(|format| {
            let text = match format {
                RdfFormat::Turtle => turtle::to_turtle(graph, registry),
                RdfFormat::JsonLd => format!("{:#}", jsonld::to_json_ld(graph, registry)),
                RdfFormat::NTriples => ntriples::to_ntriples(graph),
            };
            (*format, text.into_bytes())
        })
        .collect()
}

/// All statements about one subject, predicates in first-seen order.
pub(crate) struct SubjectBlock<'a> {
    pub(crate) subject: &'a Term,
    pub(crate) properties: Vec<(&'a Term, Vec<&'a Term>)>,
}

pub(crate) fn group_by_subject(graph: &Graph) -> Vec<SubjectBlock<'_>> {
    let mut blocks: Vec<SubjectBlock<'_>> = Vec::new();
    let mut subject_index: HashMap<&Term, usize> = HashMap::new();
    for t in graph {
        let idx = *subject_index.entry(&t.subject).or_insert_with(|| {
            blocks.push(SubjectBlock {
                subject: &t.subject,
                properties: Vec::new(),
            });
            blocks.len() - 1
        });
        let block = &mut blocks[idx];
        match block.properties.iter_mut().find(|(p, _)| *p == &t.predicate) {
            Some((_, objects)) => objects.push(&t.object),
            None => block.properties.push((&t.predicate, vec![&t.object])),
        }
    }
    blocks
}
