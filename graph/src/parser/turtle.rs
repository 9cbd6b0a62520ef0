//! Turtle and N-Triples input through `sophia_turtle`.

use sophia_api::source::TripleSource;
use sophia_api::term::{Term as SophiaTerm, TermKind};
use sophia_api::triple::Triple as _;
use sophia_turtle::parser::{nt, turtle};

use crate::error::{GraphError, Result};
use crate::model::{Graph, Term};
use crate::vocab;

/// Parses a Turtle document.
///
/// # Errors
///
/// Returns [`GraphError::Parse`] for syntax errors or RDF-star terms.
pub fn parse_turtle(input: &str) -> Result<Graph> {
    collect("turtle", turtle::parse_str(input))
}

/// Parses an N-Triples document.
///
/// # Errors
///
/// Returns [`GraphError::Parse`] for syntax errors.
pub fn parse_ntriples(input: &str) -> Result<Graph> {
    collect("n-triples", nt::parse_str(input))
}

fn collect<S: TripleSource>(format: &'static str, mut source: S) -> Result<Graph> {
    let mut graph = Graph::new();
    let mut unsupported = 0usize;
    source
        .for_each_triple(|t| match (convert(t.s()), convert(t.p()), convert(t.o())) {
            (Some(s), Some(p), Some(o)) => {
                graph.insert(s, p, o);
            }
            _ => unsupported += 1,
        })
        .map_err(|e| GraphError::parse(format, e.to_string()))?;
    if unsupported > 0 {
        return Err(GraphError::parse(
            format,
            format!("{unsupported} triple(s) use quoted triples or variables"),
        ));
    }
    Ok(graph)
}

/// Converts a parsed term; `None` for quoted triples and variables.
pub(super) fn convert<T: SophiaTerm>(term: T) -> Option<Term> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Term::iri(iri.as_str())),
        TermKind::BlankNode => term.bnode_id().map(|id| Term::blank(id.as_str())),
        TermKind::Literal => {
            let value = term.lexical_form()?.to_string();
            if let Some(tag) = term.language_tag() {
                return Some(Term::lang(value, tag.as_str()));
            }
            match term.datatype() {
                Some(dt) if dt.as_str() != vocab::RDF_LANG_STRING => {
                    Some(Term::typed(value, dt.as_str()))
                }
                _ => Some(Term::literal(value)),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
@prefix qb: <http://purl.org/linked-data/cube#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/> .

ex:s a qb:Slice ;
    rdfs:label "slice"@en , "plain" ;
    ex:value "25.0"^^xsd:double ;
    ex:next [ ex:n 1 ] .
"#;

    #[test]
    fn reads_literals_with_datatype_and_language() {
        let graph = parse_turtle(SAMPLE).expect("valid turtle");
        let s = Term::iri("http://example.org/s");
        assert!(graph.has_type(&s, vocab::QB_SLICE));
        let labels: Vec<_> = graph.objects(&s, vocab::RDFS_LABEL).cloned().collect();
        assert!(labels.contains(&Term::lang("slice", "en")));
        assert!(labels.contains(&Term::literal("plain")));
        assert_eq!(
            graph.value(&s, "http://example.org/value"),
            Some(&Term::typed("25.0", vocab::XSD_DOUBLE))
        );
    }

    #[test]
    fn blank_nodes_become_subjects() {
        let graph = parse_turtle(SAMPLE).expect("valid turtle");
        assert!(graph
            .subjects()
            .iter()
            .any(|s| matches!(s, Term::BlankNode(_))));
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse_turtle("@prefix ex: <http://example.org/> . ex:s ex:p").expect_err("must fail");
        assert!(matches!(err, GraphError::Parse { format: "turtle", .. }));
    }

    #[test]
    fn reads_ntriples() {
        let graph = parse_ntriples(
            "<http://example.org/a> <http://example.org/p> \"x\" .\n",
        )
        .expect("valid n-triples");
        assert_eq!(graph.len(), 1);
    }
}
