//! Turtle 1.1 serializer.
//!
//! Produces prefix declarations for every registry binding followed by one
//! block per subject, `rdf:type` written as `a` and listed first.

use crate::model::{Graph, Term};
use crate::namespace::NamespaceRegistry;
use crate::serializer::group_by_subject;
use crate::vocab;

/// Serializes `graph` to a Turtle string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid Turtle string.
#[must_use]
pub fn to_turtle(graph: &Graph, registry: &NamespaceRegistry) -> String {
    let mut out = String::with_capacity(256 + graph.len() * 96);

    for (prefix, base) in registry.iter() {
        out.push_str(&format!("@prefix {prefix}: <{base}> .\n"));
    }
    out.push('\n');

    for block in group_by_subject(graph) {
        out.push_str(&term_to_turtle(block.subject, registry));
        let mut properties = block.properties;
        properties.sort_by_key(|(p, _)| p.as_iri() != Some(vocab::RDF_TYPE));
        let last = properties.len().saturating_sub(1);
        for (i, (predicate, objects)) in properties.iter().enumerate() {
            let pred = if predicate.as_iri() == Some(vocab::RDF_TYPE) {
                "a".to_owned()
            } else {
                term_to_turtle(predicate, registry)
            };
            let objs: Vec<String> = objects.iter().map(|o| term_to_turtle(o, registry)).collect();
            out.push_str(&format!("\n    {pred} {}", objs.join(" , ")));
            out.push_str(if i == last { " .\n" } else { " ;" });
        }
        out.push('\n');
    }

    out
}

/// Renders a single term in Turtle syntax.
#[must_use]
pub fn term_to_turtle(term: &Term, registry: &NamespaceRegistry) -> String {
    match term {
        Term::Iri(iri) => iri_to_turtle(iri, registry),
        Term::BlankNode(id) => format!("_:{id}"),
        Term::Literal(lit) => {
            let value = turtle_string(&lit.value);
            match (&lit.language, &lit.datatype) {
                (Some(lang), _) => format!("{value}@{lang}"),
                (None, Some(dt)) => format!("{value}^^{}", iri_to_turtle(dt, registry)),
                (None, None) => value,
            }
        }
    }
}

fn iri_to_turtle(iri: &str, registry: &NamespaceRegistry) -> String {
    registry
        .compact(iri)
        .unwrap_or_else(|| format!("<{iri}>"))
}

/// Escapes a string value for use as a Turtle literal.
fn turtle_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::turtle::parse_turtle;

    fn sample() -> Graph {
        let mut g = Graph::new();
        let s = Term::iri("https://cwrusdle.bitbucket.io/mds/Slice-EXP001");
        g.insert(s.clone(), Term::iri(vocab::RDFS_LABEL), Term::literal("line\n\"quoted\""));
        g.insert(s.clone(), Term::iri(vocab::RDF_TYPE), Term::iri(vocab::QB_SLICE));
        g.insert(s.clone(), Term::iri(vocab::QUDT_VALUE), Term::typed("25.0", vocab::XSD_DOUBLE));
        g.insert(s, Term::iri("http://example.org/other#p"), Term::blank("b1"));
        g
    }

    #[test]
    fn contains_prefixes_and_type_first() {
        let ttl = to_turtle(&sample(), &NamespaceRegistry::standard());
        assert!(ttl.contains("@prefix qb: <http://purl.org/linked-data/cube#> ."));
        assert!(ttl.contains("mds:Slice-EXP001\n    a qb:Slice ;"), "{ttl}");
        assert!(ttl.contains("\"25.0\"^^xsd:double"));
    }

    #[test]
    fn output_parses_back_to_the_same_graph() {
        let graph = sample();
        let ttl = to_turtle(&graph, &NamespaceRegistry::standard());
        let parsed = parse_turtle(&ttl).expect("serialized turtle parses");
        assert_eq!(parsed.len(), graph.len());
        let s = Term::iri("https://cwrusdle.bitbucket.io/mds/Slice-EXP001");
        assert_eq!(
            parsed.value(&s, vocab::RDFS_LABEL),
            Some(&Term::literal("line\n\"quoted\""))
        );
    }
}
