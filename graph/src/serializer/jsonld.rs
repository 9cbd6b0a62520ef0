//! JSON-LD 1.1 serializer.
//!
//! Produces a single compact document: an `@context` holding every registry
//! binding and an `@graph` array with one node object per subject.

use serde_json::{json, Map, Value};

use crate::model::{Graph, Term};
use crate::namespace::NamespaceRegistry;
use crate::serializer::group_by_subject;
use crate::vocab;

/// Serializes `graph` to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with `{:#}` or
/// [`serde_json::to_string_pretty`].
///
/// # Errors
///
/// This function is infallible; it always returns a valid JSON-LD `Value`.
#[must_use]
pub fn to_json_ld(graph: &Graph, registry: &NamespaceRegistry) -> Value {
    json!({
        "@context": build_context(registry),
        "@graph": build_graph(graph, registry)
    })
}

fn build_context(registry: &NamespaceRegistry) -> Value {
    let ctx: Map<String, Value> = registry
        .iter()
        .map(|(prefix, base)| (prefix.to_owned(), json!(base)))
        .collect();
    Value::Object(ctx)
}

fn build_graph(graph: &Graph, registry: &NamespaceRegistry) -> Value {
    let nodes: Vec<Value> = group_by_subject(graph)
        .into_iter()
        .map(|block| {
            let mut node = Map::new();
            node.insert("@id".to_owned(), json!(node_id(block.subject, registry)));
            for (predicate, objects) in block.properties {
                let is_type = predicate.as_iri() == Some(vocab::RDF_TYPE)
                    && objects.iter().all(|o| o.as_iri().is_some());
                let (key, values): (String, Vec<Value>) = if is_type {
                    (
                        "@type".to_owned(),
                        objects
                            .iter()
                            .map(|o| json!(registry.shorten(o.lexical())))
                            .collect(),
                    )
                } else {
                    (
                        registry.shorten(predicate.lexical()),
                        objects.iter().map(|o| object_to_json(o, registry)).collect(),
                    )
                };
                node.insert(key, collapse(values));
            }
            Value::Object(node)
        })
        .collect();
    Value::Array(nodes)
}

fn node_id(term: &Term, registry: &NamespaceRegistry) -> String {
    match term {
        Term::BlankNode(id) => format!("_:{id}"),
        other => registry.shorten(other.lexical()),
    }
}

fn object_to_json(term: &Term, registry: &NamespaceRegistry) -> Value {
    match term {
        Term::Iri(_) | Term::BlankNode(_) => json!({ "@id": node_id(term, registry) }),
        Term::Literal(lit) => match (&lit.language, &lit.datatype) {
            (Some(lang), _) => json!({ "@value": lit.value, "@language": lang }),
            (None, Some(dt)) => json!({ "@value": lit.value, "@type": registry.shorten(dt) }),
            (None, None) => json!(lit.value),
        },
    }
}

fn collapse(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::jsonld::parse_jsonld;

    fn sample() -> Graph {
        let mut g = Graph::new();
        let s = Term::iri("https://cwrusdle.bitbucket.io/mds/Observation-T-EXP001");
        g.insert(s.clone(), Term::iri(vocab::RDF_TYPE), Term::iri(vocab::QB_OBSERVATION));
        g.insert(s.clone(), Term::iri(vocab::QUDT_VALUE), Term::typed("25", vocab::XSD_INTEGER));
        g.insert(s.clone(), Term::iri(vocab::QUDT_HAS_UNIT), Term::iri("http://qudt.org/vocab/unit/DEG_C"));
        g.insert(s.clone(), Term::iri(vocab::RDFS_LABEL), Term::literal("a"));
        g.insert(s, Term::iri(vocab::RDFS_LABEL), Term::lang("b", "en"));
        g
    }

    #[test]
    fn produces_context_and_graph() {
        let json = to_json_ld(&sample(), &NamespaceRegistry::standard());
        assert!(json["@context"].is_object());
        assert_eq!(json["@context"]["qb"], "http://purl.org/linked-data/cube#");
        let graph = json["@graph"].as_array().expect("@graph must be array");
        assert_eq!(graph.len(), 1);
        assert_eq!(graph[0]["@type"], "qb:Observation");
        assert_eq!(graph[0]["qudt:hasUnit"]["@id"], "unit:DEG_C");
        assert!(graph[0]["rdfs:label"].is_array());
    }

    #[test]
    fn output_parses_back_to_the_same_graph() {
        let graph = sample();
        let text = format!("{:#}", to_json_ld(&graph, &NamespaceRegistry::standard()));
        let parsed = parse_jsonld(&text).expect("serialized json-ld parses");
        assert_eq!(parsed.len(), graph.len());
        for t in &graph {
            assert!(parsed.contains(t), "missing {} {} {}", t.subject, t.predicate, t.object);
        }
    }
}
