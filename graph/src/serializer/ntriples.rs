//! N-Triples serializer.
//!
//! Every IRI is written in full, one triple per line.

use crate::model::{Graph, Term};

/// Serializes `graph` to an N-Triples string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid N-Triples string.
#[must_use]
pub fn to_ntriples(graph: &Graph) -> String {
    let mut out = String::with_capacity(graph.len() * 128);
    for t in graph {
        triple(&mut out, &t.subject, &t.predicate, &t.object);
    }
    out
}

fn triple(out: &mut String, subj: &Term, pred: &Term, obj: &Term) {
    out.push_str(&term(subj));
    out.push(' ');
    out.push_str(&term(pred));
    out.push(' ');
    out.push_str(&term(obj));
    out.push_str(" .\n");
}

fn term(t: &Term) -> String {
    match t {
        Term::Iri(iri) => format!("<{iri}>"),
        Term::BlankNode(id) => format!("_:{id}"),
        Term::Literal(lit) => {
            let escaped = lit
                .value
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\n', "\\n")
                .replace('\r', "\\r");
            match (&lit.language, &lit.datatype) {
                (Some(lang), _) => format!("\"{escaped}\"@{lang}"),
                (None, Some(dt)) => format!("\"{escaped}\"^^<{dt}>"),
                (None, None) => format!("\"{escaped}\""),
            }
        }
    }
}
