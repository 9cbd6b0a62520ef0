//! JSON-LD input through `sophia_jsonld`.
//!
//! Documents are expanded and converted to RDF by the JSON-LD 1.1
//! algorithms, so top-level node properties beside `@graph`, `@list`
//! values and `@base` all yield triples. Named graphs are merged into the
//! returned graph. Remote contexts are not fetched.

use serde_json::Value;
use sophia_api::parser::QuadParser;
use sophia_api::quad::Quad as _;
use sophia_api::source::QuadSource;
use sophia_jsonld::JsonLdParser;

use super::turtle::convert;
use crate::error::{GraphError, Result};
use crate::model::Graph;

const FORMAT: &str = "json-ld";

/// Parses a JSON-LD document into a graph.
///
/// # Errors
///
/// Returns [`GraphError::Json`] for invalid JSON and [`GraphError::Parse`]
/// when JSON-LD expansion fails (for example a remote `@context`).
pub fn parse_jsonld(input: &str) -> Result<Graph> {
    serde_json::from_str::<Value>(input)?;
    let mut graph = Graph::new();
    let mut unsupported = 0usize;
    JsonLdParser::new()
        .parse_str(input)
        .for_each_quad(|q| match (convert(q.s()), convert(q.p()), convert(q.o())) {
            (Some(s), Some(p), Some(o)) => {
                graph.insert(s, p, o);
            }
            _ => unsupported += 1,
        })
        .map_err(|e| GraphError::parse(FORMAT, e.to_string()))?;
    if unsupported > 0 {
        tracing::warn!(unsupported, "skipped generalized JSON-LD statements");
    }
    Ok(graph)
}
