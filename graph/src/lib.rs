//! RDF graph model and serialization for FAIRLinked.
//!
//! The `fairlinked-graph` crate holds the in-memory triple model every other
//! FAIRLinked crate builds on: an insertion-ordered [`Graph`] of [`Triple`]s,
//! the [`NamespaceRegistry`] used to qualify and unqualify identifiers, parsers
//! for Turtle and JSON-LD input, serializers for Turtle, JSON-LD and N-Triples
//! output, and the SHA-256 digest written next to every serialized artifact.
//!
//! # Entry Point
//!
//! ```
//! use fairlinked_graph::{Graph, NamespaceRegistry, Term, vocab};
//!
//! let registry = NamespaceRegistry::standard();
//! let mut graph = Graph::new();
//! graph.insert(
//!     Term::iri("https://cwrusdle.bitbucket.io/mds/Dataset-EXP001"),
//!     Term::iri(vocab::RDF_TYPE),
//!     Term::iri(vocab::QB_DATASET),
//! );
//! let turtle = fairlinked_graph::serializer::turtle::to_turtle(&graph, &registry);
//! assert!(turtle.contains("qb:DataSet"));
//! ```
//!
//! # Serialization
//!
//! ```
//! use fairlinked_graph::{hash, serializer, Graph, NamespaceRegistry, RdfFormat};
//!
//! let graph = Graph::new();
//! let registry = NamespaceRegistry::standard();
//! let artifacts = serializer::serialize(&graph, &registry, &[RdfFormat::Turtle]);
//! let digest = hash::sha256_hex(&artifacts[&RdfFormat::Turtle]);
//! assert_eq!(digest.len(), 64);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod hash;
pub mod model;
pub mod namespace;
pub mod parser;
pub mod serializer;
pub mod vocab;

pub use error::{GraphError, Result};
pub use model::{Graph, Term, Triple};
pub use namespace::NamespaceRegistry;
pub use parser::RdfFormat;
