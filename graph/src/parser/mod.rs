//! Parsers for RDF input.
//!
//! Two serialization families are read: Turtle (and its N-Triples subset) via
//! `sophia_turtle`, and JSON-LD via `sophia_jsonld`.

pub mod jsonld;
pub mod turtle;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::model::Graph;

/// A supported RDF serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfFormat {
    /// Terse RDF Triple Language (`.ttl`).
    Turtle,
    /// JSON-LD (`.jsonld`, `.json-ld`).
    JsonLd,
    /// N-Triples (`.nt`).
    NTriples,
}

impl RdfFormat {
    /// Guesses the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("ttl") => Ok(Self::Turtle),
            Some("jsonld") | Some("json-ld") => Ok(Self::JsonLd),
            Some("nt") => Ok(Self::NTriples),
            _ => Err(GraphError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Canonical file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::JsonLd => "jsonld",
            Self::NTriples => "nt",
        }
    }

    /// Parses `input` in this format.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] for malformed input.
    pub fn parse(self, input: &str) -> Result<Graph> {
        match self {
            Self::Turtle => turtle::parse_turtle(input),
            Self::NTriples => turtle::parse_ntriples(input),
            Self::JsonLd => jsonld::parse_jsonld(input),
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Turtle => "turtle",
            Self::JsonLd => "json-ld",
            Self::NTriples => "n-triples",
        })
    }
}

/// Reads and parses an RDF file, guessing its format from the extension.
///
/// # Errors
///
/// Returns [`GraphError::UnknownFormat`] before touching the file when the
/// extension is not recognised, [`GraphError::Io`] if it cannot be read, and
/// [`GraphError::Parse`] if the content is malformed.
pub fn parse_file(path: &Path) -> Result<Graph> {
    let format = RdfFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
    let graph = format.parse(&content)?;
    tracing::debug!(path = %path.display(), %format, triples = graph.len(), "parsed RDF file");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_format_from_extension() {
        assert_eq!(RdfFormat::from_path(Path::new("a.ttl")).ok(), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_path(Path::new("a.JSONLD")).ok(), Some(RdfFormat::JsonLd));
        assert_eq!(RdfFormat::from_path(Path::new("a.json-ld")).ok(), Some(RdfFormat::JsonLd));
        assert_eq!(RdfFormat::from_path(Path::new("a.nt")).ok(), Some(RdfFormat::NTriples));
    }

    #[test]
    fn unknown_extension_fails_fast() {
        assert!(matches!(
            RdfFormat::from_path(Path::new("data.csv")),
            Err(GraphError::UnknownFormat { .. })
        ));
        assert!(matches!(
            parse_file(Path::new("/nonexistent/data.xml")),
            Err(GraphError::UnknownFormat { .. })
        ));
    }
}
