//! Prefix to base-URI bindings.
//!
//! A [`NamespaceRegistry`] is built once per run and shared by reference; it
//! is the single source for qualifying (`expand`) and unqualifying
//! (`compact`) identifiers across every serializer.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{GraphError, Result};
use crate::vocab;

/// Prefix → base URI map with unique prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceRegistry {
    bindings: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct NamespaceRow {
    #[serde(rename = "Namespace you are using")]
    prefix: String,
    #[serde(rename = "Base URI")]
    base: String,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the vocabularies every Data Cube document uses.
    #[must_use]
    pub fn standard() -> Self {
        let mut bindings = BTreeMap::new();
        for (prefix, base) in [
            ("rdf", vocab::RDF),
            ("rdfs", vocab::RDFS),
            ("owl", vocab::OWL),
            ("xsd", vocab::XSD),
            ("skos", vocab::SKOS),
            ("qb", vocab::QB),
            ("dcterms", vocab::DCTERMS),
            ("qudt", vocab::QUDT),
            ("unit", vocab::UNIT),
            ("quantitykind", vocab::QUANTITY_KIND),
            ("prov", vocab::PROV),
            ("mds", vocab::MDS),
        ] {
            bindings.insert(prefix.to_owned(), base.to_owned());
        }
        Self { bindings }
    }

    /// Binds `prefix` to `base`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::PrefixConflict`] if the prefix is already bound to
    /// a different base URI.
    pub fn bind(&mut self, prefix: impl Into<String>, base: impl Into<String>) -> Result<()> {
        let prefix = prefix.into();
        let base = base.into();
        match self.bindings.get(&prefix) {
            Some(existing) if *existing != base => Err(GraphError::PrefixConflict {
                prefix,
                existing: existing.clone(),
                requested: base,
            }),
            Some(_) => Ok(()),
            None => {
                self.bindings.insert(prefix, base);
                Ok(())
            }
        }
    }

    /// Adds every binding of `other`.
    ///
    /// # Errors
    ///
    /// Fails on the first prefix bound to a different base URI.
    pub fn merge(&mut self, other: &NamespaceRegistry) -> Result<()> {
        for (prefix, base) in &other.bindings {
            self.bind(prefix.clone(), base.clone())?;
        }
        Ok(())
    }

    /// Loads a two-column namespace table (`Namespace you are using`, `Base URI`).
    ///
    /// Blank rows are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, lacks the expected headers,
    /// or binds one prefix twice with different URIs.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut registry = Self::new();
        for row in reader.deserialize::<NamespaceRow>() {
            let row = row?;
            let prefix = row.prefix.trim();
            let base = row.base.trim();
            if prefix.is_empty() || base.is_empty() {
                continue;
            }
            registry.bind(prefix, base)?;
        }
        tracing::debug!(path = %path.display(), bindings = registry.len(), "loaded namespace table");
        Ok(registry)
    }

    /// Base URI bound to `prefix`.
    #[must_use]
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Base URI bound to `prefix`, failing when absent.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UndefinedPrefix`] when the prefix is unbound.
    pub fn require(&self, prefix: &str) -> Result<&str> {
        self.resolve(prefix)
            .ok_or_else(|| GraphError::UndefinedPrefix(prefix.to_owned()))
    }

    /// Expands `prefix:local` to a full IRI.
    ///
    /// Values that already look absolute (`http://`, `https://`, `urn:`) are
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UndefinedPrefix`] for an unbound prefix or a value
    /// without a colon.
    pub fn expand(&self, curie: &str) -> Result<String> {
        if is_absolute(curie) {
            return Ok(curie.to_owned());
        }
        let (prefix, local) = curie
            .split_once(':')
            .ok_or_else(|| GraphError::UndefinedPrefix(curie.to_owned()))?;
        Ok(format!("{}{local}", self.require(prefix)?))
    }

    /// Compacts `iri` to `prefix:local` using the longest matching base URI.
    ///
    /// Returns `None` when no binding matches or the local part would not be a
    /// valid prefixed-name local part.
    #[must_use]
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.bindings
            .iter()
            .filter(|(_, base)| iri.starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())
            .and_then(|(prefix, base)| {
                let local = &iri[base.len()..];
                is_safe_local(local).then(|| format!("{prefix}:{local}"))
            })
    }

    /// Compacted form of `iri`, or the IRI itself.
    #[must_use]
    pub fn shorten(&self, iri: &str) -> String {
        self.compact(iri).unwrap_or_else(|| iri.to_owned())
    }

    /// Iterates `(prefix, base)` in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, b)| (p.as_str(), b.as_str()))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn is_absolute(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with("urn:")
}

fn is_safe_local(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        None => return true,
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {}
        Some(_) => return false,
    }
    !local.ends_with('.')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn expand_and_compact_agree() {
        let ns = NamespaceRegistry::standard();
        let iri = ns.expand("unit:DEG_C").unwrap_or_default();
        assert_eq!(iri, "http://qudt.org/vocab/unit/DEG_C");
        assert_eq!(ns.compact(&iri).as_deref(), Some("unit:DEG_C"));
    }

    #[test]
    fn compact_prefers_longest_base() {
        let ns = NamespaceRegistry::standard();
        assert_eq!(
            ns.compact("http://qudt.org/vocab/quantitykind/Temperature").as_deref(),
            Some("quantitykind:Temperature")
        );
    }

    #[test]
    fn compact_rejects_unsafe_local_names() {
        let ns = NamespaceRegistry::standard();
        assert!(ns.compact("https://cwrusdle.bitbucket.io/mds/a b").is_none());
        assert!(ns.compact("https://cwrusdle.bitbucket.io/mds/a.").is_none());
    }

    #[test]
    fn unbound_prefix_is_an_error() {
        let ns = NamespaceRegistry::standard();
        assert!(matches!(ns.expand("nope:x"), Err(GraphError::UndefinedPrefix(_))));
    }

    #[test]
    fn conflicting_rebind_is_rejected() {
        let mut ns = NamespaceRegistry::standard();
        assert!(ns.bind("mds", vocab::MDS).is_ok());
        assert!(ns.bind("mds", "http://example.org/").is_err());
    }

    #[test]
    fn loads_namespace_csv() {
        let mut file = tempfile::NamedTempFile::new().expect("temp csv");
        writeln!(file, "Namespace you are using,Base URI").expect("temp csv");
        writeln!(file, "ex,http://example.org/").expect("temp csv");
        writeln!(file, ",").expect("temp csv");
        let ns = NamespaceRegistry::from_csv_path(file.path()).expect("temp csv");
        assert_eq!(ns.resolve("ex"), Some("http://example.org/"));
        assert_eq!(ns.len(), 1);
    }
}
