//! Conversion run configuration.
//!
//! ```toml
//! prefix = "mds"
//! creator = "0000-0001-2345-6789"
//! dataset_name = "TestDataset"
//! identifier_columns = ["ExperimentId"]
//!
//! [namespaces]
//! lab = "https://example.org/lab/"
//!
//! [units]
//! extra = ["MilliW-PER-CentiM2"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use fairlinked_graph::NamespaceRegistry;
use serde::Deserialize;

use crate::completion::UnitVocabulary;
use crate::error::{Error, Result};

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    /// Namespace prefix minted identifiers live under.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Creator identifier (ORCID) attached to every dataset.
    pub creator: String,
    /// Dataset title for whole-dataset conversion.
    #[serde(default)]
    pub dataset_name: Option<String>,
    /// Row identifier columns; empty means auto-detect.
    #[serde(default)]
    pub identifier_columns: Vec<String>,
    /// Extra prefix → base URI bindings.
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
    /// Unit vocabulary extensions.
    #[serde(default)]
    pub units: UnitsConfig,
}

/// `[units]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsConfig {
    /// Unit local names accepted besides the built-in list.
    #[serde(default)]
    pub extra: Vec<String>,
}

fn default_prefix() -> String {
    "mds".to_owned()
}

impl ConversionConfig {
    /// A configuration with defaults and the given creator.
    pub fn new(creator: impl Into<String>) -> Self {
        Self {
            prefix: default_prefix(),
            creator: creator.into(),
            dataset_name: None,
            identifier_columns: Vec::new(),
            namespaces: BTreeMap::new(),
            units: UnitsConfig::default(),
        }
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, PathBuf::from("<inline>"))
    }

    /// Loads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text, path.to_path_buf())
    }

    fn parse(text: &str, path: PathBuf) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        if config.prefix.trim().is_empty() {
            return Err(Error::Config {
                path,
                message: "prefix must not be empty".to_owned(),
            });
        }
        Ok(config)
    }

    /// Standard bindings plus the configured ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured prefix conflicts with a standard one
    /// or the configured `prefix` is unbound.
    pub fn namespace_registry(&self) -> Result<NamespaceRegistry> {
        let mut registry = NamespaceRegistry::standard();
        for (prefix, base) in &self.namespaces {
            registry.bind(prefix.clone(), base.clone())?;
        }
        registry.require(&self.prefix)?;
        Ok(registry)
    }

    /// Built-in units plus `[units] extra`.
    #[must_use]
    pub fn unit_vocabulary(&self) -> UnitVocabulary {
        let mut units = UnitVocabulary::builtin();
        for unit in &self.units.extra {
            units.insert(unit, None);
        }
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
prefix = "lab"
creator = "0000-0001-2345-6789"
identifier_columns = ["ExperimentId"]

[namespaces]
lab = "https://example.org/lab/"

[units]
extra = ["MilliW-PER-CentiM2"]
"#;

    #[test]
    fn parses_full_config() {
        let config = ConversionConfig::from_toml_str(SAMPLE).expect("valid config");
        assert_eq!(config.prefix, "lab");
        assert_eq!(config.identifier_columns, vec!["ExperimentId"]);
        let registry = config.namespace_registry().expect("registry");
        assert_eq!(registry.resolve("lab"), Some("https://example.org/lab/"));
        assert!(config.unit_vocabulary().contains("MilliW-PER-CentiM2"));
    }

    #[test]
    fn defaults_prefix_to_mds() {
        let config = ConversionConfig::from_toml_str("creator = \"x\"").expect("valid config");
        assert_eq!(config.prefix, "mds");
        assert!(config.namespace_registry().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ConversionConfig::from_toml_str("creator = \"x\"\ncolour = 1").expect_err("must fail");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn unbound_prefix_is_rejected() {
        let config = ConversionConfig::from_toml_str("prefix = \"nope\"\ncreator = \"x\"").expect("parses");
        assert!(config.namespace_registry().is_err());
    }
}
