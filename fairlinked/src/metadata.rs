//! Per-variable descriptors consumed by the Data Cube builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::completion::{unit_local_name, FieldCompletion, FieldRequest, UnitVocabulary};
use crate::error::{Error, Result};
use crate::mapper::Annotation;

/// What the builder needs to know about one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMetadata {
    /// Column name.
    pub name: String,
    /// Whether the column holds measured values.
    pub is_measure: bool,
    /// Unit as given (`unit:DEG_C`, `DEG_C`, or a full IRI).
    pub unit: Option<String>,
    /// Category or study stage.
    pub category: Option<String>,
    /// Ontology term the column maps to.
    pub existing_uri: Option<String>,
}

impl VariableMetadata {
    /// A non-measure variable with nothing else recorded.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_measure: false,
            unit: None,
            category: None,
            existing_uri: None,
        }
    }

    /// A measure in `unit`.
    pub fn measure(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            is_measure: true,
            unit: Some(unit.into()),
            ..Self::new(name)
        }
    }
}

/// Variables keyed by column name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMetadataModel {
    variables: Vec<VariableMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
struct RawVariable {
    #[serde(rename = "IsMeasure", default)]
    is_measure: Option<Flag>,
    #[serde(rename = "Unit", default)]
    unit: Option<OneOrMany>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "ExistingURI", default)]
    existing_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct RawVariableOut<'a> {
    #[serde(rename = "IsMeasure")]
    is_measure: &'static str,
    #[serde(rename = "Unit")]
    unit: Option<&'a str>,
    #[serde(rename = "Category")]
    category: Option<&'a str>,
    #[serde(rename = "ExistingURI")]
    existing_uri: Option<&'a str>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl VariableMetadataModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON variable map.
    ///
    /// `IsMeasure` accepts `"YES"`/`"NO"` (any case) and booleans; `Unit`
    /// may be a string or a list, the first entry is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the document is not a map of variable objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawVariable> = serde_json::from_str(json)?;
        let mut model = Self::new();
        for (name, raw) in raw {
            let is_measure = match raw.is_measure {
                Some(Flag::Bool(b)) => b,
                Some(Flag::Text(t)) => matches!(t.trim().to_ascii_lowercase().as_str(), "yes" | "y" | "true"),
                None => false,
            };
            let unit = match raw.unit {
                Some(OneOrMany::One(u)) => Some(u),
                Some(OneOrMany::Many(us)) => us.into_iter().next(),
                None => None,
            };
            model.insert(VariableMetadata {
                name,
                is_measure,
                unit: non_empty(unit),
                category: non_empty(raw.category),
                existing_uri: non_empty(raw.existing_uri),
            });
        }
        Ok(model)
    }

    /// Reads the JSON variable map from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let model = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), variables = model.len(), "loaded variable metadata");
        Ok(model)
    }

    /// Serializes back to the JSON variable map.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: BTreeMap<&str, RawVariableOut<'_>> = self
            .variables
            .iter()
            .map(|v| {
                (
                    v.name.as_str(),
                    RawVariableOut {
                        is_measure: if v.is_measure { "YES" } else { "NO" },
                        unit: v.unit.as_deref(),
                        category: v.category.as_deref(),
                        existing_uri: v.existing_uri.as_deref(),
                    },
                )
            })
            .collect();
        serde_json::to_value(map).unwrap_or_default()
    }

    /// Seeds one entry per annotated column; matched columns carry the term IRI.
    #[must_use]
    pub fn from_annotations(annotations: &[Annotation]) -> Self {
        let mut model = Self::new();
        for a in annotations {
            model.insert(VariableMetadata {
                existing_uri: a.iri.clone(),
                ..VariableMetadata::new(&a.column)
            });
        }
        model
    }

    /// Adds or replaces the entry for `variable.name`.
    pub fn insert(&mut self, variable: VariableMetadata) {
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(slot) => *slot = variable,
            None => self.variables.push(variable),
        }
    }

    /// Entry for a column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VariableMetadata> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// True if the column is recorded as a measure.
    #[must_use]
    pub fn is_measure(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| v.is_measure)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableMetadata> {
        self.variables.iter()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if no variable is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Names of measures lacking a unit or a category.
    ///
    /// Columns that are neither identifiers nor measures are never
    /// materialized, so their metadata is not required.
    #[must_use]
    pub fn incomplete(&self, identifiers: &[String]) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| !identifiers.contains(&v.name))
            .filter(|v| v.is_measure && (v.unit.is_none() || v.category.is_none()))
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Escalates every incomplete variable to `provider`.
    ///
    /// Identifier columns are skipped. Fields already present are kept; the
    /// provider fills the rest and decides the measure flag. Returns the
    /// number of variables completed.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::MissingMetadata`] from the provider.
    pub fn complete(
        &mut self,
        provider: &mut dyn FieldCompletion,
        units: &UnitVocabulary,
        identifiers: &[String],
    ) -> Result<usize> {
        let pending: Vec<String> = self
            .incomplete(identifiers)
            .into_iter()
            .map(str::to_owned)
            .collect();
        for name in &pending {
            let Some(variable) = self.variables.iter_mut().find(|v| &v.name == name) else {
                continue;
            };
            let request = FieldRequest {
                column: &variable.name,
                study_stage: variable.category.as_deref(),
                existing_unit: variable.unit.as_deref(),
                existing_category: variable.category.as_deref(),
                valid_units: units,
            };
            let done = provider.complete(&request)?;
            variable.is_measure = done.is_measure;
            if variable.unit.as_deref().map_or(true, |u| !units.contains(u)) {
                variable.unit = done.unit.map(|u| format!("unit:{}", unit_local_name(&u)));
            }
            if variable.category.is_none() {
                variable.category = done.study_stage;
            }
            tracing::info!(variable = %variable.name, unit = ?variable.unit, category = ?variable.category, "completed metadata");
        }
        Ok(pending.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{PromptCompletion, ScriptedPrompt};

    const FIXTURE: &str = r#"{
        "ExperimentId": {"IsMeasure": "NO", "Unit": null, "Category": null, "ExistingURI": null},
        "Temperature": {"IsMeasure": "YES", "Unit": "qudt:DEG_C", "Category": null, "ExistingURI": null},
        "Pressure": {"IsMeasure": true, "Unit": ["unit:KiloPA"], "Category": "Result"},
        "Material": {"IsMeasure": "No"}
    }"#;

    #[test]
    fn parses_flags_and_units() {
        let model = VariableMetadataModel::from_json_str(FIXTURE).expect("fixture");
        assert_eq!(model.len(), 4);
        assert!(model.is_measure("Temperature"));
        assert!(model.is_measure("Pressure"));
        assert!(!model.is_measure("Material"));
        assert_eq!(model.get("Pressure").and_then(|v| v.unit.as_deref()), Some("unit:KiloPA"));
        assert_eq!(model.get("ExperimentId").and_then(|v| v.unit.as_deref()), None);
    }

    #[test]
    fn json_output_reloads() {
        let model = VariableMetadataModel::from_json_str(FIXTURE).expect("fixture");
        let again = VariableMetadataModel::from_json_str(&model.to_json().to_string()).expect("reload");
        assert_eq!(again.get("Temperature"), model.get("Temperature"));
    }

    #[test]
    fn incomplete_variables_go_to_the_provider() {
        let mut model = VariableMetadataModel::new();
        model.insert(VariableMetadata::new("ExperimentId"));
        model.insert(VariableMetadata {
            is_measure: true,
            ..VariableMetadata::new("Temperature")
        });
        model.insert(VariableMetadata::new("Operator"));
        let identifiers = ["ExperimentId".to_owned()];
        assert_eq!(model.incomplete(&identifiers), vec!["Temperature"]);
        let units = UnitVocabulary::builtin();
        let mut provider = PromptCompletion::new(ScriptedPrompt::new([
            "Temperature", "DEG_C", "Result", "yes",
        ]));
        let done = model
            .complete(&mut provider, &units, &["ExperimentId".to_owned()])
            .expect("complete");
        assert_eq!(done, 1);
        let t = model.get("Temperature").expect("present");
        assert_eq!(t.unit.as_deref(), Some("unit:DEG_C"));
        assert_eq!(t.category.as_deref(), Some("Result"));
    }
}
