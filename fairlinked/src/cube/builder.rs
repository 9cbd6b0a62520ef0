//! Triple construction shared by every addressing mode.

use std::collections::HashSet;

use fairlinked_graph::{vocab, Graph, NamespaceRegistry, Term};

use crate::cube::naming::slug;
use crate::cube::ConversionContext;
use crate::error::Result;
use crate::metadata::VariableMetadataModel;
use crate::table::Table;

/// A column materialized as a Data Cube component.
#[derive(Debug, Clone)]
struct Component {
    column: usize,
    name: String,
    slug: String,
    property: Term,
    unit: Option<Term>,
    category: Option<String>,
    concept: Option<Term>,
}

/// Keys handed out within one output scope.
///
/// Keys are compared with `_` folded to `-`, so two keys that would give the
/// same CRADLE file name also count as taken.
#[derive(Debug, Default)]
pub(crate) struct UsedKeys(HashSet<String>);

impl UsedKeys {
    /// Returns `key` if free, else the first free `{key}-{n}` for `n >= 2`.
    pub(crate) fn claim(&mut self, key: String) -> String {
        if self.0.insert(fold(&key)) {
            return key;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{key}-{n}");
            if self.0.insert(fold(&candidate)) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Claims a row key; a taken key becomes `{key}-row{number}`.
    pub(crate) fn claim_row(&mut self, key: String, number: usize) -> String {
        if self.0.insert(fold(&key)) {
            return key;
        }
        tracing::warn!(row = number, %key, "duplicate identifier, disambiguated");
        self.claim(format!("{key}-row{number}"))
    }
}

fn fold(key: &str) -> String {
    key.replace('_', "-")
}

/// Columns, properties and units resolved once per conversion.
#[derive(Debug)]
pub(crate) struct CubePlan<'a> {
    ctx: &'a ConversionContext<'a>,
    base: String,
    dimensions: Vec<Component>,
    measures: Vec<Component>,
}

/// Identifier columns for `table`: the configured ones that exist, else
/// `ExperimentId` when present, else the first column.
#[must_use]
pub fn identifier_columns(table: &Table, ctx: &ConversionContext<'_>) -> Vec<String> {
    let configured: Vec<String> = ctx
        .identifier_columns
        .iter()
        .filter(|c| {
            let present = table.column_index(c).is_some();
            if !present {
                tracing::warn!(column = %c, "identifier column not in table");
            }
            present
        })
        .cloned()
        .collect();
    if !configured.is_empty() {
        return configured;
    }
    if table.column_index("ExperimentId").is_some() {
        return vec!["ExperimentId".to_owned()];
    }
    table.columns().first().cloned().into_iter().collect()
}

/// Literal for a cell: integers, other numbers and booleans are typed.
#[must_use]
pub fn typed_literal(value: &str) -> Term {
    let value = value.trim();
    if value.parse::<i64>().is_ok() {
        return Term::typed(value, vocab::XSD_INTEGER);
    }
    if value.bytes().any(|b| b.is_ascii_digit()) && value.parse::<f64>().is_ok() {
        return Term::typed(value, vocab::XSD_DOUBLE);
    }
    match value.to_ascii_lowercase().as_str() {
        "true" | "false" => Term::typed(value.to_ascii_lowercase(), vocab::XSD_BOOLEAN),
        _ => Term::literal(value),
    }
}

/// Expands a CURIE or absolute IRI; bare names go under `default_base`.
fn resolve_iri(value: &str, namespaces: &NamespaceRegistry, default_base: &str) -> Result<Term> {
    let value = value.trim();
    if value.contains("://") || value.starts_with("urn:") {
        return Ok(Term::iri(value));
    }
    if value.contains(':') {
        return Ok(Term::iri(namespaces.expand(value)?));
    }
    Ok(Term::iri(format!("{default_base}{value}")))
}

impl<'a> CubePlan<'a> {
    pub(crate) fn new(
        table: &Table,
        metadata: &VariableMetadataModel,
        ctx: &'a ConversionContext<'a>,
    ) -> Result<Self> {
        let base = ctx.namespaces.require(&ctx.prefix)?.to_owned();
        let identifiers = identifier_columns(table, ctx);
        let mut dimensions = Vec::new();
        let mut measures = Vec::new();
        let mut slugs = UsedKeys::default();
        for (column, name) in table.columns().iter().enumerate() {
            let is_identifier = identifiers.contains(name);
            let meta = metadata.get(name);
            let is_measure = meta.is_some_and(|m| m.is_measure);
            if !is_identifier && !is_measure {
                tracing::debug!(column = %name, "column is neither identifier nor measure, skipped");
                continue;
            }
            let unit = match meta.and_then(|m| m.unit.as_deref()) {
                Some(u) => Some(resolve_iri(u, ctx.namespaces, vocab::UNIT)?),
                None if is_measure && !is_identifier => {
                    tracing::warn!(column = %name, "measure has no unit, observations get an empty one");
                    None
                }
                None => None,
            };
            let concept = meta
                .and_then(|m| m.existing_uri.as_deref())
                .map(|u| resolve_iri(u, ctx.namespaces, &base))
                .transpose()?;
            let plain = slug(name);
            let slug = slugs.claim(plain.clone());
            if slug != plain {
                tracing::warn!(column = %name, property = %slug, "column slug collides, renamed");
            }
            let component = Component {
                column,
                name: name.clone(),
                property: Term::iri(format!("{base}{slug}")),
                slug,
                unit,
                category: meta.and_then(|m| m.category.clone()),
                concept,
            };
            if is_identifier {
                dimensions.push(component);
            } else {
                measures.push(component);
            }
        }
        Ok(Self {
            ctx,
            base,
            dimensions,
            measures,
        })
    }

    fn mint(&self, kind: &str, key: &str) -> Term {
        Term::iri(format!("{}{kind}-{key}-{}", self.base, self.ctx.timestamp))
    }

    /// Identifier key of a row, `None` when every identifier cell is blank.
    pub(crate) fn row_key(&self, row: &[String]) -> Option<String> {
        let parts: Vec<&str> = self
            .dimensions
            .iter()
            .map(|d| row[d.column].trim())
            .filter(|v| !v.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join("-"))
    }

    /// Builds one dataset named by `scope` holding a slice per row.
    ///
    /// `rows` pairs each row's unique slice key with its cells.
    pub(crate) fn build(&self, scope: &str, title: &str, rows: &[(String, &[String])]) -> Graph {
        let mut g = Graph::new();
        let scope = slug(scope);
        let ty = Term::iri(vocab::RDF_TYPE);
        let dataset = self.mint("Dataset", &scope);
        let dsd = self.mint("DSD", &scope);
        let slice_key = self.mint("SliceKey", &scope);

        g.insert(dataset.clone(), ty.clone(), Term::iri(vocab::QB_DATASET));
        g.insert(dataset.clone(), Term::iri(vocab::DCTERMS_TITLE), Term::literal(title));
        g.insert(dataset.clone(), Term::iri(vocab::DCTERMS_CREATOR), Term::literal(&self.ctx.creator));
        g.insert(dataset.clone(), Term::iri(vocab::DCTERMS_CREATED), Term::literal(&self.ctx.timestamp));
        g.insert(dataset.clone(), Term::iri(vocab::QB_STRUCTURE), dsd.clone());

        g.insert(dsd.clone(), ty.clone(), Term::iri(vocab::QB_DATA_STRUCTURE_DEFINITION));
        g.insert(dsd.clone(), Term::iri(vocab::QB_SLICE_KEY_PROP), slice_key.clone());
        let components = self
            .dimensions
            .iter()
            .map(|c| (c, vocab::QB_DIMENSION, vocab::QB_DIMENSION_PROPERTY))
            .chain(
                self.measures
                    .iter()
                    .map(|c| (c, vocab::QB_MEASURE, vocab::QB_MEASURE_PROPERTY)),
            );
        for (c, role, class) in components {
            let spec = self.mint(&format!("Component-{}", c.slug), &scope);
            g.insert(dsd.clone(), Term::iri(vocab::QB_COMPONENT), spec.clone());
            g.insert(spec.clone(), ty.clone(), Term::iri(vocab::QB_COMPONENT_SPECIFICATION));
            g.insert(spec, Term::iri(role), c.property.clone());

            g.insert(c.property.clone(), ty.clone(), Term::iri(class));
            g.insert(c.property.clone(), Term::iri(vocab::RDFS_LABEL), Term::literal(&c.name));
            if let Some(category) = &c.category {
                g.insert(c.property.clone(), Term::iri(vocab::MDS_HAS_STUDY_STAGE), Term::literal(category));
            }
            if let Some(concept) = &c.concept {
                g.insert(c.property.clone(), Term::iri(vocab::QB_CONCEPT), concept.clone());
            }
            if let Some(unit) = &c.unit {
                g.insert(c.property.clone(), Term::iri(vocab::QUDT_HAS_UNIT), unit.clone());
            }
        }

        g.insert(slice_key.clone(), ty.clone(), Term::iri(vocab::QB_SLICE_KEY));
        for d in &self.dimensions {
            g.insert(slice_key.clone(), Term::iri(vocab::QB_COMPONENT_PROPERTY), d.property.clone());
        }

        for (key, row) in rows {
            self.add_slice(&mut g, &dataset, &slice_key, key, row);
        }
        g
    }

    /// Slug of the row's identifier, `row{number}` when it has none.
    pub(crate) fn slice_key_of(&self, number: usize, row: &[String]) -> String {
        match self.row_key(row) {
            Some(key) => slug(&key),
            None => {
                tracing::warn!(row = number, "row has no identifier value");
                format!("row{number}")
            }
        }
    }

    fn add_slice(&self, g: &mut Graph, dataset: &Term, slice_key: &Term, key: &str, row: &[String]) {
        let ty = Term::iri(vocab::RDF_TYPE);
        let slice = self.mint("Slice", key);
        g.insert(dataset.clone(), Term::iri(vocab::QB_SLICE_PROP), slice.clone());
        g.insert(slice.clone(), ty.clone(), Term::iri(vocab::QB_SLICE));
        g.insert(slice.clone(), Term::iri(vocab::QB_SLICE_STRUCTURE), slice_key.clone());

        let dimension_values: Vec<(Term, Term)> = self
            .dimensions
            .iter()
            .filter(|d| !row[d.column].trim().is_empty())
            .map(|d| (d.property.clone(), Term::literal(row[d.column].trim())))
            .collect();
        for (p, v) in &dimension_values {
            g.insert(slice.clone(), p.clone(), v.clone());
        }

        for m in &self.measures {
            let cell = row[m.column].trim();
            if cell.is_empty() {
                continue;
            }
            let value = typed_literal(cell);
            let obs = self.mint(&format!("Observation-{}", m.slug), key);
            g.insert(slice.clone(), Term::iri(vocab::QB_OBSERVATION_PROP), obs.clone());
            g.insert(obs.clone(), ty.clone(), Term::iri(vocab::QB_OBSERVATION));
            g.insert(obs.clone(), Term::iri(vocab::QB_DATASET_PROP), dataset.clone());
            for (p, v) in &dimension_values {
                g.insert(obs.clone(), p.clone(), v.clone());
            }
            g.insert(obs.clone(), m.property.clone(), value.clone());
            g.insert(obs.clone(), Term::iri(vocab::QB_MEASURE_TYPE), m.property.clone());
            g.insert(obs.clone(), Term::iri(vocab::QUDT_VALUE), value);
            let unit = m.unit.clone().unwrap_or_else(|| Term::literal(""));
            g.insert(obs, Term::iri(vocab::QUDT_HAS_UNIT), unit);
        }
    }

    /// Number of identifier columns in the plan.
    pub(crate) fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_are_typed_by_content() {
        assert_eq!(typed_literal("25"), Term::typed("25", vocab::XSD_INTEGER));
        assert_eq!(typed_literal("25.0"), Term::typed("25.0", vocab::XSD_DOUBLE));
        assert_eq!(typed_literal("1e3"), Term::typed("1e3", vocab::XSD_DOUBLE));
        assert_eq!(typed_literal("TRUE"), Term::typed("true", vocab::XSD_BOOLEAN));
        assert_eq!(typed_literal("NaN"), Term::literal("NaN"));
        assert_eq!(typed_literal("EXP001"), Term::literal("EXP001"));
    }

    #[test]
    fn identifier_defaults() {
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        let with_id = Table::new(vec!["A".into(), "ExperimentId".into()], vec![]);
        assert_eq!(identifier_columns(&with_id, &ctx), vec!["ExperimentId"]);
        let without = Table::new(vec!["A".into(), "B".into()], vec![]);
        assert_eq!(identifier_columns(&without, &ctx), vec!["A"]);
        let ctx = ctx.with_identifier_columns(vec!["B".into(), "Missing".into()]);
        assert_eq!(identifier_columns(&without, &ctx), vec!["B"]);
    }
}
