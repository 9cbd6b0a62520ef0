//! RDF Data Cube structure validator.
//!
//! Checks a converted graph for:
//! - exactly one `qb:DataSet` linked to a `qb:DataStructureDefinition`
//! - exactly one `qb:SliceKey`
//! - the expected number of `qb:Slice` nodes
//! - identifier values on every slice (missing is a warning)
//! - a value and a dataset link on every `qb:Observation`

use std::path::Path;

use anyhow::{Context, Result};
use fairlinked_graph::{parser, vocab, Graph, Term};

use crate::report::{Check, ValidationReport};

const VALIDATOR: &str = "cube/structure";

/// Validates one graph. `expected_slices` of `None` only requires at least one.
pub fn validate(graph: &Graph, expected_slices: Option<usize>) -> ValidationReport {
    let mut report = ValidationReport::new();

    let datasets = graph.subjects_of_type(vocab::QB_DATASET);
    match datasets.as_slice() {
        [dataset] => {
            report.push(Check::pass(VALIDATOR, "exactly one qb:DataSet"));
            check_structure(graph, dataset, &mut report);
        }
        other => report.push(Check::fail(
            VALIDATOR,
            format!("expected one qb:DataSet, found {}", other.len()),
        )),
    }

    let slice_keys = graph.subjects_of_type(vocab::QB_SLICE_KEY);
    if slice_keys.len() == 1 {
        report.push(Check::pass(VALIDATOR, "exactly one qb:SliceKey"));
    } else {
        report.push(Check::fail(
            VALIDATOR,
            format!("expected one qb:SliceKey, found {}", slice_keys.len()),
        ));
    }

    let slices = graph.subjects_of_type(vocab::QB_SLICE);
    let slice_count_ok = match expected_slices {
        Some(n) => slices.len() == n,
        None => !slices.is_empty(),
    };
    let expected = expected_slices.map_or_else(|| "at least 1".to_owned(), |n| n.to_string());
    if slice_count_ok {
        report.push(Check::pass(VALIDATOR, format!("{} qb:Slice nodes", slices.len())));
    } else {
        report.push(Check::fail(
            VALIDATOR,
            format!("found {} qb:Slice nodes, expected {expected}", slices.len()),
        ));
    }

    let key_properties: Vec<&Term> = slice_keys
        .first()
        .map(|sk| graph.objects(sk, vocab::QB_COMPONENT_PROPERTY).collect())
        .unwrap_or_default();
    let missing: Vec<String> = slices
        .iter()
        .flat_map(|slice| {
            key_properties
                .iter()
                .filter(move |p| graph.value(slice, p.lexical()).is_none())
                .map(move |p| format!("{} lacks {}", slice.lexical(), p.lexical()))
        })
        .collect();
    if missing.is_empty() {
        report.push(Check::pass(VALIDATOR, "every slice carries its identifier values"));
    } else {
        report.push(
            Check::warn(
                VALIDATOR,
                format!("{} slice identifier values are empty", missing.len()),
            )
            .with_details(missing),
        );
    }

    let observations = graph.subjects_of_type(vocab::QB_OBSERVATION);
    let broken: Vec<String> = observations
        .iter()
        .filter(|o| {
            graph.value(o, vocab::QUDT_VALUE).is_none()
                || graph.value(o, vocab::QB_DATASET_PROP).is_none()
        })
        .map(|o| o.lexical().to_owned())
        .collect();
    if broken.is_empty() {
        report.push(Check::pass(
            VALIDATOR,
            format!("{} observations carry a value and a dataset", observations.len()),
        ));
    } else {
        report.push(
            Check::fail(
                VALIDATOR,
                format!("{} observations lack a value or a dataset", broken.len()),
            )
            .with_details(broken),
        );
    }

    report
}

fn check_structure(graph: &Graph, dataset: &Term, report: &mut ValidationReport) {
    let dsd = graph
        .value(dataset, vocab::QB_STRUCTURE)
        .filter(|dsd| graph.has_type(dsd, vocab::QB_DATA_STRUCTURE_DEFINITION));
    match dsd {
        Some(dsd) => {
            let components = graph.objects(dsd, vocab::QB_COMPONENT).count();
            report.push(Check::pass(
                VALIDATOR,
                format!("dataset structure has {components} components"),
            ));
        }
        None => report.push(Check::fail(
            VALIDATOR,
            "qb:DataSet has no qb:structure to a qb:DataStructureDefinition",
        )),
    }
}

/// Parses an RDF file and validates it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn validate_file(path: &Path, expected_slices: Option<usize>) -> Result<ValidationReport> {
    let graph = parser::parse_file(path).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(validate(&graph, expected_slices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairlinked::{ConversionContext, Table, VariableMetadata, VariableMetadataModel};
    use fairlinked_graph::NamespaceRegistry;

    fn graph(ids: &[&str]) -> Graph {
        let table = Table::new(
            vec!["ExperimentId".into(), "Yield".into()],
            ids.iter().map(|id| vec![(*id).to_owned(), "0.5".into()]).collect(),
        );
        let mut metadata = VariableMetadataModel::new();
        metadata.insert(VariableMetadata::measure("Yield", "unit:PERCENT"));
        let registry = NamespaceRegistry::standard();
        let ctx = ConversionContext::new(&registry, "mds", "orcid", "20250128120000");
        fairlinked::cube::dataset_graph(&table, &metadata, &ctx, "demo").expect("graph")
    }

    #[test]
    fn converted_dataset_conforms() {
        let report = validate(&graph(&["A", "B"]), Some(2));
        assert!(report.all_passed(), "{report}");
        assert_eq!(report.count(crate::Severity::Warning), 0);
    }

    #[test]
    fn wrong_slice_count_fails() {
        let report = validate(&graph(&["A", "B"]), Some(3));
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn empty_identifier_is_a_warning() {
        let report = validate(&graph(&["A", ""]), None);
        assert!(report.all_passed());
        assert_eq!(report.count(crate::Severity::Warning), 1);
    }

    #[test]
    fn empty_graph_fails() {
        let report = validate(&Graph::new(), None);
        assert_eq!(report.failure_count(), 3);
    }
}
