//! Table → cube → table round-trip validator.

use std::collections::{BTreeSet, HashMap};

use fairlinked::{PivotTable, Table};

use crate::report::{Check, ValidationReport};

const VALIDATOR: &str = "roundtrip";

/// Compares a source table with the table pivoted back from its graphs.
///
/// Row counts must agree and every identifier value must come back. Source
/// cells that come back empty are reported as warnings, since columns that
/// were neither identifier nor measure are not converted.
pub fn validate(original: &Table, pivoted: &PivotTable, identifier: &str) -> ValidationReport {
    let mut report = ValidationReport::new();

    if original.len() == pivoted.len() {
        report.push(Check::pass(VALIDATOR, format!("{} rows recovered", pivoted.len())));
    } else {
        report.push(Check::fail(
            VALIDATOR,
            format!("{} source rows, {} pivoted rows", original.len(), pivoted.len()),
        ));
    }

    let Some(id_col) = pivoted.column_index(identifier) else {
        report.push(Check::fail(
            VALIDATOR,
            format!("identifier column {identifier} missing from pivoted table"),
        ));
        return report;
    };

    let recovered: HashMap<&str, &Vec<Vec<String>>> = pivoted
        .rows
        .iter()
        .filter_map(|row| row[id_col].first().map(|id| (id.as_str(), row)))
        .collect();
    let expected: BTreeSet<&str> = (0..original.len())
        .filter_map(|r| original.value(r, identifier))
        .collect();
    let lost: Vec<String> = expected
        .iter()
        .filter(|id| !recovered.contains_key(*id))
        .map(|id| (*id).to_owned())
        .collect();
    if lost.is_empty() {
        report.push(Check::pass(
            VALIDATOR,
            format!("{} identifier values recovered", expected.len()),
        ));
    } else {
        report.push(
            Check::fail(VALIDATOR, format!("{} identifier values lost", lost.len())).with_details(lost),
        );
    }

    let blank_ids = (0..original.len())
        .filter(|&r| original.value(r, identifier).is_none())
        .count();
    if blank_ids > 0 {
        report.push(Check::warn(
            VALIDATOR,
            format!("{blank_ids} source rows have no {identifier} value"),
        ));
    }

    let mut missing = Vec::new();
    for r in 0..original.len() {
        let Some(id) = original.value(r, identifier) else { continue };
        let Some(row) = recovered.get(id) else { continue };
        for column in original.columns() {
            let Some(value) = original.value(r, column) else { continue };
            let back = pivoted.column_index(column).map(|c| &row[c]);
            if !back.is_some_and(|cell| cell.iter().any(|v| v == value)) {
                missing.push(format!("{id}/{column}: {value}"));
            }
        }
    }
    if missing.is_empty() {
        report.push(Check::pass(VALIDATOR, "every source value recovered"));
    } else {
        report.push(
            Check::warn(VALIDATOR, format!("{} source values not recovered", missing.len()))
                .with_details(missing),
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn original() -> Table {
        Table::new(
            vec!["ExperimentId".into(), "Temperature".into()],
            vec![
                vec!["EXP001".into(), "25.0".into()],
                vec!["EXP002".into(), "30.0".into()],
            ],
        )
    }

    fn pivoted(rows: &[(&str, &str)]) -> PivotTable {
        PivotTable {
            columns: vec!["ExperimentId".into(), "Temperature".into()],
            rows: rows
                .iter()
                .map(|(id, t)| vec![vec![(*id).to_owned()], vec![(*t).to_owned()]])
                .collect(),
            identifier: Some("ExperimentId".into()),
        }
    }

    #[test]
    fn faithful_pivot_passes_cleanly() {
        let report = validate(&original(), &pivoted(&[("EXP001", "25.0"), ("EXP002", "30.0")]), "ExperimentId");
        assert!(report.all_passed(), "{report}");
        assert_eq!(report.count(crate::Severity::Warning), 0);
    }

    #[test]
    fn lost_rows_fail() {
        let report = validate(&original(), &pivoted(&[("EXP001", "25.0")]), "ExperimentId");
        assert_eq!(report.failure_count(), 2);
    }

    #[test]
    fn changed_values_warn() {
        let report = validate(&original(), &pivoted(&[("EXP001", "25.0"), ("EXP002", "31.0")]), "ExperimentId");
        assert!(report.all_passed());
        assert_eq!(report.count(crate::Severity::Warning), 1);
    }
}
