#![allow(dead_code)]

use fairlinked::{ConversionContext, Table, VariableMetadataModel};
use fairlinked_graph::NamespaceRegistry;

pub const ORCID: &str = "0000-0001-2345-6789";
pub const TIMESTAMP: &str = "20250128120000";

pub const METADATA_JSON: &str = r#"{
    "ExperimentId": {"IsMeasure": "NO", "Category": "Sample"},
    "Temperature": {"IsMeasure": "YES", "Unit": "unit:DEG_C", "Category": "Result"},
    "Pressure": {"IsMeasure": "YES", "Unit": ["unit:PA"], "Category": "Result"},
    "Operator": {"IsMeasure": "NO"}
}"#;

pub fn table() -> Table {
    let csv = "ExperimentId,Temperature,Pressure,Operator\n\
               EXP001,25.0,101325,alice\n\
               EXP002,30.5,101300,bob\n\
               EXP003,35.0,,carol\n";
    Table::from_reader(csv.as_bytes()).expect("fixture table")
}

pub fn metadata() -> VariableMetadataModel {
    VariableMetadataModel::from_json_str(METADATA_JSON).expect("fixture metadata")
}

pub fn context(registry: &NamespaceRegistry) -> ConversionContext<'_> {
    ConversionContext::new(registry, "mds", ORCID, TIMESTAMP)
}

pub fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
