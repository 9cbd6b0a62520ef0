use fairlinked::cube::{self, OutputFolders};
use fairlinked::{pivot, ConversionContext, Table, VariableMetadataModel};
use fairlinked_conformance::validators::roundtrip;
use fairlinked_conformance::{run_all, OutputPaths};
use fairlinked_graph::NamespaceRegistry;

fn table() -> Table {
    let csv = "ExperimentId,Temperature,Yield\n\
               EXP001,25.0,0.81\n\
               EXP002,30.5,0.77\n\
               EXP003,35.0,0.92\n";
    Table::from_reader(csv.as_bytes()).expect("fixture table")
}

fn metadata() -> VariableMetadataModel {
    VariableMetadataModel::from_json_str(
        r#"{"ExperimentId": {"IsMeasure": "NO"},
            "Temperature": {"IsMeasure": "YES", "Unit": "unit:DEG_C"},
            "Yield": {"IsMeasure": true, "Unit": "unit:PERCENT"}}"#,
    )
    .expect("fixture metadata")
}

#[test]
fn row_by_row_output_conforms_and_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = NamespaceRegistry::standard();
    let ctx = ConversionContext::new(&registry, "mds", "0000-0001-2345-6789", "20250128120000");
    cube::convert_row_by_row(&table(), &metadata(), &ctx, dir.path()).expect("conversion");

    let report = run_all(&OutputPaths {
        root: dir.path().to_path_buf(),
        expected_slices: Some(1),
        cradle: false,
    })
    .expect("validation");
    assert!(report.all_passed(), "{report}");

    let pivoted = pivot::parse(&dir.path().join("ttl"), &registry).expect("pivot");
    let report = roundtrip::validate(&table(), &pivoted.table, "ExperimentId");
    assert!(report.all_passed(), "{report}");
    assert_eq!(report.count(fairlinked_conformance::Severity::Warning), 0, "{report}");
}

#[test]
fn cradle_output_passes_naming_check() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = NamespaceRegistry::standard();
    let ctx = ConversionContext::new(&registry, "mds", "0000-0001-2345-6789", "20250128120000");
    cube::convert_row_by_row_cradle(&table(), &metadata(), &ctx, dir.path()).expect("conversion");

    let report = run_all(&OutputPaths {
        root: dir.path().to_path_buf(),
        expected_slices: Some(1),
        cradle: true,
    })
    .expect("validation");
    assert!(report.all_passed(), "{report}");
}

#[test]
fn whole_dataset_output_holds_every_slice() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = NamespaceRegistry::standard();
    let ctx = ConversionContext::new(&registry, "mds", "0000-0001-2345-6789", "20250128120000");
    cube::convert_entire_dataset(&table(), &metadata(), &ctx, "Trial", &OutputFolders::under(dir.path()))
        .expect("conversion");

    let report = run_all(&OutputPaths {
        root: dir.path().to_path_buf(),
        expected_slices: Some(3),
        cradle: false,
    })
    .expect("validation");
    assert!(report.all_passed(), "{report}");

    let standard = run_all(&OutputPaths {
        root: dir.path().to_path_buf(),
        expected_slices: Some(3),
        cradle: true,
    })
    .expect("validation");
    assert!(!standard.all_passed());
}
