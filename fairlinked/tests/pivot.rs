mod common;

use fairlinked::cube;
use fairlinked::pivot::{self, SUBJECT_COLUMN};
use fairlinked::{Table, VariableMetadata, VariableMetadataModel};
use fairlinked_graph::NamespaceRegistry;

use common::{context, metadata, table};

#[test]
fn pivot_recovers_converted_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = NamespaceRegistry::standard();
    cube::convert_row_by_row(&table(), &metadata(), &context(&registry), dir.path())
        .expect("conversion");

    let result = pivot::parse(&dir.path().join("ttl"), &registry).expect("pivot");
    let table = &result.table;
    assert_eq!(table.len(), 3);
    assert_eq!(table.identifier.as_deref(), Some("ExperimentId"));
    assert_eq!(table.columns[0], "ExperimentId");
    let ids: Vec<&str> = table
        .column("ExperimentId")
        .map(|cell| cell[0].as_str())
        .collect();
    assert_eq!(ids, vec!["EXP001", "EXP002", "EXP003"]);

    let temperature: Vec<&[String]> = table.column("Temperature").collect();
    assert_eq!(temperature[1], ["30.5".to_owned()]);
    let pressure: Vec<&[String]> = table.column("Pressure").collect();
    assert!(pressure[2].is_empty());

    let temp = &result.metadata["Temperature"];
    assert!(temp.is_measure);
    assert_eq!(temp.category.as_deref(), Some("Result"));
    assert!(temp.units.contains("unit:DEG_C"));
    assert!(!result.metadata["ExperimentId"].is_measure);
    assert_eq!(result.stats.files, 3);
    assert_eq!(result.stats.parsed, 3);
}

#[test]
fn pivot_reads_whole_dataset_file_and_exports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = NamespaceRegistry::standard();
    let summary = cube::convert_entire_dataset(
        &table(),
        &metadata(),
        &context(&registry),
        "TestDataset",
        &cube::OutputFolders::under(dir.path()),
    )
    .expect("conversion");

    let result = pivot::parse(&summary.artifacts[0].jsonld, &registry).expect("pivot");
    assert_eq!(result.table.len(), 3);

    let out = dir.path().join("out");
    let paths = pivot::export(
        &result.table,
        &result.metadata,
        &out.join("table.parquet"),
        &out.join("metadata.json"),
    )
    .expect("export");
    let csv = std::fs::read_to_string(&paths.csv).expect("read csv");
    assert!(csv.starts_with("ExperimentId,"));
    assert_eq!(csv.lines().count(), 4);
    let meta: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(paths.metadata).expect("read")).expect("json");
    assert_eq!(meta["Temperature"]["IsMeasure"], "Yes");
}

#[test]
fn pivot_of_an_output_root_counts_each_graph_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = NamespaceRegistry::standard();
    cube::convert_entire_dataset(
        &table(),
        &metadata(),
        &context(&registry),
        "TestDataset",
        &cube::OutputFolders::under(dir.path()),
    )
    .expect("conversion");

    let result = pivot::parse(dir.path(), &registry).expect("pivot");
    assert_eq!(result.stats.files, 1);
    assert_eq!(result.table.len(), 3);
    let ids: Vec<&str> = result
        .table
        .column("ExperimentId")
        .map(|cell| cell[0].as_str())
        .collect();
    assert_eq!(ids, vec!["EXP001", "EXP002", "EXP003"]);

    let rows = dir.path().join("rows");
    cube::convert_row_by_row(&table(), &metadata(), &context(&registry), &rows).expect("rows");
    let result = pivot::parse(&rows, &registry).expect("pivot");
    assert_eq!(result.table.len(), 3);
}

#[test]
fn columns_with_the_same_slug_pivot_separately() {
    let registry = NamespaceRegistry::standard();
    let table = Table::new(
        vec!["ExperimentId".into(), "Temp (C)".into(), "Temp [C]".into()],
        vec![vec!["EXP001".into(), "1".into(), "2".into()]],
    );
    let mut metadata = VariableMetadataModel::new();
    metadata.insert(VariableMetadata::new("ExperimentId"));
    metadata.insert(VariableMetadata::measure("Temp (C)", "unit:DEG_C"));
    metadata.insert(VariableMetadata::measure("Temp [C]", "unit:DEG_C"));
    let graph = cube::dataset_graph(&table, &metadata, &context(&registry), "TestDataset")
        .expect("graph");

    let (pivoted, _) = pivot::pivot(&graph, &registry);
    assert_eq!(pivoted.columns, vec!["ExperimentId", "Temp (C)", "Temp [C]"]);
    assert_eq!(pivoted.rows[0], vec![vec!["EXP001"], vec!["1"], vec!["2"]]);
}

#[test]
fn generic_graphs_pivot_by_subject() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("plain.ttl"),
        "@prefix ex: <http://example.org/> .\n\
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
         ex:a rdfs:label \"A\" .\n\
         ex:b rdfs:label \"B\", \"Bee\" .\n",
    )
    .expect("write");
    std::fs::write(dir.path().join("broken.nt"), "not n-triples").expect("write");

    let result = pivot::parse(dir.path(), &NamespaceRegistry::standard()).expect("pivot");
    assert_eq!(result.stats.files, 2);
    assert_eq!(result.stats.parsed, 1);
    assert_eq!(result.table.identifier.as_deref(), Some(SUBJECT_COLUMN));
    let labels: Vec<&[String]> = result.table.column("rdfs:label").collect();
    assert_eq!(labels[1].len(), 2);
}
