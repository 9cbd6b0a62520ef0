use fairlinked::mapper::{self, MatchKind};
use fairlinked::pivot::template::{self, SOURCE_FILE_COLUMN};
use fairlinked::search;
use fairlinked::{ColumnMapper, Resolution, TermIndex, VariableMetadataModel};
use fairlinked_graph::{parser, vocab, NamespaceRegistry, Term};
use serde_json::json;

const ONTOLOGY: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix mds: <https://cwrusdle.bitbucket.io/mds/> .

mds:Temperature a owl:Class ;
    rdfs:label "Temperature" ;
    skos:altLabel "Temp" .

mds:Temperatures a owl:Class ;
    rdfs:label "Temperatures" .

mds:SampleID a owl:Class ;
    skos:altLabel "Sample ID" .

mds:Humidity a owl:Class ;
    rdfs:label "Relative Humidity" .
"#;

fn write_ontology(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("ontology.ttl");
    std::fs::write(&path, ONTOLOGY).expect("write ontology");
    path
}

#[test]
fn columns_resolve_exact_before_fuzzy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let index = TermIndex::from_path(&write_ontology(dir.path())).expect("index");
    assert_eq!(index.len(), 5);

    let mut mapper = ColumnMapper::new(&index);
    let annotations = mapper.annotate(&["temperatures", "sample_id", "Temprature", "Voltage"]);

    assert_eq!(annotations[0].fragment, "Temperatures");
    assert_eq!(annotations[0].kind, Some(MatchKind::Exact));
    assert_eq!(annotations[1].fragment, "SampleID");
    assert_eq!(annotations[1].kind, Some(MatchKind::Exact));
    assert_eq!(annotations[2].fragment, "Temperature");
    assert!(matches!(annotations[2].kind, Some(MatchKind::Fuzzy(score)) if score >= 0.8));
    assert_eq!(annotations[3].iri, None);
    assert_eq!(annotations[3].fragment, "Voltage");

    let log = mapper.into_log();
    assert_eq!(log.matched().len(), 3);
    assert_eq!(log.unmatched(), vec!["Voltage"]);

    let matched = dir.path().join("logs/matched.txt");
    let unmatched = dir.path().join("logs/unmatched.txt");
    log.write(&matched, &unmatched).expect("write logs");
    let text = std::fs::read_to_string(matched).expect("read");
    assert!(text.contains("temperatures => Temperatures"));
}

#[test]
fn unmatched_columns_still_get_metadata_entries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let index = TermIndex::from_path(&write_ontology(dir.path())).expect("index");
    let mut mapper = ColumnMapper::new(&index);
    let annotations = mapper.annotate(&["Temp", "Voltage"]);
    assert!(matches!(
        mapper::resolve("Temp", &index),
        Resolution::Matched(term, MatchKind::Exact) if term.iri.ends_with("Temperature")
    ));

    let model = VariableMetadataModel::from_annotations(&annotations);
    assert_eq!(model.len(), 2);
    assert!(model.get("Voltage").is_some());

    let template = mapper::metadata_template(
        &annotations,
        &NamespaceRegistry::standard(),
        "mds",
        "2025-01-28",
    );
    let nodes = template["@graph"].as_array().expect("graph array");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["@id"], "mds:Temperature");
    assert_eq!(nodes[1]["skos:altLabel"], "Voltage");
}

#[test]
fn keyword_search_over_an_rdf_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = parser::parse_file(&write_ontology(dir.path())).expect("parse");
    let details = search::extract_subject_details(&graph, &NamespaceRegistry::standard());
    assert_eq!(details.len(), 4);

    let hits = search::search_subjects(&details, &["humidty", "temp", "temperature"]);
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].searched_keyword, "humidty");
    assert!(hits[0].subject_id.ends_with("Humidity"));
    assert_eq!(hits[1].label, "Temp");
    assert!(hits[1].subject_id.ends_with("/Temperature"));
    assert!(hits[2].subject_id.ends_with("/Temperatures"));

    let out = dir.path().join("hits.csv");
    search::write_csv(&hits, &out).expect("write csv");
    let csv = std::fs::read_to_string(out).expect("read");
    assert!(csv.starts_with("searched_keyword,subject_id,label,info"));
}

#[test]
fn filled_templates_read_back_one_row_per_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let index = TermIndex::from_path(&write_ontology(dir.path())).expect("index");
    let mut mapper = ColumnMapper::new(&index);
    let annotations = mapper.annotate(&["Temp", "Voltage"]);
    let registry = NamespaceRegistry::standard();

    let filled = dir.path().join("filled");
    std::fs::create_dir(&filled).expect("mkdir");
    for (name, temp, volt) in [("run1", "25.0", "1.5"), ("run2", "30.0", "")] {
        let mut doc = mapper::metadata_template(&annotations, &registry, "mds", "2025-01-28");
        doc["@graph"][0]["qudt:value"] = json!([{ "@value": temp }]);
        doc["@graph"][1]["qudt:value"] = json!([{ "@value": volt }]);
        let path = filled.join(format!("{name}.jsonld"));
        std::fs::write(&path, doc.to_string()).expect("write template");
    }

    let graph = parser::parse_file(&filled.join("run1.jsonld")).expect("template parses");
    let dataset = Term::iri(format!("{}dataset", vocab::MDS));
    assert_eq!(
        graph.value(&dataset, vocab::DCTERMS_CREATED).map(Term::lexical),
        Some("2025-01-28")
    );

    let templates = template::parse_templates(&filled, &registry).expect("templates");
    let table = &templates.table;
    assert_eq!(table.columns, vec!["Temp", "Voltage", SOURCE_FILE_COLUMN]);
    assert_eq!(table.rows[0], vec![vec!["25.0"], vec!["1.5"], vec!["run1.jsonld"]]);
    assert_eq!(table.rows[1][1], Vec::<String>::new());
    assert_eq!(templates.headers.types["Temp"], "mds:Temperature");
    assert_eq!(templates.headers.types["Voltage"], "mds:Voltage");
}
