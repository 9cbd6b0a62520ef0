//! IRI constants for the vocabularies FAIRLinked reads and writes.
//!
//! Every Data Cube graph is built from the RDF Data Cube (`qb:`), Dublin Core
//! terms (`dcterms:`), QUDT (`qudt:`, `unit:`) and SKOS terms listed here.

/// RDF namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDFS namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// OWL namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
/// XSD namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// SKOS namespace.
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
/// RDF Data Cube namespace.
pub const QB: &str = "http://purl.org/linked-data/cube#";
/// Dublin Core terms namespace.
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
/// Dublin Core elements namespace.
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
/// QUDT schema namespace.
pub const QUDT: &str = "http://qudt.org/schema/qudt/";
/// QUDT unit vocabulary namespace.
pub const UNIT: &str = "http://qudt.org/vocab/unit/";
/// QUDT quantity kind vocabulary namespace.
pub const QUANTITY_KIND: &str = "http://qudt.org/vocab/quantitykind/";
/// PROV-O namespace.
pub const PROV: &str = "http://www.w3.org/ns/prov#";
/// Materials Data Science ontology namespace.
pub const MDS: &str = "https://cwrusdle.bitbucket.io/mds/";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:langString`.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
/// `rdfs:label`.
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// `rdfs:comment`.
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
/// `owl:Class`.
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";

/// `skos:prefLabel`.
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
/// `skos:altLabel`.
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
/// `skos:hiddenLabel`.
pub const SKOS_HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";

/// `dcterms:title`.
pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
/// `dcterms:creator`.
pub const DCTERMS_CREATOR: &str = "http://purl.org/dc/terms/creator";
/// `dcterms:created`.
pub const DCTERMS_CREATED: &str = "http://purl.org/dc/terms/created";
/// `dcterms:subject`.
pub const DCTERMS_SUBJECT: &str = "http://purl.org/dc/terms/subject";
/// `dc:subject`.
pub const DC_SUBJECT: &str = "http://purl.org/dc/elements/1.1/subject";

/// `qb:DataSet`.
pub const QB_DATASET: &str = "http://purl.org/linked-data/cube#DataSet";
/// `qb:DataStructureDefinition`.
pub const QB_DATA_STRUCTURE_DEFINITION: &str =
    "http://purl.org/linked-data/cube#DataStructureDefinition";
/// `qb:ComponentSpecification`.
pub const QB_COMPONENT_SPECIFICATION: &str =
    "http://purl.org/linked-data/cube#ComponentSpecification";
/// `qb:DimensionProperty`.
pub const QB_DIMENSION_PROPERTY: &str = "http://purl.org/linked-data/cube#DimensionProperty";
/// `qb:MeasureProperty`.
pub const QB_MEASURE_PROPERTY: &str = "http://purl.org/linked-data/cube#MeasureProperty";
/// `qb:SliceKey`.
pub const QB_SLICE_KEY: &str = "http://purl.org/linked-data/cube#SliceKey";
/// `qb:Slice`.
pub const QB_SLICE: &str = "http://purl.org/linked-data/cube#Slice";
/// `qb:Observation`.
pub const QB_OBSERVATION: &str = "http://purl.org/linked-data/cube#Observation";
/// `qb:structure`.
pub const QB_STRUCTURE: &str = "http://purl.org/linked-data/cube#structure";
/// `qb:component`.
pub const QB_COMPONENT: &str = "http://purl.org/linked-data/cube#component";
/// `qb:dimension`.
pub const QB_DIMENSION: &str = "http://purl.org/linked-data/cube#dimension";
/// `qb:measure`.
pub const QB_MEASURE: &str = "http://purl.org/linked-data/cube#measure";
/// `qb:sliceKey`.
pub const QB_SLICE_KEY_PROP: &str = "http://purl.org/linked-data/cube#sliceKey";
/// `qb:componentProperty`.
pub const QB_COMPONENT_PROPERTY: &str = "http://purl.org/linked-data/cube#componentProperty";
/// `qb:slice`.
pub const QB_SLICE_PROP: &str = "http://purl.org/linked-data/cube#slice";
/// `qb:sliceStructure`.
pub const QB_SLICE_STRUCTURE: &str = "http://purl.org/linked-data/cube#sliceStructure";
/// `qb:observation`.
pub const QB_OBSERVATION_PROP: &str = "http://purl.org/linked-data/cube#observation";
/// `qb:dataSet`.
pub const QB_DATASET_PROP: &str = "http://purl.org/linked-data/cube#dataSet";
/// `qb:measureType`.
pub const QB_MEASURE_TYPE: &str = "http://purl.org/linked-data/cube#measureType";
/// `qb:concept`.
pub const QB_CONCEPT: &str = "http://purl.org/linked-data/cube#concept";

/// `qudt:value`.
pub const QUDT_VALUE: &str = "http://qudt.org/schema/qudt/value";
/// `qudt:hasUnit`.
pub const QUDT_HAS_UNIT: &str = "http://qudt.org/schema/qudt/hasUnit";
/// `qudt:hasQuantityKind`.
pub const QUDT_HAS_QUANTITY_KIND: &str = "http://qudt.org/schema/qudt/hasQuantityKind";

/// `mds:hasStudyStage`, the category annotation of a variable.
pub const MDS_HAS_STUDY_STAGE: &str = "https://cwrusdle.bitbucket.io/mds/hasStudyStage";
/// `mds:row`, the row key of a filled metadata template.
pub const MDS_ROW: &str = "https://cwrusdle.bitbucket.io/mds/row";

/// `xsd:string`.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:integer`.
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
/// `xsd:double`.
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
/// `xsd:boolean`.
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
/// `xsd:dateTime`.
pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
