//! FAIRLinked: from lab tables to RDF Data Cubes and back.
//!
//! The crate covers the three halves of the FAIRLinked workflow:
//!
//! - **Interface**: [`ontology::TermIndex`] indexes the labels of an
//!   ontology, [`mapper::ColumnMapper`] resolves table columns against it
//!   (exact normalized label first, closest fuzzy label second), and
//!   [`search`] answers keyword queries over any RDF file.
//! - **Conversion**: [`cube`] turns a [`Table`] plus its
//!   [`VariableMetadataModel`] into QB graphs, written row by row, with
//!   CRADLE file names, or as a single dataset.
//! - **Pivot**: [`pivot`] reads those graphs (or any RDF) back into a wide
//!   table with variable metadata and exports it.
//!
//! # Conversion
//!
//! ```
//! use fairlinked::{ConversionContext, Table, VariableMetadataModel};
//! use fairlinked_graph::NamespaceRegistry;
//!
//! let table = Table::new(
//!     vec!["ExperimentId".into(), "Temperature".into()],
//!     vec![vec!["EXP001".into(), "25.0".into()]],
//! );
//! let metadata = VariableMetadataModel::from_json_str(
//!     r#"{"ExperimentId": {"IsMeasure": "NO"},
//!         "Temperature": {"IsMeasure": "YES", "Unit": "unit:DEG_C"}}"#,
//! )?;
//! let registry = NamespaceRegistry::standard();
//! let ctx = ConversionContext::new(&registry, "mds", "0000-0001-2345-6789", "20250128120000");
//! let graph = fairlinked::cube::dataset_graph(&table, &metadata, &ctx, "demo")?;
//! assert!(!graph.subjects_of_type(fairlinked_graph::vocab::QB_SLICE).is_empty());
//! # Ok::<(), fairlinked::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod completion;
pub mod config;
pub mod cube;
pub mod error;
pub mod fuzzy;
pub mod mapper;
pub mod metadata;
pub mod ontology;
pub mod pivot;
pub mod search;
pub mod table;

pub use completion::{FieldCompletion, Prompt, PromptCompletion, UnitVocabulary};
pub use config::ConversionConfig;
pub use cube::{ConversionContext, ConversionSummary, OutputFolders};
pub use error::{Error, Result};
pub use mapper::{ColumnMapper, Resolution};
pub use metadata::{VariableMetadata, VariableMetadataModel};
pub use ontology::TermIndex;
pub use pivot::{Pivot, PivotMetadata, PivotTable};
pub use table::Table;
