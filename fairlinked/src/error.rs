//! Error type for the FAIRLinked library.

use std::path::PathBuf;

use fairlinked_graph::GraphError;

/// Errors raised by mapping, conversion and pivoting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Graph parsing, serialization or namespace failure.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Tabular input could not be read.
    #[error("failed to read table {}: {source}", path.display())]
    Table {
        /// CSV path.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Malformed metadata JSON.
    #[error("invalid metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed configuration file.
    #[error("invalid configuration {}: {message}", path.display())]
    Config {
        /// Configuration path.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A variable lacks a field and no provider could supply it.
    #[error("missing {field} for variable {variable}")]
    MissingMetadata {
        /// Variable (column) name.
        variable: String,
        /// Field that could not be completed.
        field: &'static str,
    },

    /// Nothing parseable was found under the pivot input.
    #[error("no valid RDF files found under {}", path.display())]
    NoValidFiles {
        /// Pivot input path.
        path: PathBuf,
    },

    /// Writing a Parquet, XLSX or CSV export failed.
    #[error("failed to export {}: {message}", path.display())]
    Export {
        /// Output path.
        path: PathBuf,
        /// Writer diagnostic.
        message: String,
    },
}

/// Result type for FAIRLinked operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an export error from any displayable writer error.
    pub fn export(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Export {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
