//! Error type for graph parsing, serialization and IO.

use std::path::PathBuf;

/// Errors raised by the graph layer.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Malformed RDF input.
    #[error("failed to parse {format} input: {message}")]
    Parse {
        /// Serialization family being parsed.
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },

    /// File extension does not map to a known RDF serialization.
    #[error("cannot guess RDF format of {}", path.display())]
    UnknownFormat {
        /// Offending path.
        path: PathBuf,
    },

    /// A prefixed name used a prefix with no binding.
    #[error("undefined namespace prefix: {0}")]
    UndefinedPrefix(String),

    /// A namespace table tried to bind one prefix to two base URIs.
    #[error("prefix {prefix} already bound to {existing}, refusing {requested}")]
    PrefixConflict {
        /// Prefix in question.
        prefix: String,
        /// Base URI already bound.
        existing: String,
        /// Base URI that was rejected.
        requested: String,
    },

    /// Filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Namespace CSV could not be read.
    #[error("namespace table error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON document could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    /// Creates a parse error.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Wraps an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
