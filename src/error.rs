//! Error types for scanning, metadata loading and input lookup.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems in a single source file. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("{file}:{line}: doc-comment block is never closed")]
    UnterminatedBlock { file: String, line: usize },

    #[error("{file}:{line}: declaration of `{name}` never closes its signature")]
    UnterminatedSignature {
        file: String,
        line: usize,
        name: String,
    },

    #[error("{file}:{line}: malformed {what} declaration")]
    MalformedHeader {
        file: String,
        line: usize,
        what: &'static str,
    },

    #[error("{file}:{line}: second class `{name}` in one file (strict mode)")]
    SecondClass {
        file: String,
        line: usize,
        name: String,
    },
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metadata for `{class}` must be an object of sections")]
    NotAnObject { class: String },

    #[error("metadata section `{class}.{section}`: {source}")]
    Section {
        class: String,
        section: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("function `{function}` is listed in both `{first}` and `{second}` of class `{class}`")]
    DuplicateFunction {
        class: String,
        function: String,
        first: String,
        second: String,
    },
}

/// Top-level library error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("unknown output format: {0} (expected markdown or json)")]
    UnknownFormat(String),

    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
