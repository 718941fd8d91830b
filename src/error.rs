//! Errors from the input side of the tool.
//!
//! Inference and rendering are total and never produce these; only loading
//! and selecting documents can fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON from {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("failed to walk glob: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("glob pattern matched no files: {0}")]
    NoMatch(String),

    #[error("JSON pointer {pointer} selects nothing in {source_name}")]
    PointerMissing { pointer: String, source_name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
