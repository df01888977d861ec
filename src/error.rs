//! Errors raised by the benchmark layer.
//!
//! The moments engine itself never fails; these cover persistence,
//! configuration, and combining results that belong to different
//! benchmarks.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unrepresentable JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a results file failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two results with different keys were merged or compared.
    #[error("measurements don't belong to the same benchmark: {expected} != {found}")]
    MismatchedBenchmark { expected: String, found: String },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn mismatched(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::MismatchedBenchmark {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
