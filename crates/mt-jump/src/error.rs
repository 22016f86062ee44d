use std::path::PathBuf;

use thiserror::Error;

/// Errors from engines, checkpoints and the jump-matrix cache.
#[derive(Debug, Error)]
pub enum Error {
    /// A cache file exists but does not hold a valid matrix of the expected
    /// shape.
    #[error("malformed jump-matrix file {path}: {reason}")]
    MalformedCacheFile {
        /// File that failed validation.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading or writing the cache failed for reasons unrelated to content.
    #[error("jump-matrix cache I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding a checkpoint failed.
    #[error("checkpoint serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    /// A state or checkpoint does not fit the engine it was loaded into.
    #[error("state mismatch: {0}")]
    StateMismatch(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration value for {key}: {reason}")]
    Config {
        /// Variable or field name.
        key: String,
        /// Parse failure.
        reason: String,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
