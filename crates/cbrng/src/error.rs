use thiserror::Error;

/// Errors raised while configuring a generator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The hardware backend was requested on a CPU without AES instructions.
    #[error("hardware AES backend requested but the CPU does not support AES instructions")]
    Configuration,
    /// Not enough key material was supplied.
    #[error("key requires {expected} lanes, got {actual}")]
    KeyLength {
        /// Number of lanes the key needs.
        expected: usize,
        /// Number of lanes supplied.
        actual: usize,
    },
    /// An algorithm name did not match any known block function.
    #[error("unknown algorithm `{0}` (expected one of: aes, ars5, ars7, ars10)")]
    UnknownAlgorithm(String),
}

/// Result alias for generator configuration.
pub type Result<T> = std::result::Result<T, Error>;
