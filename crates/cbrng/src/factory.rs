//! Selection of a block function by name.

use core::fmt;
use core::str::FromStr;

use cbrng_core::Block;

use crate::aes::Aes4x32;
use crate::ars::Ars4x32;
use crate::error::Error;
use crate::function::BlockFunction;

/// The block functions that can be built at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// AES-128.
    Aes,
    /// ARS with 5 rounds.
    Ars5,
    /// ARS with 7 rounds.
    Ars7,
    /// ARS with 10 rounds.
    Ars10,
}

impl Algorithm {
    /// Every variant, in a stable order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Aes,
        Algorithm::Ars5,
        Algorithm::Ars7,
        Algorithm::Ars10,
    ];

    /// Round count of the cipher.
    pub fn rounds(self) -> u32 {
        match self {
            Algorithm::Aes => 10,
            Algorithm::Ars5 => 5,
            Algorithm::Ars7 => 7,
            Algorithm::Ars10 => 10,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Aes => "aes",
            Algorithm::Ars5 => "ars5",
            Algorithm::Ars7 => "ars7",
            Algorithm::Ars10 => "ars10",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "aes" => Ok(Algorithm::Aes),
            "ars5" => Ok(Algorithm::Ars5),
            "ars" | "ars7" => Ok(Algorithm::Ars7),
            "ars10" => Ok(Algorithm::Ars10),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Builds the named block function keyed with `key`.
pub fn build(algorithm: Algorithm, key: Block) -> Box<dyn BlockFunction> {
    tracing::debug!(%algorithm, "building block function");
    match algorithm {
        Algorithm::Aes => Box::new(Aes4x32::from_bytes(key)),
        Algorithm::Ars5 => Box::new(Ars4x32::<5>::from_bytes(key)),
        Algorithm::Ars7 => Box::new(Ars4x32::<7>::from_bytes(key)),
        Algorithm::Ars10 => Box::new(Ars4x32::<10>::from_bytes(key)),
    }
}
