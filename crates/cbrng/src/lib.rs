//! Counter-based random number generators.
//!
//! A counter-based generator is a keyed pure function from a 128-bit counter to
//! a 128-bit block. Nothing advances between calls: the output for a given
//! `(key, counter)` pair never changes, so streams can be split across threads
//! simply by handing out disjoint counter ranges.
//!
//! Two block functions are provided:
//! - [`Aes`]: full AES-128 (key expanded once at construction).
//! - [`Ars`]: the reduced-round ARS cipher whose key schedule is a Weyl
//!   sequence recomputed on every call.
//!
//! Both run on AES-NI when the CPU supports it and fall back to a portable
//! implementation with bit-identical results otherwise. [`CounterRng`] turns
//! either one into a [`rand::RngCore`].

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod aes;
mod ars;
mod engine;
mod error;
mod factory;
mod function;
mod lane;

pub use crate::aes::{Aes, Aes2x64, Aes4x32};
pub use crate::ars::{Ars, Ars2x64, Ars4x32};
pub use crate::engine::CounterRng;
pub use crate::error::{Error, Result};
pub use crate::factory::{build, Algorithm};
pub use crate::function::BlockFunction;
pub use crate::lane::Lane;
pub use cbrng_core::{hardware_available, Backend, Block};
