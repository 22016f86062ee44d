//! Mersenne Twister engines with jump-ahead and reversal.
//!
//! Every engine in the family is a linear recurrence over GF(2), so advancing
//! it by `p` steps is multiplication of its flattened state by `T^p`, where
//! `T` is the one-step transition matrix. This crate provides:
//!
//! - [`MersenneTwister`] over the parameter sets in [`params`], with seeding,
//!   stepping in both directions, `peek`, checkpoints and [`rand::RngCore`].
//! - [`Reverse`], which replays an engine's outputs backwards.
//! - [`BitMatrix`], a dense GF(2) matrix with products, powers and inversion.
//! - [`JumpCache`] over a [`MatrixStore`] ([`FileStore`] or [`MemoryStore`])
//!   so that expensive jump matrices are computed once and shared between
//!   processes.
//!
//! Short distances (up to [`JumpConfig::linear_limit`]) are stepped directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod config;
mod engine;
mod error;
mod jump;
mod matrix;
pub mod params;
mod reverse;
mod word;

pub use crate::cache::{Direction, FileStore, JumpCache, JumpKey, MatrixStore, MemoryStore};
pub use crate::config::{JumpConfig, CACHE_DIR_ENV, LINEAR_LIMIT_ENV};
pub use crate::engine::{LinearEngine, MersenneTwister};
pub use crate::error::{Error, Result};
pub use crate::jump::{default_cache, transition_matrix};
pub use crate::matrix::{words_for, BitMatrix, RawMatrix};
pub use crate::params::MtParams;
pub use crate::reverse::Reverse;
pub use crate::word::Word;

use crate::params::{
    MicroMtParams, Mt11213aParams, Mt11213bParams, Mt19937Params, Mt19937_64Params, Tt800Params,
};

/// 32-bit MT19937.
pub type Mt19937 = MersenneTwister<Mt19937Params>;
/// 64-bit MT19937.
pub type Mt19937_64 = MersenneTwister<Mt19937_64Params>;
/// MT11213, parameter set A.
pub type Mt11213a = MersenneTwister<Mt11213aParams>;
/// MT11213, parameter set B.
pub type Mt11213b = MersenneTwister<Mt11213bParams>;
/// TT800 twisted GFSR.
pub type Tt800 = MersenneTwister<Tt800Params>;
/// Two-word test engine.
pub type MicroMt = MersenneTwister<MicroMtParams>;
