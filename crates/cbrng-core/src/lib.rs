//! 128-bit block primitives shared by the counter-based generators.
//!
//! This crate provides:
//! - Two interchangeable 128-bit value types behind [`Block128`]: [`Sw128`]
//!   (portable, byte oriented) and an AES-NI register type used internally
//!   when the CPU supports it.
//! - The AES round primitives (`aesenc`, `aesenclast`, `aeskeygenassist`,
//!   lane shifts and shuffles) with bit-identical results on both paths.
//! - Generic AES-128 and ARS kernels plus runtime backend dispatch.
//! - A FIPS-197 reference cipher used as an independent oracle.
//!
//! The software path aims for clarity and exactness rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod backend;
mod block;
#[cfg(target_arch = "x86_64")]
mod hw;
mod kernel;
mod key;
pub mod reference;
pub mod round;
mod sbox;

pub use crate::backend::{hardware_available, Backend};
pub use crate::block::{xor_in_place, Block, Block128, Sw128};
pub use crate::kernel::{aes_encrypt, ars_encrypt, expand_round_keys, WEYL_W0, WEYL_W1};
pub use crate::key::{Aes128Key, RoundKeys};
pub use crate::sbox::sbox;
