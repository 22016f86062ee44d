//! ARS: reduced-round AES with a Weyl-sequence key schedule.

use core::marker::PhantomData;

use cbrng_core::{ars_encrypt, Backend, Block};
use rand::RngCore;

use crate::error::Result;
use crate::factory::Algorithm;
use crate::function::{switch_backend, BlockFunction};
use crate::lane::{collect_array, Lane};

/// ARS-`R` over the counter. `R` defaults to 7; `R = 0` does not compile.
///
/// Only the raw key is stored. The round keys are `key + i * W` per 64-bit
/// lane, with `W` = ([`cbrng_core::WEYL_W0`], [`cbrng_core::WEYL_W1`]), and
/// are regenerated on each call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ars<U: Lane = u32, const R: u32 = 7> {
    key: Block,
    backend: Backend,
    _lane: PhantomData<U>,
}

/// ARS with four 32-bit lanes.
pub type Ars4x32<const R: u32 = 7> = Ars<u32, R>;
/// ARS with two 64-bit lanes.
pub type Ars2x64<const R: u32 = 7> = Ars<u64, R>;

impl<U: Lane, const R: u32> Ars<U, R> {
    const ROUNDS_NONZERO: () = assert!(R > 0, "ARS needs at least one round");

    /// Number of rounds.
    pub const ROUNDS: u32 = R;

    /// Creates a generator from a key in lane form.
    pub fn new(key: U::Array) -> Self {
        Self::from_bytes(U::pack(&key))
    }

    /// Creates a generator from raw key bytes.
    pub fn from_bytes(key: Block) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ROUNDS_NONZERO;
        Self {
            key,
            backend: Backend::detect(),
            _lane: PhantomData,
        }
    }

    /// Creates a generator from the first lanes of `words`.
    pub fn from_words<I: IntoIterator<Item = U>>(words: I) -> Result<Self> {
        collect_array::<U, _>(words).map(|key| Self::new(key))
    }

    /// Draws a key from `rng`.
    pub fn from_rng<G: RngCore + ?Sized>(rng: &mut G) -> Self {
        let mut key = [0u8; 16];
        rng.fill_bytes(&mut key);
        Self::from_bytes(key)
    }

    /// The key in lane form.
    pub fn key(&self) -> U::Array {
        U::unpack(&self.key)
    }

    /// Encrypts `counter`.
    pub fn generate(&self, counter: U::Array) -> U::Array {
        U::unpack(&self.generate_block(&U::pack(&counter)))
    }

    /// Backend currently used for evaluation.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// See [`BlockFunction::set_hardware_mode`].
    pub fn set_hardware_mode(&mut self, enabled: bool) -> Result<bool> {
        switch_backend(&mut self.backend, enabled)
    }
}

impl<U: Lane, const R: u32> BlockFunction for Ars<U, R> {
    fn generate_block(&self, counter: &Block) -> Block {
        ars_encrypt(self.backend, counter, &self.key, R)
    }

    fn algorithm(&self) -> Option<Algorithm> {
        match R {
            5 => Some(Algorithm::Ars5),
            7 => Some(Algorithm::Ars7),
            10 => Some(Algorithm::Ars10),
            _ => None,
        }
    }

    fn backend(&self) -> Backend {
        self.backend
    }

    fn set_hardware_mode(&mut self, enabled: bool) -> Result<bool> {
        switch_backend(&mut self.backend, enabled)
    }

    fn from_key_bytes(key: Block) -> Self {
        Self::from_bytes(key)
    }
}
