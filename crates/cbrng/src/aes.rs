//! AES-128 as a counter-based generator.

use core::marker::PhantomData;

use cbrng_core::{aes_encrypt, expand_round_keys, Aes128Key, Backend, Block, RoundKeys};
use rand::RngCore;

use crate::error::Result;
use crate::factory::Algorithm;
use crate::function::{switch_backend, BlockFunction};
use crate::lane::{collect_array, Lane};

/// AES-128 encryption of the counter under a fixed key.
///
/// The round keys are expanded once; clones share nothing and produce
/// identical output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aes<U: Lane = u32> {
    key: Aes128Key,
    round_keys: RoundKeys,
    backend: Backend,
    _lane: PhantomData<U>,
}

/// AES with four 32-bit lanes.
pub type Aes4x32 = Aes<u32>;
/// AES with two 64-bit lanes.
pub type Aes2x64 = Aes<u64>;

impl<U: Lane> Aes<U> {
    /// Creates a generator from a key in lane form.
    pub fn new(key: U::Array) -> Self {
        Self::from_bytes(U::pack(&key))
    }

    /// Creates a generator from raw key bytes.
    pub fn from_bytes(key: Block) -> Self {
        let backend = Backend::detect();
        let key = Aes128Key::from(key);
        Self {
            round_keys: expand_round_keys(backend, &key),
            key,
            backend,
            _lane: PhantomData,
        }
    }

    /// Creates a generator from the first lanes of `words`.
    pub fn from_words<I: IntoIterator<Item = U>>(words: I) -> Result<Self> {
        collect_array::<U, _>(words).map(|key| Self::new(key))
    }

    /// Draws a key from `rng`.
    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut key = [0u8; 16];
        rng.fill_bytes(&mut key);
        Self::from_bytes(key)
    }

    /// The key in lane form.
    pub fn key(&self) -> U::Array {
        U::unpack(self.key.as_bytes())
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

impl<U: Lane> BlockFunction for Aes<U> {
    fn generate_block(&self, counter: &Block) -> Block {
        aes_encrypt(self.backend, counter, &self.round_keys)
    }

    fn algorithm(&self) -> Option<Algorithm> {
        Some(Algorithm::Aes)
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
