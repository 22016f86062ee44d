//! Counter-mode adapter from a block function to [`rand::RngCore`].

use cbrng_core::Block;
use rand::{RngCore, SeedableRng};
use rand_core::impls;

use crate::function::BlockFunction;

/// Sequential random numbers from a block function.
///
/// The 128-bit counter is split into a 64-bit block position (low half) and a
/// 64-bit stream id (high half). Each block yields four `u32` outputs, lane 0
/// first. Distinct stream ids with the same key give non-overlapping
/// sequences.
#[derive(Clone, Debug)]
pub struct CounterRng<G> {
    generator: G,
    position: u64,
    stream: u64,
    buffer: [u32; 4],
    index: usize,
}

impl<G: BlockFunction> CounterRng<G> {
    /// Starts at block 0 of stream 0.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            position: 0,
            stream: 0,
            buffer: [0; 4],
            index: 4,
        }
    }

    /// Moves to block 0 of `stream`.
    pub fn with_stream(mut self, stream: u64) -> Self {
        self.stream = stream;
        self.seek(0);
        self
    }

    /// Positions the engine at the start of `block`. Buffered output is
    /// dropped.
    pub fn seek(&mut self, block: u64) {
        self.position = block;
        self.index = 4;
    }

    /// Skips `blocks` whole blocks after the current one. Any partially
    /// consumed block is dropped.
    pub fn discard_blocks(&mut self, blocks: u64) {
        self.position = self.position.wrapping_add(blocks);
        self.index = 4;
    }

    /// Index of the next block to be generated.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The stream id.
    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// The underlying block function.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Mutable access, e.g. to change the backend.
    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    fn counter(&self) -> Block {
        ((u128::from(self.stream) << 64) | u128::from(self.position)).to_le_bytes()
    }

    fn refill(&mut self) {
        let out = self.generator.generate_block(&self.counter());
        for (word, chunk) in self.buffer.iter_mut().zip(out.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        self.position = self.position.wrapping_add(1);
        self.index = 0;
    }
}

impl<G: BlockFunction> RngCore for CounterRng<G> {
    fn next_u32(&mut self) -> u32 {
        if self.index >= self.buffer.len() {
            self.refill();
        }
        let value = self.buffer[self.index];
        self.index += 1;
        value
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<G: BlockFunction> SeedableRng for CounterRng<G> {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(G::from_key_bytes(seed))
    }
}
