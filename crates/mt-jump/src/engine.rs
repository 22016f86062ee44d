//! The Mersenne Twister engine over a circular window of `n` words.
//!
//! The window `W[0..n]` is read from `state` starting at `index`. `W[0]` is
//! the word whose tempered value is the next output; a forward step replaces
//! it with `twist(W[0], W[1], W[m])`, which becomes the new `W[n-1]`.

use std::io::{Read, Write};
use std::marker::PhantomData;

use num_traits::{One, WrappingAdd, WrappingMul, WrappingSub, Zero};
use rand::RngCore;
use rand_core::impls;
use serde::{Deserialize, Serialize};

use crate::cache::{Direction, JumpCache, JumpKey, MatrixStore};
use crate::error::{Error, Result};
use crate::jump::{default_cache, transition_matrix};
use crate::matrix::{words_for, BitMatrix};
use crate::params::MtParams;
use crate::word::Word;

/// Stepping, reversal and look-ahead shared by the engines and their
/// [`crate::Reverse`] adapters.
pub trait LinearEngine: Clone {
    /// Output word type.
    type Output: Word;

    /// Returns the next output and advances by one step.
    fn next_word(&mut self) -> Self::Output;

    /// Steps back once and returns the output that step had produced, so
    /// `next_word` followed by `previous_word` restores the state and returns
    /// the same value twice.
    fn previous_word(&mut self) -> Self::Output;

    /// Advances by `steps` outputs.
    fn discard(&mut self, steps: u64);

    /// Steps back by `steps` outputs.
    fn reverse_discard(&mut self, steps: u64);

    /// Output at a relative position without changing the state.
    ///
    /// `peek(1)` is what `next_word` would return; `peek(0)` is the most
    /// recent output (what `previous_word` would return); `peek(-k)` looks `k`
    /// further back.
    fn peek(&self, offset: i64) -> Self::Output {
        let mut probe = self.clone();
        if offset >= 1 {
            probe.discard(offset.unsigned_abs() - 1);
            probe.next_word()
        } else {
            probe.reverse_discard(offset.unsigned_abs());
            probe.previous_word()
        }
    }

    /// Equivalent to `peek(-offset)` for any `u64` offset.
    fn reverse_peek(&self, offset: u64) -> Self::Output {
        let mut probe = self.clone();
        probe.reverse_discard(offset);
        probe.previous_word()
    }
}

/// A Mersenne Twister with the parameters of `C`.
pub struct MersenneTwister<C: MtParams> {
    state: Vec<C::Word>,
    index: usize,
    _params: PhantomData<C>,
}

#[derive(Serialize, Deserialize)]
struct Checkpoint {
    engine: String,
    word_bits: u32,
    state: Vec<u64>,
}

impl<C: MtParams> MersenneTwister<C> {
    /// Bits in the flattened window.
    pub const STATE_BITS: usize = C::N * C::W as usize;

    /// Seeds with the standard single-word initialization,
    /// `x[i] = f * (x[i-1] ^ (x[i-1] >> (w-2))) + i`.
    pub fn new(seed: C::Word) -> Self {
        let mut engine = Self::from_window(Self::initial_fill(seed));
        engine.step_forward_n(C::N);
        engine
    }

    /// Seeds from a word sequence with `init_by_array`. An empty sequence
    /// falls back to the default seed and a single word to [`Self::new`].
    pub fn from_seed_sequence<I>(seeds: I) -> Self
    where
        I: IntoIterator<Item = C::Word>,
    {
        let key: Vec<C::Word> = seeds.into_iter().collect();
        match key.as_slice() {
            [] => Self::new(C::DEFAULT_SEED),
            [seed] => Self::new(*seed),
            _ => {
                let mut engine = Self::from_window(Self::init_by_array(&key));
                engine.step_forward_n(C::N);
                engine
            }
        }
    }

    /// Restores an engine from a window in output order (`state()[0]` is the
    /// next word to be tempered). The bits of `W[0]` that the recurrence
    /// determines are overwritten so that the engine can step backwards
    /// consistently.
    pub fn from_state(words: &[C::Word]) -> Result<Self> {
        if words.len() != C::N {
            return Err(Error::StateMismatch(format!(
                "{} needs {} words, got {}",
                C::NAME,
                C::N,
                words.len()
            )));
        }
        let mut engine = Self::from_window(words.to_vec());
        engine.correct();
        Ok(engine)
    }

    /// The window in output order.
    pub fn state(&self) -> Vec<C::Word> {
        (0..C::N).map(|j| self.at(j)).collect()
    }

    /// Writes a bincode checkpoint.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let checkpoint = Checkpoint {
            engine: C::NAME.to_string(),
            word_bits: C::W,
            state: self.state().into_iter().map(Word::as_u64).collect(),
        };
        bincode::serialize_into(writer, &checkpoint)?;
        Ok(())
    }

    /// Reads a checkpoint written by [`Self::to_writer`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let checkpoint: Checkpoint = bincode::deserialize_from(reader)?;
        if checkpoint.engine != C::NAME || checkpoint.word_bits != C::W {
            return Err(Error::StateMismatch(format!(
                "checkpoint is for {} ({}-bit), expected {} ({}-bit)",
                checkpoint.engine,
                checkpoint.word_bits,
                C::NAME,
                C::W
            )));
        }
        let words: Vec<C::Word> = checkpoint.state.into_iter().map(C::Word::truncate_from).collect();
        Self::from_state(&words)
    }

    /// Advances by `steps`, stepping one at a time up to the cache's linear
    /// limit and through a cached jump matrix beyond it.
    pub fn discard_with<S: MatrixStore>(&mut self, cache: &JumpCache<S>, steps: u64) -> Result<()> {
        self.jump_with(cache, Direction::Forward, steps)
    }

    /// Steps back by `steps`, as [`Self::discard_with`] does forwards.
    pub fn reverse_discard_with<S: MatrixStore>(
        &mut self,
        cache: &JumpCache<S>,
        steps: u64,
    ) -> Result<()> {
        self.jump_with(cache, Direction::Reverse, steps)
    }

    /// Cache key of the jump matrix for `steps` in `direction`.
    pub fn jump_key(direction: Direction, steps: u64) -> JumpKey {
        JumpKey::new(C::NAME, direction, steps, Self::STATE_BITS)
    }

    /// Computes the jump matrix `T^steps` (or the inverse step's power)
    /// without consulting any cache.
    pub fn jump_matrix(direction: Direction, steps: u64) -> BitMatrix {
        transition_matrix::<C>(direction).pow(steps)
    }

    /// The window flattened to a bit vector: bit `b` of `W[j]` is bit
    /// `j * w + b`.
    pub fn to_bits(&self) -> Vec<u64> {
        let w = C::W as usize;
        let mut bits = vec![0u64; words_for(Self::STATE_BITS)];
        for j in 0..C::N {
            let offset = j * w;
            bits[offset / 64] |= self.at(j).as_u64() << (offset % 64);
        }
        bits
    }

    /// Inverse of [`Self::to_bits`]; no consistency correction is applied.
    pub(crate) fn from_bits(bits: &[u64]) -> Self {
        let w = C::W as usize;
        let mask = if w == 64 { u64::MAX } else { (1u64 << w) - 1 };
        let window = (0..C::N)
            .map(|j| {
                let offset = j * w;
                C::Word::truncate_from((bits[offset / 64] >> (offset % 64)) & mask)
            })
            .collect();
        Self::from_window(window)
    }

    /// One forward step of the recurrence, without tempering.
    pub(crate) fn step_forward(&mut self) {
        let n = C::N;
        let i = self.index;
        let next = Self::twist(self.state[i], self.state[(i + 1) % n], self.state[(i + C::M) % n]);
        self.state[i] = next;
        self.index = (i + 1) % n;
    }

    /// One backward step: recovers the word that preceded `W[0]`.
    pub(crate) fn step_backward(&mut self) {
        let (n, m) = (C::N, C::M);
        let t1 = Self::untwist(self.at(n - 1) ^ self.at(m - 1));
        let previous = if C::R == 0 {
            t1
        } else {
            let t0 = Self::untwist(self.at(n - 2) ^ self.at(m - 2));
            (t1 & Self::upper_mask()) | (t0 & Self::lower_mask())
        };
        self.index = (self.index + n - 1) % n;
        self.state[self.index] = previous;
    }

    fn from_window(state: Vec<C::Word>) -> Self {
        debug_assert_eq!(state.len(), C::N);
        Self {
            state,
            index: 0,
            _params: PhantomData,
        }
    }

    fn at(&self, j: usize) -> C::Word {
        self.state[(self.index + j) % C::N]
    }

    fn upper_mask() -> C::Word {
        (!C::Word::zero()).shl_or_zero(C::R)
    }

    fn lower_mask() -> C::Word {
        !Self::upper_mask()
    }

    fn twist(xk: C::Word, xk1: C::Word, xkm: C::Word) -> C::Word {
        let y = (xk & Self::upper_mask()) | (xk1 & Self::lower_mask());
        let odd = y & C::Word::one() == C::Word::one();
        let shifted = xkm ^ (y >> 1);
        if odd {
            shifted ^ C::A
        } else {
            shifted
        }
    }

    /// Inverts `y -> (y >> 1) ^ (odd(y) * a)`; the top bit of `a` tells the
    /// two cases apart.
    fn untwist(v: C::Word) -> C::Word {
        let top = C::Word::one() << (C::W as usize - 1);
        if v & top == top {
            ((v ^ C::A) << 1) | C::Word::one()
        } else {
            v << 1
        }
    }

    fn temper(x: C::Word) -> C::Word {
        let mut y = x;
        y = y ^ (y.shr_or_zero(C::U) & C::D);
        y = y ^ (y.shl_or_zero(C::S) & C::B);
        y = y ^ (y.shl_or_zero(C::T) & C::C);
        y ^ y.shr_or_zero(C::L)
    }

    fn correct(&mut self) {
        if C::R == 0 {
            return;
        }
        let (n, m) = (C::N, C::M);
        let t = Self::untwist(self.at(n - 1) ^ self.at(m - 1));
        let i = self.index;
        self.state[i] = (self.state[i] & Self::upper_mask()) | (t & Self::lower_mask());
    }

    fn step_forward_n(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step_forward();
        }
    }

    fn initial_fill(seed: C::Word) -> Vec<C::Word> {
        let shift = C::W - 2;
        let mut words = Vec::with_capacity(C::N);
        let mut x = seed;
        words.push(x);
        for i in 1..C::N {
            x = C::F
                .wrapping_mul(&(x ^ x.shr_or_zero(shift)))
                .wrapping_add(&C::Word::truncate_from(i as u64));
            words.push(x);
        }
        words
    }

    fn init_by_array(key: &[C::Word]) -> Vec<C::Word> {
        let n = C::N;
        let shift = C::W - 2;
        let mut mt = Self::initial_fill(C::MULTI_SEED);
        let mut i = 1usize;
        let mut j = 0usize;

        for _ in 0..n.max(key.len()) {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ prev.shr_or_zero(shift)).wrapping_mul(&C::G1))
                .wrapping_add(&key[j])
                .wrapping_add(&C::Word::truncate_from(j as u64));
            i += 1;
            j += 1;
            if i >= n {
                mt[0] = mt[n - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..n - 1 {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ prev.shr_or_zero(shift)).wrapping_mul(&C::G2))
                .wrapping_sub(&C::Word::truncate_from(i as u64));
            i += 1;
            if i >= n {
                mt[0] = mt[n - 1];
                i = 1;
            }
        }
        mt[0] = C::Word::one() << (C::W as usize - 1);
        mt
    }

    fn jump_with<S: MatrixStore>(
        &mut self,
        cache: &JumpCache<S>,
        direction: Direction,
        steps: u64,
    ) -> Result<()> {
        if steps <= cache.linear_limit() {
            self.step_linear(direction, steps);
            return Ok(());
        }
        let key = Self::jump_key(direction, steps);
        let matrix = cache.get_or_compute(&key, || Self::jump_matrix(direction, steps))?;
        self.apply_matrix(&matrix);
        Ok(())
    }

    fn step_linear(&mut self, direction: Direction, steps: u64) {
        for _ in 0..steps {
            match direction {
                Direction::Forward => self.step_forward(),
                Direction::Reverse => self.step_backward(),
            }
        }
    }

    fn apply_matrix(&mut self, matrix: &BitMatrix) {
        *self = Self::from_bits(&matrix.apply(&self.to_bits()));
    }

    fn jump_or_compute(&mut self, direction: Direction, steps: u64) {
        let cache = default_cache();
        if steps <= cache.linear_limit() {
            self.step_linear(direction, steps);
            return;
        }
        let key = Self::jump_key(direction, steps);
        let matrix = match cache.fetch_or_compute(&key, || Self::jump_matrix(direction, steps)) {
            Ok((matrix, None)) => matrix,
            Ok((matrix, Some(err))) => {
                tracing::warn!(
                    engine = C::NAME,
                    %direction,
                    steps,
                    %err,
                    "jump matrix computed but not cached"
                );
                matrix
            }
            Err(err) => {
                tracing::warn!(
                    engine = C::NAME,
                    %direction,
                    steps,
                    %err,
                    "jump cache unreadable, computing matrix in memory"
                );
                Self::jump_matrix(direction, steps)
            }
        };
        self.apply_matrix(&matrix);
    }
}

impl<C: MtParams> LinearEngine for MersenneTwister<C> {
    type Output = C::Word;

    fn next_word(&mut self) -> C::Word {
        let out = Self::temper(self.state[self.index]);
        self.step_forward();
        out
    }

    fn previous_word(&mut self) -> C::Word {
        self.step_backward();
        Self::temper(self.state[self.index])
    }

    /// Uses the process-wide cache from [`crate::JumpConfig::from_env`]. If
    /// the cache cannot be read or written the matrix is computed in memory.
    fn discard(&mut self, steps: u64) {
        self.jump_or_compute(Direction::Forward, steps);
    }

    fn reverse_discard(&mut self, steps: u64) {
        self.jump_or_compute(Direction::Reverse, steps);
    }
}

impl<C: MtParams> Default for MersenneTwister<C> {
    fn default() -> Self {
        Self::new(C::DEFAULT_SEED)
    }
}

impl<C: MtParams> Clone for MersenneTwister<C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            index: self.index,
            _params: PhantomData,
        }
    }
}

impl<C: MtParams> core::fmt::Debug for MersenneTwister<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MersenneTwister")
            .field("engine", &C::NAME)
            .field("next", &self.at(0))
            .finish_non_exhaustive()
    }
}

impl<C: MtParams> PartialEq for MersenneTwister<C> {
    fn eq(&self, other: &Self) -> bool {
        (0..C::N).all(|j| self.at(j) == other.at(j))
    }
}

impl<C: MtParams> Eq for MersenneTwister<C> {}

impl<C: MtParams> RngCore for MersenneTwister<C> {
    fn next_u32(&mut self) -> u32 {
        self.next_word().as_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        if C::W >= 64 {
            self.next_word().as_u64()
        } else {
            impls::next_u64_via_u32(self)
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Mt11213aParams, Mt19937Params, MicroMtParams, Tt800Params};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    type Mt = MersenneTwister<Mt19937Params>;

    #[test]
    fn next_then_previous_restores_state() {
        let mut engine = Mt::new(12345);
        for _ in 0..1000 {
            engine.next_word();
        }
        let before = engine.clone();
        let out = engine.next_word();
        assert_eq!(engine.previous_word(), out);
        assert_eq!(engine, before);
    }

    #[test]
    fn window_bits_roundtrip() {
        let engine = MersenneTwister::<Tt800Params>::new(99);
        let restored = MersenneTwister::<Tt800Params>::from_bits(&engine.to_bits());
        assert_eq!(restored, engine);
    }

    #[test]
    fn correct_is_a_no_op_on_generated_states() {
        let mut engine = MersenneTwister::<Mt11213aParams>::new(7);
        engine.discard_with(&JumpCache::in_memory(u64::MAX), 500).unwrap();
        let restored = MersenneTwister::<Mt11213aParams>::from_state(&engine.state()).unwrap();
        assert_eq!(restored, engine);
    }

    #[test]
    fn from_state_fixes_low_bits_of_oldest_word() {
        let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
        let raw: Vec<u32> = (0..624).map(|_| rng.next_u32()).collect();
        let mut engine = Mt::from_state(&raw).unwrap();
        let state = engine.state();
        assert_eq!(state[0] & 0x8000_0000, raw[0] & 0x8000_0000);
        assert_eq!(&state[1..], &raw[1..]);

        let reference = engine.clone();
        let outputs: Vec<u32> = (0..700).map(|_| engine.next_word()).collect();
        for expected in outputs.iter().rev() {
            assert_eq!(engine.previous_word(), *expected);
        }
        assert_eq!(engine, reference);
    }

    #[test]
    fn wrong_state_length_is_rejected() {
        assert!(matches!(
            Mt::from_state(&[1, 2, 3]),
            Err(Error::StateMismatch(_))
        ));
    }

    #[test]
    fn tgfsr_backward_is_exact_inverse() {
        let mut engine = MersenneTwister::<MicroMtParams>::new(0xdead_beef);
        let start = engine.clone();
        for _ in 0..37 {
            engine.step_forward();
        }
        for _ in 0..37 {
            engine.step_backward();
        }
        assert_eq!(engine, start);
    }

    #[test]
    fn seed_sequence_degenerate_lengths() {
        assert_eq!(Mt::from_seed_sequence([]), Mt::default());
        assert_eq!(Mt::from_seed_sequence([42]), Mt::new(42));
        assert_eq!(
            Mt::from_seed_sequence([1, 2, 3]),
            Mt::from_seed_sequence(vec![1, 2, 3])
        );
    }
}
