//! Running an engine's stream backwards.

use rand::RngCore;
use rand_core::impls;

use crate::cache::{JumpCache, MatrixStore};
use crate::engine::{LinearEngine, MersenneTwister};
use crate::error::Result;
use crate::params::MtParams;
use crate::word::Word;

/// Produces the outputs of `E` in reverse order: `next_word` here is
/// `previous_word` on the inner engine, and vice versa.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reverse<E> {
    inner: E,
}

impl<E: LinearEngine> Reverse<E> {
    /// Wraps `inner`; the first output is the inner engine's most recent one.
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    /// The wrapped engine.
    pub fn get_ref(&self) -> &E {
        &self.inner
    }

    /// Unwraps the engine.
    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<C: MtParams> Reverse<MersenneTwister<C>> {
    /// [`MersenneTwister::reverse_discard_with`] on the inner engine.
    pub fn discard_with<S: MatrixStore>(&mut self, cache: &JumpCache<S>, steps: u64) -> Result<()> {
        self.inner.reverse_discard_with(cache, steps)
    }

    /// [`MersenneTwister::discard_with`] on the inner engine.
    pub fn reverse_discard_with<S: MatrixStore>(
        &mut self,
        cache: &JumpCache<S>,
        steps: u64,
    ) -> Result<()> {
        self.inner.discard_with(cache, steps)
    }
}

impl<E: LinearEngine> LinearEngine for Reverse<E> {
    type Output = E::Output;

    fn next_word(&mut self) -> E::Output {
        self.inner.previous_word()
    }

    fn previous_word(&mut self) -> E::Output {
        self.inner.next_word()
    }

    fn discard(&mut self, steps: u64) {
        self.inner.reverse_discard(steps);
    }

    fn reverse_discard(&mut self, steps: u64) {
        self.inner.discard(steps);
    }

    fn peek(&self, offset: i64) -> E::Output {
        if offset > 0 {
            self.inner.reverse_peek(offset.unsigned_abs() - 1)
        } else {
            let mut probe = self.inner.clone();
            probe.discard(offset.unsigned_abs());
            probe.next_word()
        }
    }

    fn reverse_peek(&self, offset: u64) -> E::Output {
        let mut probe = self.inner.clone();
        probe.discard(offset);
        probe.next_word()
    }
}

impl<E: LinearEngine> RngCore for Reverse<E> {
    fn next_u32(&mut self) -> u32 {
        self.next_word().as_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        if <E::Output as Word>::BITS >= 64 {
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
