//! AES-NI register type.
//!
//! Values of [`Hw128`] are only created inside the `#[target_feature]` kernels
//! in [`crate::kernel`], which are entered after [`crate::hardware_available`]
//! has reported AES support. Every method is `#[inline(always)]` so the
//! intrinsics are compiled with the caller's target features.

#![allow(unsafe_code)]

use core::arch::x86_64::{
    __m128i, _mm_add_epi64, _mm_aesenc_si128, _mm_aesenclast_si128, _mm_aeskeygenassist_si128,
    _mm_loadu_si128, _mm_shuffle_epi32, _mm_slli_si128, _mm_storeu_si128, _mm_xor_si128,
};

use crate::block::{Block, Block128};

#[derive(Clone, Copy)]
pub(crate) struct Hw128(__m128i);

impl Block128 for Hw128 {
    #[inline(always)]
    fn from_bytes(bytes: &Block) -> Self {
        // SAFETY: unaligned load of exactly 16 readable bytes.
        Self(unsafe { _mm_loadu_si128(bytes.as_ptr().cast()) })
    }

    #[inline(always)]
    fn to_bytes(self) -> Block {
        let mut out = [0u8; 16];
        // SAFETY: unaligned store into exactly 16 writable bytes.
        unsafe { _mm_storeu_si128(out.as_mut_ptr().cast(), self.0) };
        out
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline.
        Self(unsafe { _mm_xor_si128(self.0, rhs.0) })
    }

    #[inline(always)]
    fn add_lanes(self, rhs: Self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline.
        Self(unsafe { _mm_add_epi64(self.0, rhs.0) })
    }

    #[inline(always)]
    fn aesenc(self, round_key: Self) -> Self {
        // SAFETY: only reached from kernels entered after the AES probe.
        Self(unsafe { _mm_aesenc_si128(self.0, round_key.0) })
    }

    #[inline(always)]
    fn aesenclast(self, round_key: Self) -> Self {
        // SAFETY: only reached from kernels entered after the AES probe.
        Self(unsafe { _mm_aesenclast_si128(self.0, round_key.0) })
    }

    #[inline(always)]
    fn keygen_assist<const RCON: i32>(self) -> Self {
        // SAFETY: only reached from kernels entered after the AES probe.
        Self(unsafe { _mm_aeskeygenassist_si128::<RCON>(self.0) })
    }

    #[inline(always)]
    fn shift_left_word(self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline.
        Self(unsafe { _mm_slli_si128::<4>(self.0) })
    }

    #[inline(always)]
    fn broadcast_high_word(self) -> Self {
        // SAFETY: SSE2 is part of the x86_64 baseline.
        Self(unsafe { _mm_shuffle_epi32::<0xff>(self.0) })
    }
}
