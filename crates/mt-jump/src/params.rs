//! Parameter sets of the Mersenne Twister family.
//!
//! The recurrence is
//! `x[k+n] = x[k+m] ^ ((x[k] & upper_r) | (x[k+1] & lower_r)) · A`, where `A`
//! shifts right by one and XORs `a` when the shifted-out bit was set. With
//! `r = 0` there is no upper/lower split and the recurrence reduces to the
//! twisted GFSR `x[k+n] = x[k+m] ^ x[k] · A`.
//!
//! Output tempering is
//! ```text
//! y ^= (y >> u) & d
//! y ^= (y << s) & b
//! y ^= (y << t) & c
//! y ^= y >> l
//! ```
//! where a shift of the full word width or more disables its step.

use core::fmt::Debug;

use crate::word::Word;

/// Fixed parameters of one engine.
pub trait MtParams: Copy + Debug + Default + Send + Sync + 'static {
    /// State word type; its width is the `w` parameter.
    type Word: Word;

    /// Engine name, used for cache file names and checkpoints.
    const NAME: &'static str;

    /// Degree of recurrence.
    const N: usize;
    /// Middle offset, `1 <= m < n`.
    const M: usize;
    /// Separation point of one word, `0 <= r < w`.
    const R: u32;
    /// Twist coefficient; its top bit must be set.
    const A: Self::Word;

    /// Tempering shift `u`.
    const U: u32;
    /// Tempering mask `d`.
    const D: Self::Word;
    /// Tempering shift `s`.
    const S: u32;
    /// Tempering mask `b`.
    const B: Self::Word;
    /// Tempering shift `t`.
    const T: u32;
    /// Tempering mask `c`.
    const C: Self::Word;
    /// Tempering shift `l`.
    const L: u32;

    /// Multiplier of the single-seed initialization.
    const F: Self::Word;
    /// Seed used by `Default`.
    const DEFAULT_SEED: Self::Word;
    /// Seed of the initial fill in sequence seeding.
    const MULTI_SEED: Self::Word;
    /// First multiplier of sequence seeding.
    const G1: Self::Word;
    /// Second multiplier of sequence seeding.
    const G2: Self::Word;

    /// Word width `w`.
    const W: u32 = <Self::Word as Word>::BITS;
}

macro_rules! mt_params {
    (
        $(#[$doc:meta])*
        $name:ident: $word:ty, $label:literal,
        n = $n:literal, m = $m:literal, r = $r:literal, a = $a:literal,
        u = $u:literal, d = $d:literal, s = $s:literal, b = $b:literal,
        t = $t:literal, c = $c:literal, l = $l:literal,
        f = $f:literal, seed = $seed:literal, multi = $multi:literal,
        g1 = $g1:literal, g2 = $g2:literal $(,)?
    ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl MtParams for $name {
            type Word = $word;
            const NAME: &'static str = $label;
            const N: usize = $n;
            const M: usize = $m;
            const R: u32 = $r;
            const A: $word = $a;
            const U: u32 = $u;
            const D: $word = $d;
            const S: u32 = $s;
            const B: $word = $b;
            const T: u32 = $t;
            const C: $word = $c;
            const L: u32 = $l;
            const F: $word = $f;
            const DEFAULT_SEED: $word = $seed;
            const MULTI_SEED: $word = $multi;
            const G1: $word = $g1;
            const G2: $word = $g2;
        }
    };
}

mt_params! {
    /// The 32-bit Mersenne Twister of Matsumoto and Nishimura (period 2^19937 − 1).
    Mt19937Params: u32, "mt19937",
    n = 624, m = 397, r = 31, a = 0x9908_b0df,
    u = 11, d = 0xffff_ffff, s = 7, b = 0x9d2c_5680,
    t = 15, c = 0xefc6_0000, l = 18,
    f = 1_812_433_253, seed = 5489, multi = 19_650_218,
    g1 = 1_664_525, g2 = 1_566_083_941,
}

mt_params! {
    /// The 64-bit Mersenne Twister.
    Mt19937_64Params: u64, "mt19937_64",
    n = 312, m = 156, r = 31, a = 0xb502_6f5a_a966_19e9,
    u = 29, d = 0x5555_5555_5555_5555, s = 17, b = 0x71d6_7fff_eda6_0000,
    t = 37, c = 0xfff7_eee0_0000_0000, l = 43,
    f = 6_364_136_223_846_793_005, seed = 5489, multi = 19_650_218,
    g1 = 3_935_559_000_370_003_845, g2 = 2_862_933_555_777_941_757,
}

mt_params! {
    /// Period 2^11213 − 1, parameter set A.
    Mt11213aParams: u32, "mt11213a",
    n = 351, m = 175, r = 19, a = 0xe4bd_75f5,
    u = 11, d = 0xffff_ffff, s = 7, b = 0x655e_5280,
    t = 15, c = 0xffd5_8000, l = 17,
    f = 1_812_433_253, seed = 5489, multi = 19_650_218,
    g1 = 1_664_525, g2 = 1_566_083_941,
}

mt_params! {
    /// Period 2^11213 − 1, parameter set B.
    Mt11213bParams: u32, "mt11213b",
    n = 351, m = 175, r = 19, a = 0xccab_8ee7,
    u = 11, d = 0xffff_ffff, s = 7, b = 0x31b6_ab00,
    t = 15, c = 0xffe5_0000, l = 17,
    f = 1_812_433_253, seed = 5489, multi = 19_650_218,
    g1 = 1_664_525, g2 = 1_566_083_941,
}

mt_params! {
    /// Matsumoto and Kurita's TT800 twisted GFSR (800 bits of state).
    Tt800Params: u32, "tt800",
    n = 25, m = 7, r = 0, a = 0x8ebf_d028,
    u = 32, d = 0xffff_ffff, s = 7, b = 0x2b5b_2500,
    t = 15, c = 0xdb8b_0000, l = 16,
    f = 1_812_433_253, seed = 5489, multi = 19_650_218,
    g1 = 1_664_525, g2 = 1_566_083_941,
}

mt_params! {
    /// Two-word twisted GFSR without tempering. Its 64-bit state keeps
    /// transition matrices tiny, which makes it useful for exercising the
    /// jump machinery.
    MicroMtParams: u32, "micro_mt",
    n = 2, m = 1, r = 0, a = 0x8000_0000,
    u = 32, d = 0, s = 0, b = 0,
    t = 0, c = 0, l = 32,
    f = 1, seed = 1, multi = 1,
    g1 = 1, g2 = 1,
}
