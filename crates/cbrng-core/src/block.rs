//! 128-bit block representations.
//!
//! [`Block`] is the canonical little-endian byte form. [`Block128`] abstracts
//! over the register types that the round kernels operate on; every
//! implementation must round-trip through [`Block`] and produce bit-identical
//! results for each operation.

use crate::round::{mix_columns_lanes, shift_rows_sub_bytes};
use crate::sbox::sub_word;

/// AES block of 16 bytes.
pub type Block = [u8; 16];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Operations the AES and ARS kernels need from a 128-bit value.
///
/// Lane numbering is little-endian: 32-bit lane 0 is bytes `0..4`, 64-bit lane
/// 0 is bytes `0..8`.
pub trait Block128: Copy {
    /// Loads a value from its canonical byte form.
    fn from_bytes(bytes: &Block) -> Self;

    /// Stores the value in its canonical byte form.
    fn to_bytes(self) -> Block;

    /// Bitwise XOR.
    fn xor(self, rhs: Self) -> Self;

    /// Adds the two 64-bit lanes independently, modulo 2^64.
    fn add_lanes(self, rhs: Self) -> Self;

    /// One full AES encryption round: ShiftRows, SubBytes, MixColumns, then
    /// XOR with `round_key`.
    fn aesenc(self, round_key: Self) -> Self;

    /// The final AES round, without MixColumns.
    fn aesenclast(self, round_key: Self) -> Self;

    /// The `AESKEYGENASSIST` step: words 0 and 2 become SubWord of words 1
    /// and 3, words 1 and 3 become RotWord of those results XOR `RCON`.
    fn keygen_assist<const RCON: i32>(self) -> Self;

    /// Shifts the value left by four bytes (one 32-bit lane), filling with zero.
    fn shift_left_word(self) -> Self;

    /// Copies the high 32-bit lane into all four lanes.
    fn broadcast_high_word(self) -> Self;
}

/// Portable 128-bit value backed by its little-endian bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sw128(Block);

impl Sw128 {
    /// Wraps a byte block.
    pub const fn new(bytes: Block) -> Self {
        Self(bytes)
    }

    /// Builds a value from four little-endian 32-bit lanes.
    pub fn from_words(words: [u32; 4]) -> Self {
        let mut bytes = [0u8; 16];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Self(bytes)
    }

    /// Returns the four 32-bit lanes.
    pub fn words(self) -> [u32; 4] {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    /// Builds a value from two little-endian 64-bit lanes.
    pub fn from_halves(halves: [u64; 2]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&halves[0].to_le_bytes());
        bytes[8..].copy_from_slice(&halves[1].to_le_bytes());
        Self(bytes)
    }

    /// Returns the two 64-bit lanes.
    pub fn halves(self) -> [u64; 2] {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&self.0[..8]);
        hi.copy_from_slice(&self.0[8..]);
        [u64::from_le_bytes(lo), u64::from_le_bytes(hi)]
    }
}

impl Block128 for Sw128 {
    #[inline]
    fn from_bytes(bytes: &Block) -> Self {
        Self(*bytes)
    }

    #[inline]
    fn to_bytes(self) -> Block {
        self.0
    }

    #[inline]
    fn xor(mut self, rhs: Self) -> Self {
        xor_in_place(&mut self.0, &rhs.0);
        self
    }

    #[inline]
    fn add_lanes(self, rhs: Self) -> Self {
        let [a0, a1] = self.halves();
        let [b0, b1] = rhs.halves();
        Self::from_halves([a0.wrapping_add(b0), a1.wrapping_add(b1)])
    }

    #[inline]
    fn aesenc(mut self, round_key: Self) -> Self {
        shift_rows_sub_bytes(&mut self.0);
        mix_columns_lanes(&mut self.0);
        self.xor(round_key)
    }

    #[inline]
    fn aesenclast(mut self, round_key: Self) -> Self {
        shift_rows_sub_bytes(&mut self.0);
        self.xor(round_key)
    }

    #[inline]
    fn keygen_assist<const RCON: i32>(self) -> Self {
        let rcon = RCON as u32;
        let [_, x1, _, x3] = self.words();
        let s1 = sub_word(x1);
        let s3 = sub_word(x3);
        Self::from_words([s1, s1.rotate_right(8) ^ rcon, s3, s3.rotate_right(8) ^ rcon])
    }

    #[inline]
    fn shift_left_word(self) -> Self {
        let [w0, w1, w2, _] = self.words();
        Self::from_words([0, w0, w1, w2])
    }

    #[inline]
    fn broadcast_high_word(self) -> Self {
        let [_, _, _, w3] = self.words();
        Self::from_words([w3; 4])
    }
}
