//! AES round transformations on the byte-oriented state.
//!
//! The state is the FIPS-197 column-major layout: byte `4 * c + r` holds row
//! `r` of column `c`. This is also the lane layout of the 128-bit registers
//! used by the AES-NI instructions.

use crate::block::{xor_in_place, Block};
use crate::sbox::sbox;

const HIGH_BITS: u64 = 0x8080_8080_8080_8080;
const LOW_SEVEN_BITS: u64 = 0xfefe_fefe_fefe_fefe;

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

/// Performs ShiftRows in place.
#[inline]
pub fn shift_rows(state: &mut Block) {
    let mut tmp = [0u8; 16];
    tmp[0] = state[0];
    tmp[1] = state[5];
    tmp[2] = state[10];
    tmp[3] = state[15];

    tmp[4] = state[4];
    tmp[5] = state[9];
    tmp[6] = state[14];
    tmp[7] = state[3];

    tmp[8] = state[8];
    tmp[9] = state[13];
    tmp[10] = state[2];
    tmp[11] = state[7];

    tmp[12] = state[12];
    tmp[13] = state[1];
    tmp[14] = state[6];
    tmp[15] = state[11];

    *state = tmp;
}

/// ShiftRows followed by SubBytes in a single pass over the state.
#[inline]
pub fn shift_rows_sub_bytes(state: &mut Block) {
    let s = *state;
    *state = [
        sbox(s[0]),
        sbox(s[5]),
        sbox(s[10]),
        sbox(s[15]),
        sbox(s[4]),
        sbox(s[9]),
        sbox(s[14]),
        sbox(s[3]),
        sbox(s[8]),
        sbox(s[13]),
        sbox(s[2]),
        sbox(s[7]),
        sbox(s[12]),
        sbox(s[1]),
        sbox(s[6]),
        sbox(s[11]),
    ];
}

fn xtime(byte: u8) -> u8 {
    let shifted = byte << 1;
    if byte & 0x80 != 0 {
        shifted ^ 0x1b
    } else {
        shifted
    }
}

fn mix_single_column(col: &mut [u8; 4]) {
    let [a0, a1, a2, a3] = *col;
    col[0] = xtime(a0) ^ (xtime(a1) ^ a1) ^ a2 ^ a3;
    col[1] = a0 ^ xtime(a1) ^ (xtime(a2) ^ a2) ^ a3;
    col[2] = a0 ^ a1 ^ xtime(a2) ^ (xtime(a3) ^ a3);
    col[3] = (xtime(a0) ^ a0) ^ a1 ^ a2 ^ xtime(a3);
}

/// MixColumns over all four columns, one column at a time.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let mut col = [column[0], column[1], column[2], column[3]];
        mix_single_column(&mut col);
        column.copy_from_slice(&col);
    }
}

/// Doubles every byte of a 64-bit lane in GF(2^8) without branching.
#[inline]
fn xtime_lane(lane: u64) -> u64 {
    let reduce = ((lane & HIGH_BITS) >> 7) * 0x1b;
    ((lane << 1) & LOW_SEVEN_BITS) ^ reduce
}

/// MixColumns computed on two 64-bit lanes at once.
///
/// All sixteen doublings are produced with shifts and masks, after which each
/// column is combined from the `1·x`, `2·x` and `3·x` byte images. Must agree
/// with [`mix_columns`] for every input.
#[inline]
pub fn mix_columns_lanes(state: &mut Block) {
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&state[..8]);
    hi.copy_from_slice(&state[8..]);
    let c1 = [u64::from_le_bytes(lo), u64::from_le_bytes(hi)];
    let c2 = [xtime_lane(c1[0]), xtime_lane(c1[1])];

    let mut one = [0u8; 16];
    let mut two = [0u8; 16];
    one[..8].copy_from_slice(&c1[0].to_le_bytes());
    one[8..].copy_from_slice(&c1[1].to_le_bytes());
    two[..8].copy_from_slice(&c2[0].to_le_bytes());
    two[8..].copy_from_slice(&c2[1].to_le_bytes());

    for off in (0..16).step_by(4) {
        let three = |i: usize| one[off + i] ^ two[off + i];
        state[off] = two[off] ^ three(1) ^ one[off + 2] ^ one[off + 3];
        state[off + 1] = one[off] ^ two[off + 1] ^ three(2) ^ one[off + 3];
        state[off + 2] = one[off] ^ one[off + 1] ^ two[off + 2] ^ three(3);
        state[off + 3] = three(0) ^ one[off + 1] ^ one[off + 2] ^ two[off + 3];
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn fused_shift_rows_sub_bytes_matches_separate_steps() {
        let mut rng = ChaCha20Rng::from_seed([30u8; 32]);
        for _ in 0..64 {
            let mut state = [0u8; 16];
            rng.fill_bytes(&mut state);
            let mut expected = state;
            sub_bytes(&mut expected);
            shift_rows(&mut expected);
            shift_rows_sub_bytes(&mut state);
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn mix_columns_paths_agree_on_basis_blocks() {
        for bit in 0..128 {
            let mut naive = [0u8; 16];
            naive[bit / 8] = 1 << (bit % 8);
            let mut lanes = naive;
            mix_columns(&mut naive);
            mix_columns_lanes(&mut lanes);
            assert_eq!(naive, lanes, "disagreement on basis bit {bit}");
        }
    }

    #[test]
    fn mix_columns_paths_agree_on_random_blocks() {
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);
        for _ in 0..256 {
            let mut naive = [0u8; 16];
            rng.fill_bytes(&mut naive);
            let mut lanes = naive;
            mix_columns(&mut naive);
            mix_columns_lanes(&mut lanes);
            assert_eq!(naive, lanes);
        }
    }

    #[test]
    fn mix_columns_matches_fips_column() {
        // FIPS-197 section 5.1.3 worked column: db 13 53 45 -> 8e 4d a1 bc.
        let mut state = [0u8; 16];
        state[..4].copy_from_slice(&[0xdb, 0x13, 0x53, 0x45]);
        mix_columns_lanes(&mut state);
        assert_eq!(&state[..4], &[0x8e, 0x4d, 0xa1, 0xbc]);
    }
}
