//! Textbook FIPS-197 AES-128, written directly from the standard.
//!
//! This module shares no code with the kernels beyond the S-box and the round
//! transformations, so it serves as an independent oracle for them.

use crate::block::Block;
use crate::key::{Aes128Key, RoundKeys};
use crate::round::{add_round_key, mix_columns, shift_rows, sub_bytes};
use crate::sbox::sbox;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Expands a key with the word-oriented FIPS-197 schedule (big-endian words).
pub fn expand_key(key: &Aes128Key) -> RoundKeys {
    let mut w = [[0u8; 4]; 44];
    for (word, chunk) in w.iter_mut().zip(key.as_bytes().chunks_exact(4)) {
        word.copy_from_slice(chunk);
    }

    for i in 4..44 {
        let mut temp = w[i - 1];
        if i % 4 == 0 {
            temp = [
                sbox(temp[1]) ^ RCON[i / 4 - 1],
                sbox(temp[2]),
                sbox(temp[3]),
                sbox(temp[0]),
            ];
        }
        for b in 0..4 {
            w[i][b] = w[i - 4][b] ^ temp[b];
        }
    }

    let mut round_keys = [[0u8; 16]; 11];
    for (round, rk) in round_keys.iter_mut().enumerate() {
        for (word_idx, dst) in rk.chunks_exact_mut(4).enumerate() {
            dst.copy_from_slice(&w[round * 4 + word_idx]);
        }
    }
    RoundKeys(round_keys)
}

/// Encrypts one block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(0));
    for round in 1..10 {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, round_keys.get(round));
    }
    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, round_keys.last());

    state
}
