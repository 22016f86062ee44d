//! AES-128 and ARS kernels, generic over [`Block128`], with backend dispatch.

use crate::backend::{hardware_available, Backend};
use crate::block::{Block, Block128, Sw128};
use crate::key::{Aes128Key, RoundKeys};

/// Weyl increment added to the low 64-bit lane of the ARS key each round.
pub const WEYL_W0: u64 = 0x9E37_79B9_7F4A_7C15;
/// Weyl increment added to the high 64-bit lane of the ARS key each round.
pub const WEYL_W1: u64 = 0xBB67_AE85_84CA_A73B;

const WEYL_BYTES: Block = {
    let lo = WEYL_W0.to_le_bytes();
    let hi = WEYL_W1.to_le_bytes();
    let mut out = [0u8; 16];
    let mut i = 0;
    while i < 8 {
        out[i] = lo[i];
        out[i + 8] = hi[i];
        i += 1;
    }
    out
};

#[inline(always)]
fn key_round<B: Block128, const RCON: i32>(prev: B) -> B {
    let mut t = prev.shift_left_word();
    let mut next = prev.xor(t);
    t = t.shift_left_word();
    next = next.xor(t);
    t = t.shift_left_word();
    next = next.xor(t);
    next.xor(prev.keygen_assist::<RCON>().broadcast_high_word())
}

#[inline(always)]
fn key_schedule<B: Block128>(key: B) -> [B; 11] {
    let k1 = key_round::<B, 0x01>(key);
    let k2 = key_round::<B, 0x02>(k1);
    let k3 = key_round::<B, 0x04>(k2);
    let k4 = key_round::<B, 0x08>(k3);
    let k5 = key_round::<B, 0x10>(k4);
    let k6 = key_round::<B, 0x20>(k5);
    let k7 = key_round::<B, 0x40>(k6);
    let k8 = key_round::<B, 0x80>(k7);
    let k9 = key_round::<B, 0x1b>(k8);
    let k10 = key_round::<B, 0x36>(k9);
    [key, k1, k2, k3, k4, k5, k6, k7, k8, k9, k10]
}

#[inline(always)]
fn aes_rounds<B: Block128>(block: B, round_keys: &[B; 11]) -> B {
    let mut state = block.xor(round_keys[0]);
    for rk in &round_keys[1..10] {
        state = state.aesenc(*rk);
    }
    state.aesenclast(round_keys[10])
}

#[inline(always)]
fn ars_rounds<B: Block128>(block: B, key: B, rounds: u32) -> B {
    let weyl = B::from_bytes(&WEYL_BYTES);
    let mut k = key;
    let mut state = block.xor(k);
    for _ in 1..rounds {
        k = k.add_lanes(weyl);
        state = state.aesenc(k);
    }
    k = k.add_lanes(weyl);
    state.aesenclast(k)
}

#[inline(always)]
fn load_round_keys<B: Block128>(round_keys: &RoundKeys) -> [B; 11] {
    let mut out = [B::from_bytes(round_keys.get(0)); 11];
    for (dst, src) in out.iter_mut().zip(round_keys.iter()).skip(1) {
        *dst = B::from_bytes(src);
    }
    out
}

#[inline(always)]
fn store_round_keys<B: Block128>(schedule: [B; 11]) -> RoundKeys {
    RoundKeys(schedule.map(B::to_bytes))
}

fn use_hardware(backend: Backend) -> bool {
    backend == Backend::Hardware && hardware_available()
}

/// Expands a key into the 11 AES-128 round keys using the `AESKEYGENASSIST`
/// formulation of the schedule.
#[allow(unsafe_code)]
pub fn expand_round_keys(backend: Backend, key: &Aes128Key) -> RoundKeys {
    #[cfg(target_arch = "x86_64")]
    {
        if use_hardware(backend) {
            // SAFETY: the AES probe succeeded.
            return unsafe { hw::expand_round_keys(key) };
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = use_hardware(backend);
    store_round_keys(key_schedule(Sw128::from_bytes(key.as_bytes())))
}

/// Encrypts one block with AES-128.
#[allow(unsafe_code)]
pub fn aes_encrypt(backend: Backend, block: &Block, round_keys: &RoundKeys) -> Block {
    #[cfg(target_arch = "x86_64")]
    {
        if use_hardware(backend) {
            // SAFETY: the AES probe succeeded.
            return unsafe { hw::aes_encrypt(block, round_keys) };
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = use_hardware(backend);
    let schedule = load_round_keys::<Sw128>(round_keys);
    aes_rounds(Sw128::from_bytes(block), &schedule).to_bytes()
}

/// Encrypts one block with ARS-`rounds`: the key is bumped by the Weyl
/// constants before every round after the initial whitening.
///
/// `rounds` must be at least one.
#[allow(unsafe_code)]
pub fn ars_encrypt(backend: Backend, block: &Block, key: &Block, rounds: u32) -> Block {
    debug_assert!(rounds > 0, "ARS needs at least one round");
    #[cfg(target_arch = "x86_64")]
    {
        if use_hardware(backend) {
            // SAFETY: the AES probe succeeded.
            return unsafe { hw::ars_encrypt(block, key, rounds) };
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = use_hardware(backend);
    ars_rounds(Sw128::from_bytes(block), Sw128::from_bytes(key), rounds).to_bytes()
}

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
mod hw {
    use super::{aes_rounds, ars_rounds, key_schedule, load_round_keys, store_round_keys};
    use crate::block::{Block, Block128};
    use crate::hw::Hw128;
    use crate::key::{Aes128Key, RoundKeys};

    #[target_feature(enable = "aes,sse2")]
    pub(super) unsafe fn expand_round_keys(key: &Aes128Key) -> RoundKeys {
        store_round_keys(key_schedule(Hw128::from_bytes(key.as_bytes())))
    }

    #[target_feature(enable = "aes,sse2")]
    pub(super) unsafe fn aes_encrypt(block: &Block, round_keys: &RoundKeys) -> Block {
        let schedule = load_round_keys::<Hw128>(round_keys);
        aes_rounds(Hw128::from_bytes(block), &schedule).to_bytes()
    }

    #[target_feature(enable = "aes,sse2")]
    pub(super) unsafe fn ars_encrypt(block: &Block, key: &Block, rounds: u32) -> Block {
        ars_rounds(Hw128::from_bytes(block), Hw128::from_bytes(key), rounds).to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn block(words: [u32; 4]) -> Block {
        Sw128::from_words(words).to_bytes()
    }

    fn words(block: Block) -> [u32; 4] {
        Sw128::new(block).words()
    }

    fn backends() -> Vec<Backend> {
        let mut out = vec![Backend::Software];
        if hardware_available() {
            out.push(Backend::Hardware);
        }
        out
    }

    #[test]
    fn schedule_matches_reference_expansion() {
        let mut rng = ChaCha20Rng::from_seed([40u8; 32]);
        for _ in 0..32 {
            let mut key = [0u8; 16];
            rng.fill_bytes(&mut key);
            let key = Aes128Key::from(key);
            for backend in backends() {
                assert_eq!(expand_round_keys(backend, &key), reference::expand_key(&key));
            }
        }
    }

    #[test]
    fn aes_matches_fips_appendix_c1() {
        let key = Aes128Key::from([
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ]);
        let plain = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let expected = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];
        for backend in backends() {
            let rks = expand_round_keys(backend, &key);
            assert_eq!(aes_encrypt(backend, &plain, &rks), expected, "{backend}");
        }
    }

    #[test]
    fn aes_known_answers() {
        let cases = [
            ([0u32; 4], [0u32; 4], [0xd44be966, 0x3b2c8aef, 0x59fa4c88, 0x2e2b34ca]),
            (
                [0x243f6a88, 0x85a308d3, 0x13198a2e, 0x03707344],
                [0xa4093822, 0x299f31d0, 0x082efa98, 0xec4e6c89],
                [0xca693cbf, 0x134a4f64, 0x965e0cfd, 0x5217a28f],
            ),
        ];
        for backend in backends() {
            for (ctr, key, expected) in cases {
                let rks = expand_round_keys(backend, &Aes128Key::from(block(key)));
                assert_eq!(words(aes_encrypt(backend, &block(ctr), &rks)), expected);
            }
        }
    }

    #[test]
    fn ars10_known_answer() {
        for backend in backends() {
            let out = ars_encrypt(backend, &[0u8; 16], &[0u8; 16], 10);
            assert_eq!(words(out), [0x8d73ee19, 0x506401ef, 0x13c2dbe4, 0x0cbe9c0d]);
        }
    }

    #[test]
    fn hardware_and_software_agree_on_random_inputs() {
        if !hardware_available() {
            return;
        }
        let mut rng = ChaCha20Rng::from_seed([41u8; 32]);
        for _ in 0..128 {
            let mut key = [0u8; 16];
            let mut input = [0u8; 16];
            rng.fill_bytes(&mut key);
            rng.fill_bytes(&mut input);
            let key = Aes128Key::from(key);
            let sw_rks = expand_round_keys(Backend::Software, &key);
            let hw_rks = expand_round_keys(Backend::Hardware, &key);
            assert_eq!(sw_rks, hw_rks);
            assert_eq!(
                aes_encrypt(Backend::Software, &input, &sw_rks),
                aes_encrypt(Backend::Hardware, &input, &hw_rks)
            );
            for rounds in [1, 5, 7, 10] {
                assert_eq!(
                    ars_encrypt(Backend::Software, &input, &key.0, rounds),
                    ars_encrypt(Backend::Hardware, &input, &key.0, rounds)
                );
            }
        }
    }

    #[test]
    fn weyl_bytes_are_little_endian_lanes() {
        assert_eq!(Sw128::new(WEYL_BYTES).halves(), [WEYL_W0, WEYL_W1]);
    }
}
