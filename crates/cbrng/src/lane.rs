//! Lane shapes for counters, keys and outputs.

use core::fmt::Debug;
use core::hash::Hash;

use cbrng_core::Block;

use crate::error::{Error, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Integer lane type of a 128-bit block: `u32` gives `[u32; 4]`, `u64` gives
/// `[u64; 2]`. Lanes are packed little-endian, lane 0 first.
pub trait Lane: sealed::Sealed + Copy + Default + Debug + Eq + Hash + Send + Sync + 'static {
    /// The 128-bit array of lanes.
    type Array: Copy + Default + Debug + Eq + Hash + AsRef<[Self]> + AsMut<[Self]> + Send + Sync;

    /// Number of lanes per block.
    const COUNT: usize;

    /// Packs the lanes into canonical bytes.
    fn pack(array: &Self::Array) -> Block;

    /// Splits canonical bytes into lanes.
    fn unpack(bytes: &Block) -> Self::Array;
}

impl Lane for u32 {
    type Array = [u32; 4];
    const COUNT: usize = 4;

    fn pack(array: &[u32; 4]) -> Block {
        let mut out = [0u8; 16];
        for (chunk, word) in out.chunks_exact_mut(4).zip(array) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    fn unpack(bytes: &Block) -> [u32; 4] {
        let mut out = [0u32; 4];
        for (word, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        out
    }
}

impl Lane for u64 {
    type Array = [u64; 2];
    const COUNT: usize = 2;

    fn pack(array: &[u64; 2]) -> Block {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&array[0].to_le_bytes());
        out[8..].copy_from_slice(&array[1].to_le_bytes());
        out
    }

    fn unpack(bytes: &Block) -> [u64; 2] {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&bytes[..8]);
        hi.copy_from_slice(&bytes[8..]);
        [u64::from_le_bytes(lo), u64::from_le_bytes(hi)]
    }
}

/// Takes exactly one block's worth of lanes from `words`; extra items are left
/// unconsumed.
pub(crate) fn collect_array<U: Lane, I: IntoIterator<Item = U>>(words: I) -> Result<U::Array> {
    let mut array = U::Array::default();
    let mut taken = 0;
    for (slot, word) in array.as_mut().iter_mut().zip(words) {
        *slot = word;
        taken += 1;
    }
    if taken < U::COUNT {
        return Err(Error::KeyLength {
            expected: U::COUNT,
            actual: taken,
        });
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_and_u64_views_share_bytes() {
        let words = [0x0302_0100u32, 0x0706_0504, 0x0b0a_0908, 0x0f0e_0d0c];
        let bytes = u32::pack(&words);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[15], 0x0f);
        assert_eq!(u64::unpack(&bytes), [0x0706_0504_0302_0100, 0x0f0e_0d0c_0b0a_0908]);
        assert_eq!(u32::unpack(&bytes), words);
    }

    #[test]
    fn collect_array_reports_short_input() {
        let err = collect_array::<u32, _>([1u32, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            Error::KeyLength {
                expected: 4,
                actual: 3
            }
        );
        let mut long = [1u64, 2, 3].into_iter();
        assert_eq!(collect_array::<u64, _>(&mut long).unwrap(), [1, 2]);
        assert_eq!(long.next(), Some(3));
    }
}
