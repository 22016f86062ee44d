//! Key material: the raw 128-bit key and its expanded schedule.

use crate::block::Block;

/// A 128-bit key in canonical byte order.
///
/// ARS uses it directly as its first round key; AES expands it into
/// [`RoundKeys`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aes128Key(pub [u8; 16]);

impl Aes128Key {
    /// The key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &Block {
        &self.0
    }
}

impl From<[u8; 16]> for Aes128Key {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

/// The 11 round keys of AES-128; index 0 is the whitening key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys(pub [Block; 11]);

impl RoundKeys {
    /// Returns the round key at the requested index (0..=10).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.0[round]
    }

    /// Iterates over all round keys in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.0.iter()
    }

    /// The final round key.
    #[inline]
    pub fn last(&self) -> &Block {
        &self.0[10]
    }
}
