use core::fmt::Debug;
use core::hash::Hash;

use num_traits::{PrimInt, WrappingAdd, WrappingMul, WrappingSub};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Unsigned state word of a linear engine (`u32` or `u64`).
pub trait Word:
    PrimInt
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + Debug
    + Default
    + Hash
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Width in bits.
    const BITS: u32;

    /// Truncates a `u64` to this width.
    fn truncate_from(value: u64) -> Self;

    /// Zero-extends to `u64`.
    fn as_u64(self) -> u64;

    /// Shift right that yields zero for shifts of the full width or more.
    fn shr_or_zero(self, shift: u32) -> Self {
        if shift >= Self::BITS {
            Self::zero()
        } else {
            self >> shift as usize
        }
    }

    /// Shift left that yields zero for shifts of the full width or more.
    fn shl_or_zero(self, shift: u32) -> Self {
        if shift >= Self::BITS {
            Self::zero()
        } else {
            self << shift as usize
        }
    }
}

impl Word for u32 {
    const BITS: u32 = 32;

    fn truncate_from(value: u64) -> Self {
        value as u32
    }

    fn as_u64(self) -> u64 {
        u64::from(self)
    }
}

impl Word for u64 {
    const BITS: u32 = 64;

    fn truncate_from(value: u64) -> Self {
        value
    }

    fn as_u64(self) -> u64 {
        self
    }
}
