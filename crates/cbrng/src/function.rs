use core::fmt::Debug;

use cbrng_core::{Backend, Block};

use crate::error::Result;
use crate::factory::Algorithm;

/// A keyed block function over canonical little-endian bytes.
///
/// This is the lane-agnostic, object-safe face of [`crate::Aes`] and
/// [`crate::Ars`], used by [`crate::build`] and [`crate::CounterRng`].
pub trait BlockFunction: Debug + Send + Sync {
    /// Maps a counter block to an output block. Depends only on the key and
    /// `counter`.
    fn generate_block(&self, counter: &Block) -> Block;

    /// Which named block function this is; `None` for ARS round counts
    /// without an [`Algorithm`] variant.
    fn algorithm(&self) -> Option<Algorithm>;

    /// Backend currently used for evaluation.
    fn backend(&self) -> Backend;

    /// Switches between the AES-NI and portable paths, returning whether the
    /// hardware path was active before the call.
    ///
    /// Requesting hardware on a CPU without AES support fails with
    /// [`crate::Error::Configuration`] and leaves the current mode in place.
    fn set_hardware_mode(&mut self, enabled: bool) -> Result<bool>;

    /// Builds the function from 16 key bytes.
    fn from_key_bytes(key: Block) -> Self
    where
        Self: Sized;
}

/// Shared backend switch for the generator types.
pub(crate) fn switch_backend(current: &mut Backend, enabled: bool) -> Result<bool> {
    let previous = *current == Backend::Hardware;
    let requested = if enabled {
        Backend::Hardware
    } else {
        Backend::Software
    };
    if !requested.is_available() {
        tracing::debug!(%requested, "backend unavailable, keeping {current}");
        return Err(crate::Error::Configuration);
    }
    *current = requested;
    tracing::debug!(backend = %requested, "switched block backend");
    Ok(previous)
}
