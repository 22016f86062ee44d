//! Transition matrices and the process-wide jump cache.
//!
//! One step of an engine is a GF(2)-linear map on its `n * w`-bit window, so
//! `p` steps are the `p`-th power of its matrix. Building a transition matrix
//! costs `n * w` engine steps; raising it to a power costs `O((n w)^3)` bit
//! operations per squaring, which for MT19937 (19968 bits) is long enough that
//! jump matrices are worth precomputing with the `cbrng jump` command.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::cache::{Direction, FileStore, JumpCache};
use crate::config::JumpConfig;
use crate::engine::MersenneTwister;
use crate::matrix::BitMatrix;
use crate::params::MtParams;

type TransitionMemo = Mutex<HashMap<(&'static str, Direction), Arc<BitMatrix>>>;

fn transitions() -> &'static TransitionMemo {
    static MEMO: OnceLock<TransitionMemo> = OnceLock::new();
    MEMO.get_or_init(|| Mutex::new(HashMap::new()))
}

/// The one-step matrix of engine `C` in `direction`, computed once per
/// process.
pub fn transition_matrix<C: MtParams>(direction: Direction) -> Arc<BitMatrix> {
    let key = (C::NAME, direction);
    if let Some(m) = transitions()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Arc::clone(m);
    }

    tracing::debug!(engine = C::NAME, %direction, "building transition matrix");
    let n = MersenneTwister::<C>::STATE_BITS;
    let matrix = Arc::new(BitMatrix::from_linear_map(n, |bits| {
        let mut engine = MersenneTwister::<C>::from_bits(bits);
        match direction {
            Direction::Forward => engine.step_forward(),
            Direction::Reverse => engine.step_backward(),
        }
        engine.to_bits()
    }));

    // Another thread may have raced us here; both results are identical.
    transitions()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert_with(|| Arc::clone(&matrix));
    matrix
}

/// File-backed cache built from [`JumpConfig::from_env`], falling back to
/// the defaults when the environment holds invalid values.
pub fn default_cache() -> &'static JumpCache<FileStore> {
    static CACHE: OnceLock<JumpCache<FileStore>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let config = JumpConfig::from_env().unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring jump configuration from environment");
            JumpConfig::default()
        });
        tracing::debug!(
            cache_dir = %config.cache_dir.display(),
            linear_limit = config.linear_limit,
            "default jump cache"
        );
        JumpCache::from_config(&config)
    })
}
