//! Jump-ahead configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding [`JumpConfig::cache_dir`].
pub const CACHE_DIR_ENV: &str = "MT_JUMP_CACHE_DIR";
/// Environment variable overriding [`JumpConfig::linear_limit`].
pub const LINEAR_LIMIT_ENV: &str = "MT_JUMP_LINEAR_LIMIT";

/// Where jump matrices live and when to use them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpConfig {
    /// Directory holding `<engine>_<direction>_<distance>.gf2` files.
    pub cache_dir: PathBuf,
    /// Distances up to and including this many steps are taken one at a time;
    /// longer ones go through a jump matrix.
    pub linear_limit: u64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("mt-jump"),
            linear_limit: 1 << 24,
        }
    }
}

impl JumpConfig {
    /// Defaults overridden by `MT_JUMP_CACHE_DIR` and `MT_JUMP_LINEAR_LIMIT`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            if dir.trim().is_empty() {
                return Err(Error::Config {
                    key: CACHE_DIR_ENV.to_string(),
                    reason: "empty path".to_string(),
                });
            }
            config.cache_dir = PathBuf::from(dir);
        }

        if let Ok(limit) = std::env::var(LINEAR_LIMIT_ENV) {
            config.linear_limit = parse_limit(&limit)?;
        }

        Ok(config)
    }

    /// Replaces the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Replaces the linear limit.
    pub fn with_linear_limit(mut self, limit: u64) -> Self {
        self.linear_limit = limit;
        self
    }
}

fn parse_limit(raw: &str) -> Result<u64> {
    raw.trim()
        .replace('_', "")
        .parse()
        .map_err(|e: std::num::ParseIntError| Error::Config {
            key: LINEAR_LIMIT_ENV.to_string(),
            reason: format!("`{raw}`: {e}"),
        })
}
