//! Persistent storage for jump matrices.
//!
//! A jump matrix is identified by the engine, the direction and the distance.
//! [`FileStore`] keeps one bincode file per matrix and writes through a
//! temporary file in the same directory followed by a rename, so concurrent
//! readers only ever see complete files. [`JumpCache`] adds the
//! load-or-compute policy on top of any [`MatrixStore`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::JumpConfig;
use crate::error::{Error, Result};
use crate::matrix::{BitMatrix, RawMatrix};

/// Which way a jump moves the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards later outputs.
    Forward,
    /// Towards earlier outputs.
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Reverse => f.write_str("reverse"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "fwd" => Ok(Direction::Forward),
            "reverse" | "rev" | "backward" => Ok(Direction::Reverse),
            _ => Err(Error::Config {
                key: "direction".to_string(),
                reason: format!("`{s}` is neither forward nor reverse"),
            }),
        }
    }
}

/// Identity of one jump matrix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JumpKey {
    /// Engine name.
    pub engine: String,
    /// Jump direction.
    pub direction: Direction,
    /// Number of steps.
    pub distance: u64,
    /// Expected side length (`n * w` bits).
    pub dimension: usize,
}

impl JumpKey {
    /// Creates a key.
    pub fn new(engine: &str, direction: Direction, distance: u64, dimension: usize) -> Self {
        Self {
            engine: engine.to_string(),
            direction,
            distance,
            dimension,
        }
    }

    /// `<engine>_<direction>_<distance>.gf2`
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}.gf2", self.engine, self.direction, self.distance)
    }

    fn check(&self, matrix: &BitMatrix) -> std::result::Result<(), String> {
        if matrix.rows() != self.dimension || matrix.cols() != self.dimension {
            return Err(format!(
                "expected {0}x{0} matrix for {1}, found {2}x{3}",
                self.dimension,
                self.engine,
                matrix.rows(),
                matrix.cols()
            ));
        }
        Ok(())
    }
}

/// Backing storage for jump matrices.
pub trait MatrixStore: Send + Sync {
    /// Loads a matrix. `Ok(None)` means there is nothing stored for `key`;
    /// stored content that fails validation is
    /// [`Error::MalformedCacheFile`].
    fn load(&self, key: &JumpKey) -> Result<Option<BitMatrix>>;

    /// Stores a matrix, replacing any previous entry.
    fn store(&self, key: &JumpKey, matrix: &BitMatrix) -> Result<()>;

    /// Whether something is stored for `key`, without validating it.
    fn contains(&self, key: &JumpKey) -> bool;
}

/// One file per matrix under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses `dir`, which is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `key`.
    pub fn path(&self, key: &JumpKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl MatrixStore for FileStore {
    fn load(&self, key: &JumpKey) -> Result<Option<BitMatrix>> {
        let path = self.path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Io { path, source }),
        };
        let malformed = |reason: String| Error::MalformedCacheFile {
            path: path.clone(),
            reason,
        };
        let raw: RawMatrix = bincode::deserialize(&bytes).map_err(|e| malformed(e.to_string()))?;
        let matrix = BitMatrix::from_raw(raw).map_err(&malformed)?;
        key.check(&matrix).map_err(&malformed)?;
        Ok(Some(matrix))
    }

    fn store(&self, key: &JumpKey, matrix: &BitMatrix) -> Result<()> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| Error::Io { path, source }
        };
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err(&self.dir))?;
        let tmp_path = tmp.path().to_path_buf();
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            bincode::serialize_into(&mut writer, &matrix.to_raw())?;
            writer.flush().map_err(io_err(&tmp_path))?;
        }
        let path = self.path(key);
        tmp.persist(&path).map_err(|e| Error::Io {
            path: path.clone(),
            source: e.error,
        })?;
        tracing::debug!(path = %path.display(), "persisted jump matrix");
        Ok(())
    }

    fn contains(&self, key: &JumpKey) -> bool {
        self.path(key).is_file()
    }
}

/// Matrices held in memory for the life of the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<JumpKey, BitMatrix>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored matrices.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatrixStore for MemoryStore {
    fn load(&self, key: &JumpKey) -> Result<Option<BitMatrix>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &JumpKey, matrix: &BitMatrix) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), matrix.clone());
        Ok(())
    }

    fn contains(&self, key: &JumpKey) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

/// Load-or-compute policy for jump matrices, plus the distance below which
/// engines step instead of jumping.
#[derive(Debug)]
pub struct JumpCache<S> {
    store: S,
    linear_limit: u64,
}

impl<S: MatrixStore> JumpCache<S> {
    /// Wraps `store`.
    pub fn new(store: S, linear_limit: u64) -> Self {
        Self {
            store,
            linear_limit,
        }
    }

    /// Distances up to this are stepped linearly.
    pub fn linear_limit(&self) -> u64 {
        self.linear_limit
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a matrix is stored for `key`.
    pub fn contains(&self, key: &JumpKey) -> bool {
        self.store.contains(key)
    }

    /// Returns the stored matrix for `key`, or computes, stores and returns
    /// it. A malformed entry is logged, recomputed and overwritten; I/O
    /// failures are returned.
    pub fn get_or_compute<F>(&self, key: &JumpKey, compute: F) -> Result<BitMatrix>
    where
        F: FnOnce() -> BitMatrix,
    {
        let (matrix, store_error) = self.fetch_or_compute(key, compute)?;
        match store_error {
            Some(err) => Err(err),
            None => Ok(matrix),
        }
    }

    /// Like [`JumpCache::get_or_compute`], but a failed write does not lose
    /// the freshly computed matrix: it is returned together with the write
    /// error. Only a failed read is an `Err`, and then `compute` has not run.
    pub fn fetch_or_compute<F>(
        &self,
        key: &JumpKey,
        compute: F,
    ) -> Result<(BitMatrix, Option<Error>)>
    where
        F: FnOnce() -> BitMatrix,
    {
        match self.store.load(key) {
            Ok(Some(matrix)) => {
                tracing::debug!(
                    engine = %key.engine,
                    direction = %key.direction,
                    distance = key.distance,
                    "jump matrix cache hit"
                );
                return Ok((matrix, None));
            }
            Ok(None) => {}
            Err(Error::MalformedCacheFile { path, reason }) => {
                tracing::warn!(
                    path = %path.display(),
                    %reason,
                    "discarding malformed jump matrix file"
                );
            }
            Err(err) => return Err(err),
        }

        tracing::info!(
            engine = %key.engine,
            direction = %key.direction,
            distance = key.distance,
            dimension = key.dimension,
            "computing jump matrix"
        );
        let matrix = compute();
        let store_error = self.store.store(key, &matrix).err();
        Ok((matrix, store_error))
    }
}

impl JumpCache<FileStore> {
    /// File-backed cache configured from `config`.
    pub fn from_config(config: &JumpConfig) -> Self {
        Self::new(FileStore::new(&config.cache_dir), config.linear_limit)
    }
}

impl JumpCache<MemoryStore> {
    /// Cache that lives only in this process.
    pub fn in_memory(linear_limit: u64) -> Self {
        Self::new(MemoryStore::new(), linear_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(distance: u64) -> JumpKey {
        JumpKey::new("toy", Direction::Forward, distance, 3)
    }

    fn toy_matrix() -> BitMatrix {
        let mut m = BitMatrix::identity(3);
        m.set_bit(0, 2, true);
        m
    }

    #[test]
    fn file_names_follow_the_layout() {
        assert_eq!(key(17).file_name(), "toy_forward_17.gf2");
        let rev = JumpKey::new("mt19937", Direction::Reverse, 624, 19968);
        assert_eq!(rev.file_name(), "mt19937_reverse_624.gf2");
    }

    #[test]
    fn direction_parses() {
        assert_eq!("Forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("rev".parse::<Direction>().unwrap(), Direction::Reverse);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert!(!store.contains(&key(1)));
        assert!(store.load(&key(1)).unwrap().is_none());

        store.store(&key(1), &toy_matrix()).unwrap();
        assert!(store.contains(&key(1)));
        assert_eq!(store.load(&key(1)).unwrap(), Some(toy_matrix()));
    }

    #[test]
    fn wrong_dimension_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.store(&key(2), &BitMatrix::identity(4)).unwrap();
        assert!(matches!(
            store.load(&key(2)),
            Err(Error::MalformedCacheFile { .. })
        ));
    }

    #[test]
    fn truncated_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(&key(3)), [1u8, 2, 3]).unwrap();
        assert!(matches!(
            store.load(&key(3)),
            Err(Error::MalformedCacheFile { .. })
        ));
    }

    #[test]
    fn get_or_compute_recovers_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JumpCache::new(FileStore::new(dir.path()), 0);
        fs::write(cache.store().path(&key(4)), b"garbage").unwrap();

        let mut calls = 0;
        let m = cache
            .get_or_compute(&key(4), || {
                calls += 1;
                toy_matrix()
            })
            .unwrap();
        assert_eq!(m, toy_matrix());
        assert_eq!(calls, 1);
        assert_eq!(cache.store().load(&key(4)).unwrap(), Some(toy_matrix()));
    }

    /// Loads nothing and refuses every write.
    struct ReadOnlyStore;

    impl MatrixStore for ReadOnlyStore {
        fn load(&self, _key: &JumpKey) -> Result<Option<BitMatrix>> {
            Ok(None)
        }

        fn store(&self, key: &JumpKey, _matrix: &BitMatrix) -> Result<()> {
            Err(Error::Io {
                path: PathBuf::from(key.file_name()),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn contains(&self, _key: &JumpKey) -> bool {
            false
        }
    }

    #[test]
    fn failed_write_keeps_the_computed_matrix() {
        let cache = JumpCache::new(ReadOnlyStore, 0);
        let mut calls = 0;
        let (m, store_error) = cache
            .fetch_or_compute(&key(6), || {
                calls += 1;
                toy_matrix()
            })
            .unwrap();
        assert_eq!(m, toy_matrix());
        assert!(matches!(store_error, Some(Error::Io { .. })));
        assert_eq!(calls, 1);

        assert!(matches!(
            cache.get_or_compute(&key(6), toy_matrix),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn get_or_compute_computes_once() {
        let cache = JumpCache::in_memory(0);
        let mut calls = 0;
        for _ in 0..3 {
            let m = cache
                .get_or_compute(&key(5), || {
                    calls += 1;
                    toy_matrix()
                })
                .unwrap();
            assert_eq!(m, toy_matrix());
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.store().len(), 1);
    }
}
