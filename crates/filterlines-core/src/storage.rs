//! Persisted "last search / last context" state.
//!
//! Only the prompting layer touches this; the filter core receives resolved
//! values as parameters.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// The string-valued keys kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    LatestSearch,
    LatestContext,
}

impl StateKey {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::LatestSearch => "latestSearch",
            StateKey::LatestContext => "latestContext",
        }
    }
}

/// Flat string key-value store. Missing keys read as `""`.
pub trait Storage {
    fn get(&self, key: StateKey) -> String;
    fn set(&self, key: StateKey, value: &str) -> Result<()>;
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value (builder-style; consumes `self`).
    #[must_use]
    pub fn with(self, key: StateKey, value: &str) -> Self {
        self.data.write().insert(key.as_str().to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: StateKey) -> String {
        self.data.read().get(key.as_str()).cloned().unwrap_or_default()
    }

    fn set(&self, key: StateKey, value: &str) -> Result<()> {
        self.data.write().insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted as a flat JSON object of strings.
///
/// The whole file is rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Open `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(s) if s.trim().is_empty() => BTreeMap::new(),
            Ok(s) => serde_json::from_str(&s)
                .map_err(|e| Error::Storage(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: StateKey) -> String {
        self.data.read().get(key.as_str()).cloned().unwrap_or_default()
    }

    fn set(&self, key: StateKey, value: &str) -> Result<()> {
        let mut data = self.data.write();
        data.insert(key.as_str().to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&*data)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(key = key.as_str(), path = %self.path.display(), "stored state");
        Ok(())
    }
}
