//! Durable key-value storage for counters and preferences.
//!
//! The game only needs a handful of string values under fixed keys. Values
//! are written as decimal strings and read back leniently: a missing or
//! malformed counter reads as `0` instead of failing.

pub mod error;

pub use error::StoreError;

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SCORE_KEY: &str = "hangman.score";
pub const STREAK_KEY: &str = "hangman.streak";
pub const BEST_STREAK_KEY: &str = "hangman.best_streak";
pub const PLAYED_KEY: &str = "hangman.played";
pub const THEME_SCHEME_KEY: &str = "hangman.theme.scheme";
pub const THEME_ACCENT_KEY: &str = "hangman.theme.accent";

/// String key-value store.
pub trait CounterStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write one value. On error the stored value is unchanged.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Write several values as one unit: either all of them land or none do.
    ///
    /// The default writes one by one and puts back the earlier values when a
    /// later write fails.
    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let mut previous = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            previous.push((*key, self.get(key)?));
        }

        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(err) = self.set(key, value) {
                for (key, old) in previous[..written].iter().rev() {
                    let restored = match old {
                        Some(old) => self.set(key, old),
                        None => self.remove(key),
                    };
                    if let Err(restore_err) = restored {
                        warn!(key, error = %restore_err, "could not restore value");
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

impl<S: CounterStore + ?Sized> CounterStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        (**self).set_all(entries)
    }
}

impl<S: CounterStore + ?Sized> CounterStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        (**self).set_all(entries)
    }
}

/// Read a counter, defaulting to 0 when absent, malformed or unreadable.
pub fn read_counter<S: CounterStore + ?Sized>(store: &S, key: &str) -> u32 {
    match store.get(key) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "malformed counter, using 0");
            0
        }),
        Ok(None) => 0,
        Err(err) => {
            warn!(key, error = %err, "counter unreadable, using 0");
            0
        }
    }
}

pub fn write_counter<S: CounterStore + ?Sized>(
    store: &mut S,
    key: &str,
    value: u32,
) -> Result<(), StoreError> {
    store.set(key, &value.to_string())
}

/// In-memory store. Nothing survives the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl CounterStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// The file is read once on open and rewritten on every write via a temp
/// file and rename, so a crash mid-write leaves the previous contents. A
/// failed write leaves memory and disk as they were.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`. A missing file starts empty; an unreadable or corrupt one
    /// also starts empty and is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => parse_values(&path, &raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "store unreadable, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = values.len(), "store opened");
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, json).map_err(io_err)?;
        fs::rename(&temp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

// Non-string scalars are kept as their JSON text so hand-edited files like
// {"hangman.score": 40} still read back.
fn parse_values(path: &Path, raw: &str) -> BTreeMap<String, String> {
    match serde_json::from_str::<BTreeMap<String, Value>>(raw) {
        Ok(map) => map
            .into_iter()
            .map(|(k, v)| match v {
                Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "store file corrupt, starting empty");
            BTreeMap::new()
        }
    }
}

impl CounterStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_all(&[(key, value.to_string())])
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let Some(old) = self.values.remove(key) else {
            return Ok(());
        };
        self.persist().map_err(|err| {
            self.values.insert(key.to_string(), old);
            err
        })
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let previous = self.values.clone();
        for (key, value) in entries {
            self.values.insert((*key).to_string(), value.clone());
        }
        self.persist().map_err(|err| {
            self.values = previous;
            err
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Memory store whose writes can be made to fail.
    #[derive(Debug, Default)]
    pub(crate) struct FlakyStore {
        pub(crate) inner: MemoryStore,
        /// Fail every write while set.
        pub(crate) failing: bool,
        /// Fail only the write with this index, counting from 0.
        pub(crate) fail_write: Option<usize>,
        writes: usize,
    }

    impl FlakyStore {
        pub(crate) fn with(inner: MemoryStore) -> Self {
            Self {
                inner,
                ..Self::default()
            }
        }

        fn write(&mut self) -> Result<(), StoreError> {
            let index = self.writes;
            self.writes += 1;
            if self.failing || self.fail_write == Some(index) {
                return Err(StoreError::Io {
                    path: PathBuf::from("flaky.json"),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            Ok(())
        }
    }

    impl CounterStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.write()?;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.write()?;
            self.inner.remove(key)
        }
    }
}
