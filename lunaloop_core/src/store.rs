//! Key-value persistence for engine state.
//!
//! The engine only needs string values under string keys. Values are JSON;
//! typed reads fall back to a default on missing or malformed data, and
//! typed writes are best-effort.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage keys
pub mod keys {
    pub const USER: &str = "lunaloop_user";
    pub const LOGS: &str = "lunaloop_logs";
    pub const SETTINGS: &str = "lunaloop_settings";
    pub const REMINDERS: &str = "lunaloop_reminders";

    /// Prefix of the per-day insight cache keys
    pub const INSIGHT_PREFIX: &str = "insight_";

    /// Whether a key belongs to this application's namespace
    pub fn is_owned(key: &str) -> bool {
        key.starts_with("lunaloop_") || key.starts_with(INSIGHT_PREFIX)
    }
}

/// Raw key-value store collaborator
pub trait KvStore {
    /// Read a raw value; `None` when missing or unreadable
    fn get_raw(&self, key: &str) -> Option<String>;

    fn set_raw(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    /// Remove every key
    fn clear(&mut self) -> Result<()>;

    /// Typed read; missing or malformed JSON resolves to `default`
    fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        let Some(raw) = self.get_raw(key) else {
            return default;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Malformed value under {:?}: {}. Using defaults.", key, e);
                default
            }
        }
    }

    /// Typed best-effort write; failures are logged, never propagated
    fn set_value<T: Serialize>(&mut self, key: &str, value: &T)
    where
        Self: Sized,
    {
        let result = serde_json::to_string(value)
            .map_err(Error::from)
            .and_then(|raw| self.set_raw(key, &raw));
        if let Err(e) = result {
            tracing::error!("Error saving {:?}: {}", key, e);
        }
    }
}

/// In-memory store, used for tests and ephemeral sessions
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.values.clear();
        Ok(())
    }
}

/// File-backed store: one `<key>.json` file per key in a directory
///
/// Reads take a shared lock; writes go to a locked temp file that is synced
/// and renamed over the original.
#[derive(Clone, Debug)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }

    fn read_locked(path: &Path) -> std::io::Result<String> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();
        read.map(|_| contents)
    }
}

impl KvStore for JsonDirStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }

        match Self::read_locked(&path) {
            Ok(contents) => {
                tracing::debug!("Read {:?} from {:?}", key, path);
                Some(contents)
            }
            Err(e) => {
                tracing::warn!("Unable to read {:?}: {}. Using defaults.", path, e);
                None
            }
        }
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // Temp file in the same directory so the rename stays atomic
        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {:?} to {:?}", key, path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }

        // The directory may be shared; only our own key files are removed
        let mut count = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let owned = path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(keys::is_owned);
            if owned {
                std::fs::remove_file(&path)?;
                count += 1;
            }
        }
        tracing::info!("Cleared {} stored values from {:?}", count, self.dir);
        Ok(())
    }
}
