//! Durable key-value storage for the save catalog.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ProjectError;

/// Env var consulted by [`StorageConfig::from_env`].
pub const PROJECT_DIR_ENV: &str = "ENGINE_PROJECT_DIR";

const DEFAULT_PROJECT_DIR: &str = ".engine_projects";

/// A string blob store. Values are read and written whole.
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, ProjectError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), ProjectError>;
}

/// Where file-backed storage lives.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl StorageConfig {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$ENGINE_PROJECT_DIR`, or `.engine_projects` in the working directory.
    #[must_use]
    pub fn from_env() -> Self {
        let dir = std::env::var(PROJECT_DIR_ENV).unwrap_or_else(|_| DEFAULT_PROJECT_DIR.to_string());
        Self::new(dir)
    }

    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(config: StorageConfig) -> Self {
        Self { dir: config.dir }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, ProjectError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ProjectError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), ProjectError> {
        fs::create_dir_all(&self.dir).map_err(|source| ProjectError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Atomic replace via a sibling temp file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| ProjectError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| ProjectError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = value.len(), "stored");
        Ok(())
    }
}

/// In-process storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, ProjectError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), ProjectError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("projects").unwrap(), None);
        store.write("projects", "[]").unwrap();
        assert_eq!(store.read("projects").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(StorageConfig::new(dir.path()));
        assert_eq!(store.read("projects").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_dir_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("saves");
        let mut store = FileStore::new(StorageConfig::new(&nested));

        store.write("projects", "[1]").unwrap();
        store.write("projects", "[2]").unwrap();

        assert_eq!(store.read("projects").unwrap().as_deref(), Some("[2]"));
        assert!(nested.join("projects.json").exists());
        assert!(!nested.join("projects.json.tmp").exists());
    }
}
