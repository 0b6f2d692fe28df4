//! Key-value slots for persisted records
//!
//! The store only needs "read one string" and "write one string" under a
//! fixed key, so the backend is a trait: files under the platform config
//! directory for the application, a map in memory for tests and tooling.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::storage::{APP_DIR, RECORD_EXTENSION};

pub trait Storage {
    /// Read the value stored under `key`, `Ok(None)` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per record inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<config dir>/flux-studio`, falling back to the working directory
    pub fn default_location() -> Self {
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push(APP_DIR);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{RECORD_EXTENSION}"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        debug!(path = %path.display(), bytes = contents.len(), "Read stored record");
        Ok(Some(contents))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create storage directory {:?}", self.dir))?;

        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {:?}", path))?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote stored record");
        Ok(())
    }
}

/// In-memory slots; writes can be made to fail to exercise degradation paths
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Make every subsequent write fail (simulates a full or read-only slot)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            bail!("storage quota exceeded while writing '{key}'");
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
