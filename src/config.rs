//! Notebook registry persistence.
//!
//! The registry is the array of (name, storage path) pairs that lets the
//! application rediscover its notebooks across restarts. It lives in a
//! JSON settings document shared with front-end-owned keys such as window
//! geometry and font size, so registry writes leave keys they do not own
//! untouched.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings key the registry array lives under.
const NOTEBOOKS_KEY: &str = "notebooks";

/// One persisted registry row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookEntry {
    pub name: String,

    #[serde(rename = "storagePath")]
    pub storage_path: PathBuf,
}

/// Persistence capability for the notebook registry.
///
/// Injected into [`crate::NotebookManager`] so tests and embedders can
/// substitute an in-memory store for the on-disk settings file.
pub trait ConfigStore {
    /// Read the persisted registry. An empty store yields an empty list.
    fn read_notebooks(&self) -> Result<Vec<NotebookEntry>>;

    /// Replace the persisted registry in full. May buffer; nothing is
    /// guaranteed durable until [`sync`](Self::sync).
    fn write_notebooks(&mut self, entries: &[NotebookEntry]) -> Result<()>;

    /// Flush buffered writes to stable storage.
    fn sync(&mut self) -> Result<()>;
}

/// Registry store backed by a JSON settings file.
///
/// The whole document is held in memory; `sync` rewrites the file in full.
/// Keys other than `notebooks` pass through untouched, whatever they are.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    document: Map<String, Value>,
}

impl JsonConfigStore {
    /// Open the settings file at `path`, loading the existing document if
    /// there is one. A missing file is an empty document; an unparseable
    /// one degrades to empty with a warning rather than aborting startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    warn!(
                        "Settings file {} is not a JSON object, starting empty",
                        path.display()
                    );
                    Map::new()
                }
                Err(e) => {
                    warn!("Failed to parse settings file {}: {}", path.display(), e);
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self { path, document })
    }

    /// Path of the backing settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a front-end-owned settings key (e.g. `fontSize`, `geometry`).
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Set a front-end-owned settings key. Buffered until [`ConfigStore::sync`].
    pub fn set_value(&mut self, key: &str, value: Value) {
        self.document.insert(key.to_string(), value);
    }
}

impl ConfigStore for JsonConfigStore {
    fn read_notebooks(&self) -> Result<Vec<NotebookEntry>> {
        match self.document.get(NOTEBOOKS_KEY) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn write_notebooks(&mut self, entries: &[NotebookEntry]) -> Result<()> {
        self.document
            .insert(NOTEBOOKS_KEY.to_string(), serde_json::to_value(entries)?);
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.document)?;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        debug!("Synced settings to {}", self.path.display());
        Ok(())
    }
}

/// In-memory registry store for tests and embedders. `sync` is a no-op.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: Vec<NotebookEntry>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read_notebooks(&self) -> Result<Vec<NotebookEntry>> {
        Ok(self.entries.clone())
    }

    fn write_notebooks(&mut self, entries: &[NotebookEntry]) -> Result<()> {
        self.entries = entries.to_vec();
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}
