//! The notebook manager: root of the object graph and owner of the
//! persisted registry.

use crate::config::{ConfigStore, NotebookEntry};
use crate::store::Notebook;
use crate::{MarkbookError, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Owns every open [`Notebook`] and the registry that lets them be
/// rediscovered across restarts.
///
/// The registry is snapshot-replace: any change to the set of notebooks
/// rewrites the whole array. Note contents are never part of it.
pub struct NotebookManager<S: ConfigStore> {
    store: S,
    notebooks: Vec<Notebook>,
}

impl<S: ConfigStore> NotebookManager<S> {
    /// Construct a manager over `store`, opening every registered
    /// notebook. Each notebook loads all of its notes before this
    /// returns, so startup cost is proportional to the total note count.
    pub fn new(store: S) -> Result<Self> {
        let mut manager = Self {
            store,
            notebooks: Vec::new(),
        };
        manager.read_config()?;
        Ok(manager)
    }

    fn read_config(&mut self) -> Result<()> {
        for entry in self.store.read_notebooks()? {
            debug!(
                "Opening notebook {} at {}",
                entry.name,
                entry.storage_path.display()
            );
            self.notebooks
                .push(Notebook::open(entry.name, entry.storage_path));
        }
        info!("Opened {} notebook(s)", self.notebooks.len());
        Ok(())
    }

    /// Rewrite the persisted registry from the in-memory notebook list
    /// and flush it to stable storage.
    pub fn write_config(&mut self) -> Result<()> {
        let entries: Vec<NotebookEntry> = self
            .notebooks
            .iter()
            .map(|nb| NotebookEntry {
                name: nb.name().to_string(),
                storage_path: nb.storage_path().to_path_buf(),
            })
            .collect();

        self.store.write_notebooks(&entries)?;
        self.store.sync()
    }

    /// All open notebooks, insertion order.
    pub fn notebooks(&self) -> &[Notebook] {
        &self.notebooks
    }

    /// Look up a notebook by exact name.
    pub fn notebook(&self, name: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|nb| nb.name() == name)
    }

    pub fn notebook_mut(&mut self, name: &str) -> Option<&mut Notebook> {
        self.notebooks.iter_mut().find(|nb| nb.name() == name)
    }

    /// Create a notebook named `name` stored at `storage_path` and
    /// register it immediately.
    ///
    /// The storage directory is created recursively and idempotently; a
    /// directory that already holds `.md` files yields a notebook with
    /// those notes loaded. Names are unique: a second notebook with the
    /// same name is refused, since the registry could never tell the two
    /// apart again.
    pub fn create_notebook(
        &mut self,
        name: &str,
        storage_path: impl Into<PathBuf>,
    ) -> Result<&mut Notebook> {
        if name.trim().is_empty() {
            return Err(MarkbookError::InvalidName {
                name: name.to_string(),
                reason: "name is empty",
            });
        }
        if self.notebook(name).is_some() {
            return Err(MarkbookError::NotebookExists(name.to_string()));
        }

        let storage_path = storage_path.into();
        std::fs::create_dir_all(&storage_path)?;

        self.notebooks.push(Notebook::open(name, storage_path));
        self.write_config()?;

        let last = self.notebooks.len() - 1;
        Ok(&mut self.notebooks[last])
    }

    /// The injected store, e.g. for front-end-owned settings keys living
    /// in the same document as the registry.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_empty_store_yields_no_notebooks() {
        let manager = NotebookManager::new(MemoryConfigStore::new()).unwrap();
        assert!(manager.notebooks().is_empty());
        assert!(manager.notebook("anything").is_none());
    }

    #[test]
    fn test_create_notebook_registers_and_creates_directory() {
        let dir = tempdir().unwrap();
        let storage = dir.path().join("work");

        let mut manager = NotebookManager::new(MemoryConfigStore::new()).unwrap();
        manager.create_notebook("Work", &storage).unwrap();

        assert!(storage.is_dir());
        assert_eq!(manager.notebooks().len(), 1);
        assert_eq!(manager.notebook("Work").unwrap().notes().len(), 0);

        let entries = manager.store().read_notebooks().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Work");
        assert_eq!(entries[0].storage_path, storage);
    }

    #[test]
    fn test_create_notebook_existing_directory_loads_notes() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("old.md"), "already here").unwrap();

        let mut manager = NotebookManager::new(MemoryConfigStore::new()).unwrap();
        let nb = manager.create_notebook("Inbox", dir.path()).unwrap();
        assert_eq!(nb.notes().len(), 1);
        assert_eq!(nb.note("old").unwrap().contents(), "already here");
    }

    #[test]
    fn test_create_notebook_duplicate_name_fails() {
        let dir = tempdir().unwrap();

        let mut manager = NotebookManager::new(MemoryConfigStore::new()).unwrap();
        manager.create_notebook("Work", dir.path().join("a")).unwrap();
        let err = manager
            .create_notebook("Work", dir.path().join("b"))
            .unwrap_err();

        assert!(matches!(err, MarkbookError::NotebookExists(_)));
        assert_eq!(manager.notebooks().len(), 1);
    }

    #[test]
    fn test_registry_round_trip_through_memory_store() {
        let dir = tempdir().unwrap();

        let mut manager = NotebookManager::new(MemoryConfigStore::new()).unwrap();
        manager.create_notebook("Work", dir.path().join("work")).unwrap();
        manager.create_notebook("Home", dir.path().join("home")).unwrap();
        manager.write_config().unwrap();

        let entries = manager.store().read_notebooks().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Home"]);
    }
}
