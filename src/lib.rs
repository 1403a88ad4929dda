//! Markbook - notebook storage over directories of Markdown files
//!
//! A small persistence core for a desktop note-taking application:
//! - A [`Note`] is one Markdown file, named by its filename stem
//! - A [`Notebook`] is a directory of notes, loaded eagerly when opened
//! - The [`NotebookManager`] rediscovers notebooks across restarts through
//!   a JSON registry of (name, storage path) pairs
//!
//! All I/O is synchronous and blocking, and exactly one mutator at a time
//! is assumed. Front ends (editor, dialogs, rendering) live outside this
//! crate and drive it through the three types above.

pub mod config;
pub mod store;

pub use config::{ConfigStore, JsonConfigStore, MemoryConfigStore, NotebookEntry};
pub use store::{Note, Notebook, NotebookManager};

use std::path::PathBuf;

/// Configuration for a Markbook front end
#[derive(Debug, Clone)]
pub struct MarkbookConfig {
    /// Path to the settings file holding the notebook registry
    pub settings_file: PathBuf,

    /// Directory new notebooks default into when no explicit path is given
    pub notebooks_root: PathBuf,
}

impl MarkbookConfig {
    pub fn new(config_dir: PathBuf) -> Self {
        let settings_file = config_dir.join("settings.json");
        Self {
            settings_file,
            notebooks_root: config_dir,
        }
    }

    pub fn with_settings_file(mut self, path: PathBuf) -> Self {
        self.settings_file = path;
        self
    }

    pub fn with_notebooks_root(mut self, path: PathBuf) -> Self {
        self.notebooks_root = path;
        self
    }
}

/// Result type for Markbook operations
pub type Result<T> = std::result::Result<T, MarkbookError>;

/// Errors that can occur in Markbook
#[derive(Debug, thiserror::Error)]
pub enum MarkbookError {
    #[error("Failed to read note file {path}: {source}")]
    NoteRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write note file {path}: {source}")]
    NoteWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No notebook named '{0}'")]
    NotebookNotFound(String),

    #[error("No note named '{0}'")]
    NoteNotFound(String),

    #[error("A notebook named '{0}' is already registered")]
    NotebookExists(String),

    #[error("A note named '{0}' already exists in this notebook")]
    NoteExists(String),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
