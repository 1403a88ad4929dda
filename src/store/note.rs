//! A single Markdown note: a name, an in-memory contents buffer, and the
//! file backing it.

use crate::{MarkbookError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A single Markdown document held in memory.
///
/// The name is always the backing file's stem: a note called `ideas` in a
/// notebook stored at `/n/work` is backed by `/n/work/ideas.md`.
#[derive(Debug, Clone)]
pub struct Note {
    name: String,
    contents: String,
    backing_path: PathBuf,
}

impl Note {
    /// A fresh, empty note. Does not touch disk.
    pub(crate) fn new(name: String, backing_path: PathBuf) -> Self {
        Self {
            name,
            contents: String::new(),
            backing_path,
        }
    }

    pub(crate) fn with_contents(name: String, contents: String, backing_path: PathBuf) -> Self {
        Self {
            name,
            contents,
            backing_path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn backing_path(&self) -> &Path {
        &self.backing_path
    }

    /// Replace the in-memory contents buffer. Nothing reaches disk until
    /// [`save`](Self::save).
    pub fn set_contents(&mut self, contents: impl Into<String>) {
        self.contents = contents.into();
    }

    /// Write the full contents buffer to the backing file, truncating
    /// whatever was there. No diffing, no partial-write guard.
    pub fn save(&self) -> Result<()> {
        let write_err = |source: std::io::Error| MarkbookError::NoteWrite {
            path: self.backing_path.clone(),
            source,
        };

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.backing_path)
            .map_err(write_err)?;
        file.write_all(self.contents.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        Ok(())
    }
}

/// Read a Markdown file in full as UTF-8 text.
pub(crate) fn read_markdown_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| MarkbookError::NoteRead {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_overwrites_backing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ideas.md");
        std::fs::write(&path, "old contents that are longer").unwrap();

        let mut note = Note::new("ideas".to_string(), path.clone());
        note.set_contents("# Ideas\n");
        note.save().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Ideas\n");
    }

    #[test]
    fn test_save_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.md");

        let note = Note::new("fresh".to_string(), path.clone());
        note.save().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_save_fails_on_unwritable_path() {
        let dir = tempdir().unwrap();
        // The parent directory does not exist, so the open must fail.
        let path = dir.path().join("missing-dir").join("note.md");

        let note = Note::new("note".to_string(), path);
        let err = note.save().unwrap_err();
        assert!(matches!(err, MarkbookError::NoteWrite { .. }));
    }

    #[test]
    fn test_read_markdown_file_missing() {
        let dir = tempdir().unwrap();
        let err = read_markdown_file(&dir.path().join("absent.md")).unwrap_err();
        assert!(matches!(err, MarkbookError::NoteRead { .. }));
    }
}
