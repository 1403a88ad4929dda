//! A notebook: one directory of Markdown files, loaded eagerly.

use crate::store::note::{read_markdown_file, Note};
use crate::store::MARKDOWN_EXT;
use crate::{MarkbookError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Characters refused in note names because they are unsafe in filenames
/// on at least one supported platform.
const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// An ordered collection of [`Note`]s backed by one directory.
///
/// Notes are loaded once, at construction; changes made to the directory
/// afterwards are never observed. The in-memory order is the filesystem
/// enumeration order, which is not guaranteed stable across platforms.
#[derive(Debug)]
pub struct Notebook {
    name: String,
    storage_path: PathBuf,
    notes: Vec<Note>,
}

impl Notebook {
    /// Open a notebook over `storage_path`, eagerly loading every note.
    ///
    /// A missing or unreadable directory yields an empty notebook; a note
    /// file that cannot be read loads with empty contents. Neither aborts.
    pub fn open(name: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        let mut notebook = Self {
            name: name.into(),
            storage_path: storage_path.into(),
            notes: Vec::new(),
        };
        notebook.load_notes();
        notebook
    }

    /// Enumerate `*.md` files directly inside the storage directory.
    /// Non-recursive; dotfiles are skipped.
    fn load_notes(&mut self) {
        let entries = match std::fs::read_dir(&self.storage_path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Failed to enumerate notebook directory {}: {}",
                    self.storage_path.display(),
                    e
                );
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            if path.extension().map_or(true, |ext| ext != MARKDOWN_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let contents = match read_markdown_file(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!("{}", e);
                    String::new()
                }
            };

            debug!("Loaded note {} from {}", stem, path.display());
            self.notes
                .push(Note::with_contents(stem.to_string(), contents, path));
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// All notes, insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Look up a note by exact name. First match wins.
    pub fn note(&self, name: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.name() == name)
    }

    pub fn note_mut(&mut self, name: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.name() == name)
    }

    /// Create a new empty note named `name`.
    ///
    /// The backing file is created exclusively: if `<dir>/<name>.md`
    /// already exists the call fails with [`MarkbookError::NoteExists`]
    /// and the in-memory collection is left untouched.
    pub fn create_note(&mut self, name: &str) -> Result<&mut Note> {
        validate_note_name(name)?;

        let backing_path = self
            .storage_path
            .join(format!("{}.{}", name, MARKDOWN_EXT));

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&backing_path)
        {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(MarkbookError::NoteExists(name.to_string()));
            }
            Err(source) => {
                return Err(MarkbookError::NoteWrite {
                    path: backing_path,
                    source,
                });
            }
        }

        let note = Note::new(name.to_string(), backing_path);
        note.save()?;
        self.notes.push(note);

        let last = self.notes.len() - 1;
        Ok(&mut self.notes[last])
    }
}

/// Reject names that cannot become a portable `<name>.md` filename.
fn validate_note_name(name: &str) -> Result<()> {
    let invalid = |reason| MarkbookError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name would create a hidden file"));
    }
    if name
        .chars()
        .any(|c| FORBIDDEN_NAME_CHARS.contains(&c) || c.is_control())
    {
        return Err(invalid("name contains a character unsafe in filenames"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_loads_markdown_files_only() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "hello").unwrap();
        std::fs::write(dir.path().join("b.md"), "world").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not markdown").unwrap();
        std::fs::write(dir.path().join(".hidden.md"), "dotfile").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("nested.md"), "nested").unwrap();

        let nb = Notebook::open("Test", dir.path());
        assert_eq!(nb.notes().len(), 2);

        let mut names: Vec<&str> = nb.notes().iter().map(|n| n.name()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(nb.note("a").unwrap().contents(), "hello");
        assert_eq!(nb.note("b").unwrap().contents(), "world");
    }

    #[test]
    fn test_open_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let nb = Notebook::open("Ghost", dir.path().join("nowhere"));
        assert!(nb.notes().is_empty());
    }

    #[test]
    fn test_note_lookup_miss_returns_none() {
        let dir = tempdir().unwrap();
        let nb = Notebook::open("Test", dir.path());
        assert!(nb.note("missing").is_none());
    }

    #[test]
    fn test_create_note_writes_empty_file() {
        let dir = tempdir().unwrap();
        let mut nb = Notebook::open("Test", dir.path());

        let note = nb.create_note("ideas").unwrap();
        assert_eq!(note.contents(), "");
        assert_eq!(note.backing_path(), dir.path().join("ideas.md"));
        assert_eq!(std::fs::read_to_string(dir.path().join("ideas.md")).unwrap(), "");
    }

    #[test]
    fn test_create_note_duplicate_fails() {
        let dir = tempdir().unwrap();
        let mut nb = Notebook::open("Test", dir.path());

        nb.create_note("ideas").unwrap();
        let err = nb.create_note("ideas").unwrap_err();
        assert!(matches!(err, MarkbookError::NoteExists(_)));
        assert_eq!(nb.notes().len(), 1);
    }

    #[test]
    fn test_create_note_refuses_existing_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("draft.md"), "kept").unwrap();

        // Freshly opened notebook already holds the note; creating it
        // again must not truncate the file on disk.
        let mut nb = Notebook::open("Test", dir.path());
        let err = nb.create_note("draft").unwrap_err();
        assert!(matches!(err, MarkbookError::NoteExists(_)));
        assert_eq!(std::fs::read_to_string(dir.path().join("draft.md")).unwrap(), "kept");
    }

    #[test]
    fn test_create_note_rejects_bad_names() {
        let dir = tempdir().unwrap();
        let mut nb = Notebook::open("Test", dir.path());

        for name in ["", "   ", ".hidden", "a/b", "a\\b", "what?", "a\nb"] {
            let err = nb.create_note(name).unwrap_err();
            assert!(
                matches!(err, MarkbookError::InvalidName { .. }),
                "expected InvalidName for {:?}",
                name
            );
        }
        assert!(nb.notes().is_empty());
    }

    #[test]
    fn test_unreadable_note_loads_empty() {
        // Simulated with invalid UTF-8, which read_to_string refuses.
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("binary.md"), [0xffu8, 0xfe, 0x00]).unwrap();

        let nb = Notebook::open("Test", dir.path());
        assert_eq!(nb.notes().len(), 1);
        assert_eq!(nb.note("binary").unwrap().contents(), "");
    }
}
