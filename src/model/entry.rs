use std::path::{Path, PathBuf};

use serde::Serialize;

/// Whether an entry is a directory or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A file-system entry subject to annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Entry {
            path: path.into(),
            kind,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Entry::new(path, EntryKind::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Entry::new(path, EntryKind::Directory)
    }

    /// Build an entry from what is on disk right now.
    pub fn from_disk(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Ok(Entry::new(path, kind))
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// An ordered set of entries the user selected.
///
/// Cloning a selection is how menu actions and edit sessions take their
/// private copy, independent of whatever the host does with its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<Entry>,
}

impl Selection {
    pub fn new(entries: Vec<Entry>) -> Self {
        Selection { entries }
    }

    pub fn single(entry: Entry) -> Self {
        Selection {
            entries: vec![entry],
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl FromIterator<Entry> for Selection {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Selection::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
