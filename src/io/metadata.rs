use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Attribute name annotations are stored under.
pub const ANNOTATION_ATTRIBUTE: &str = "metadata::annotation";

/// Error type for metadata reads and writes
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("could not access metadata of {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("metadata database {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("annotation of {path} is not valid UTF-8")]
    InvalidText { path: PathBuf },
    #[error("could not acquire lock on {path}: another process may be writing")]
    LockTimeout { path: PathBuf },
    #[error("extended attributes are not supported on this platform")]
    Unsupported,
}

/// Read/write access to the annotation attribute of file-system entries.
///
/// Every call is synchronous and may block on the file system.
pub trait MetadataStore {
    /// Current annotation, `None` when the entry has none.
    fn get(&self, path: &Path) -> Result<Option<String>, MetadataError>;
    /// Store `value` as the annotation.
    fn set(&self, path: &Path, value: &str) -> Result<(), MetadataError>;
    /// Delete the annotation attribute. Deleting a missing attribute succeeds.
    fn unset(&self, path: &Path) -> Result<(), MetadataError>;
}

/// In-process store for embedding hosts and tests.
///
/// Paths passed to [`MemoryStore::deny`] fail every operation with a
/// permission error, the way an unreadable entry would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<PathBuf, String>>,
    denied: RefCell<HashSet<PathBuf>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding of an annotation.
    pub fn with(self, path: impl Into<PathBuf>, value: &str) -> Self {
        self.values.borrow_mut().insert(path.into(), value.to_string());
        self
    }

    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.denied.borrow_mut().insert(path.into());
    }

    /// Number of `get` calls served so far (including failed ones).
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of `set`/`unset` calls served so far (including failed ones).
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Raw view of the stored value, bypassing counters and denials.
    pub fn peek(&self, path: &Path) -> Option<String> {
        self.values.borrow().get(path).cloned()
    }

    fn check(&self, path: &Path) -> Result<(), MetadataError> {
        if self.denied.borrow().contains(path) {
            return Err(MetadataError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        Ok(())
    }
}

impl MetadataStore for MemoryStore {
    fn get(&self, path: &Path) -> Result<Option<String>, MetadataError> {
        self.reads.set(self.reads.get() + 1);
        self.check(path)?;
        Ok(self.values.borrow().get(path).cloned())
    }

    fn set(&self, path: &Path, value: &str) -> Result<(), MetadataError> {
        self.writes.set(self.writes.get() + 1);
        self.check(path)?;
        self.values
            .borrow_mut()
            .insert(path.to_path_buf(), value.to_string());
        Ok(())
    }

    fn unset(&self, path: &Path) -> Result<(), MetadataError> {
        self.writes.set(self.writes.get() + 1);
        self.check(path)?;
        self.values.borrow_mut().remove(path);
        Ok(())
    }
}
