use std::path::PathBuf;

use tracing::warn;

use crate::host::EntryCache;
use crate::io::metadata::{MetadataError, MetadataStore};
use crate::model::Selection;

/// A metadata change applied to every entry of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write<'a> {
    /// Store the text as the annotation
    Set(&'a str),
    /// Delete the annotation attribute
    Unset,
}

/// One entry that could not be written.
#[derive(Debug)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub error: MetadataError,
}

/// Outcome of writing a selection, entry by entry.
#[derive(Debug, Default)]
pub struct CommitReport {
    /// Entries written (and invalidated), in selection order
    pub updated: Vec<PathBuf>,
    pub failures: Vec<WriteFailure>,
}

impl CommitReport {
    /// Nothing written and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty() && self.failures.is_empty()
    }
}

/// Apply `write` to every entry. A failing entry is logged and skipped;
/// the rest are still written. Each written entry is invalidated in the
/// host cache.
pub fn apply(
    selection: &Selection,
    write: Write<'_>,
    store: &dyn MetadataStore,
    cache: &dyn EntryCache,
) -> CommitReport {
    let mut report = CommitReport::default();
    for entry in selection {
        let result = match write {
            Write::Set(text) => store.set(&entry.path, text),
            Write::Unset => store.unset(&entry.path),
        };
        match result {
            Ok(()) => {
                cache.invalidate(entry);
                report.updated.push(entry.path.clone());
            }
            Err(error) => {
                match write {
                    Write::Set(_) => warn!("could not save file's annotations: {}", error),
                    Write::Unset => warn!("could not erase file's annotations: {}", error),
                }
                report.failures.push(WriteFailure {
                    path: entry.path.clone(),
                    error,
                });
            }
        }
    }
    report
}
