//! Seams between the annotation core and the process hosting it.
//!
//! The host implements [`EntryCache`], [`Prompt`] and [`EmblemSink`]; the
//! core implements [`MenuSource`] and [`InfoSource`] (see
//! [`crate::ops::extension::Extension`]).

use std::cell::RefCell;
use std::path::PathBuf;

use crate::model::{Entry, MenuItem, Selection};

/// Host-side cache of per-entry extension info (emblems).
pub trait EntryCache {
    /// Forget what was computed for `entry` so its emblems get refreshed.
    fn invalidate(&self, entry: &Entry);
}

/// A host with nothing cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl EntryCache for NoCache {
    fn invalidate(&self, _entry: &Entry) {}
}

/// Remembers which entries were invalidated, in order.
#[derive(Debug, Default)]
pub struct RecordingCache {
    invalidated: RefCell<Vec<PathBuf>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidated(&self) -> Vec<PathBuf> {
        self.invalidated.borrow().clone()
    }
}

impl EntryCache for RecordingCache {
    fn invalidate(&self, entry: &Entry) {
        self.invalidated.borrow_mut().push(entry.path.clone());
    }
}

/// Text of a destructive-action confirmation.
///
/// `affirmative` is the label of the button that performs the action and
/// may carry a `_` mnemonic marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub primary: String,
    pub secondary: String,
    pub affirmative: String,
}

/// Modal yes/no question about a destructive action.
pub trait Prompt {
    /// True only if the user chose the affirmative action. Any other
    /// dismissal, including closing the prompt, is false.
    fn confirm(&mut self, request: &Confirmation) -> bool;
}

impl<F> Prompt for F
where
    F: FnMut(&Confirmation) -> bool,
{
    fn confirm(&mut self, request: &Confirmation) -> bool {
        self(request)
    }
}

/// Answers every confirmation with yes (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&mut self, _request: &Confirmation) -> bool {
        true
    }
}

/// Receives emblems for an entry being displayed.
pub trait EmblemSink {
    fn add_emblem(&mut self, emblem: &str);
}

impl EmblemSink for Vec<String> {
    fn add_emblem(&mut self, emblem: &str) {
        self.push(emblem.to_string());
    }
}

/// Result of an info-provider update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    Complete,
    Failed,
}

/// Supplies context-menu items.
pub trait MenuSource {
    /// Items for a selection of one or more entries.
    fn file_items(&self, selection: &Selection) -> Vec<MenuItem>;
    /// Items for the background of an open folder.
    fn background_items(&self, folder: &Entry) -> Vec<MenuItem>;
}

/// Supplies per-entry display info.
pub trait InfoSource {
    fn update_file_info(&self, entry: &Entry, emblems: &mut dyn EmblemSink) -> OperationResult;
}
