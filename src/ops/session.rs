use std::collections::TryReserveError;
use std::path::Path;

use tracing::error;

use crate::host::{Confirmation, EntryCache, Prompt};
use crate::i18n::tr;
use crate::io::metadata::{MetadataError, MetadataStore};
use crate::model::Selection;

use super::commit::{self, CommitReport, Write};
use super::title::window_title;

/// Style class the host attaches to the discard control
pub const DISCARD_STYLE_CLASS: &str = "annotations-discard";

/// Error type for opening an edit session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no files were selected to be annotated")]
    EmptySelection,
    #[error("could not access file's annotations: {0}")]
    Metadata(#[from] MetadataError),
    #[error("error allocating memory: {0}")]
    Allocation(#[from] TryReserveError),
}

/// The "Discard changes" control, present only while the buffer is modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardAffordance {
    pub label: String,
    pub style_class: &'static str,
}

impl DiscardAffordance {
    pub fn new() -> Self {
        DiscardAffordance {
            label: tr("_Discard changes"),
            style_class: DISCARD_STYLE_CLASS,
        }
    }
}

impl Default for DiscardAffordance {
    fn default() -> Self {
        DiscardAffordance::new()
    }
}

/// What a modified-flag signal did to the discard affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceChange {
    Created,
    Destroyed,
    Unchanged,
}

/// Result of [`EditSession::open`]
#[derive(Debug)]
pub enum OpenOutcome {
    Opened(EditSession),
    /// The user declined to replace differing annotations; nothing changed.
    Declined,
}

/// How the dialog was dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Window-close gesture: commit if modified
    Close,
    /// The discard control was activated
    Discard,
}

/// Result of dismissing the dialog
#[derive(Debug)]
pub enum SessionOutcome {
    /// Session ended through a normal close
    Closed(CommitReport),
    /// Session ended and edits were thrown away
    Discarded,
    /// The user backed out of discarding; the session continues
    StillOpen(EditSession),
}

/// One open annotation dialog.
///
/// Owns a private copy of the selection. The session is consumed when the
/// dialog closes, whichever way it closes.
#[derive(Debug)]
pub struct EditSession {
    selection: Selection,
    title: String,
    baseline: String,
    buffer: String,
    modified: bool,
    discard: Option<DiscardAffordance>,
}

impl EditSession {
    /// Load the annotation shared by `selection` and open a session on it.
    ///
    /// Entries without an annotation are ignored when looking for the shared
    /// value. If two entries hold different annotations the user is asked
    /// whether to start from a blank annotation instead; declining opens
    /// nothing. A metadata read failure aborts the open.
    pub fn open(
        selection: &Selection,
        store: &dyn MetadataStore,
        prompt: &mut dyn Prompt,
        home: Option<&Path>,
    ) -> Result<OpenOutcome, SessionError> {
        if selection.is_empty() {
            error!("no files were selected to be annotated");
            return Err(SessionError::EmptySelection);
        }

        let mut shared: Option<String> = None;
        for entry in selection {
            let probe = store.get(&entry.path).map_err(|e| {
                error!("could not access file's annotations: {}", e);
                e
            })?;
            let Some(value) = probe else {
                continue;
            };
            match &shared {
                None => shared = Some(value),
                Some(current) if *current == value => {}
                Some(_) => {
                    if !prompt.confirm(&conflict_confirmation()) {
                        return Ok(OpenOutcome::Declined);
                    }
                    shared = None;
                    break;
                }
            }
        }

        let baseline = shared.unwrap_or_default();
        let mut buffer = String::new();
        buffer.try_reserve_exact(baseline.len()).map_err(|e| {
            error!("error allocating memory: {}", e);
            e
        })?;
        buffer.push_str(&baseline);

        Ok(OpenOutcome::Opened(EditSession {
            selection: selection.clone(),
            title: window_title(selection, home),
            baseline,
            buffer,
            modified: false,
            discard: None,
        }))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current buffer contents
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Text the session was opened with
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn discard_affordance(&self) -> Option<&DiscardAffordance> {
        self.discard.as_ref()
    }

    /// React to the editing surface's modified signal. The affordance is
    /// created on false -> true and destroyed on true -> false; a signal that
    /// already matches the affordance's presence changes nothing.
    pub fn set_modified(&mut self, modified: bool) -> AffordanceChange {
        self.modified = modified;
        match (modified, self.discard.is_some()) {
            (true, false) => {
                self.discard = Some(DiscardAffordance::new());
                AffordanceChange::Created
            }
            (false, true) => {
                self.discard = None;
                AffordanceChange::Destroyed
            }
            _ => AffordanceChange::Unchanged,
        }
    }

    /// Replace the buffer contents. The buffer counts as modified while it
    /// differs from the baseline.
    pub fn replace_text(&mut self, text: impl Into<String>) -> AffordanceChange {
        self.buffer = text.into();
        let modified = self.buffer != self.baseline;
        if modified == self.modified {
            return AffordanceChange::Unchanged;
        }
        self.set_modified(modified)
    }

    /// Normal close. An unmodified session writes nothing; an empty buffer
    /// erases the annotation from every entry; anything else is stored on
    /// every entry.
    pub fn close(self, store: &dyn MetadataStore, cache: &dyn EntryCache) -> CommitReport {
        if !self.modified {
            return CommitReport::default();
        }
        let write = if self.buffer.is_empty() {
            Write::Unset
        } else {
            Write::Set(&self.buffer)
        };
        commit::apply(&self.selection, write, store, cache)
    }

    /// Discard request. Modified sessions ask first; declining hands the
    /// session back untouched.
    pub fn discard(self, prompt: &mut dyn Prompt) -> SessionOutcome {
        if self.modified && !prompt.confirm(&discard_confirmation()) {
            return SessionOutcome::StillOpen(self);
        }
        SessionOutcome::Discarded
    }

    /// Dispatch a dialog response to [`close`](Self::close) or
    /// [`discard`](Self::discard).
    pub fn respond(
        self,
        response: Response,
        store: &dyn MetadataStore,
        cache: &dyn EntryCache,
        prompt: &mut dyn Prompt,
    ) -> SessionOutcome {
        match response {
            Response::Close => SessionOutcome::Closed(self.close(store, cache)),
            Response::Discard => self.discard(prompt),
        }
    }
}

/// Asked when the selection holds differing annotations.
pub fn conflict_confirmation() -> Confirmation {
    Confirmation {
        primary: tr("At least two annotations in the file selection differ"),
        secondary: tr("This will set up a blank new annotation."),
        affirmative: tr("_OK"),
    }
}

/// Asked before throwing away unsaved edits.
pub fn discard_confirmation() -> Confirmation {
    Confirmation {
        primary: tr("Are you sure you want to discard the current changes?"),
        secondary: tr("This action cannot be undone."),
        affirmative: tr("_Discard changes"),
    }
}
