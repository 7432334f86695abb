use std::path::{Path, PathBuf};

use tracing::debug;

use crate::host::{EmblemSink, EntryCache, InfoSource, MenuSource, OperationResult, Prompt};
use crate::io::metadata::MetadataStore;
use crate::model::{ActionKind, Config, Entry, MenuAction, MenuItem, Selection};

use super::classify::{build_menu, classify};
use super::commit::CommitReport;
use super::erase::erase_selection;
use super::session::{EditSession, OpenOutcome, SessionError};

/// Error type for menu activation
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("no files were selected to be unannotated")]
    NothingToErase,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// What activating a menu action produced
#[derive(Debug)]
pub enum Activation {
    /// An editor dialog should be shown for this session
    Session(EditSession),
    /// Annotations were erased
    Erased(CommitReport),
    /// The user declined a confirmation; nothing changed
    Declined,
}

/// The annotations extension: menu and info provider over one metadata store.
pub struct Extension {
    store: Box<dyn MetadataStore>,
    emblem: String,
    home: Option<PathBuf>,
}

impl Extension {
    pub fn new(store: Box<dyn MetadataStore>, config: &Config, home: Option<PathBuf>) -> Self {
        Extension {
            store,
            emblem: config.emblem.name.clone(),
            home,
        }
    }

    pub fn store(&self) -> &dyn MetadataStore {
        self.store.as_ref()
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Run a menu action against its bound selection.
    pub fn activate(
        &self,
        action: &MenuAction,
        cache: &dyn EntryCache,
        prompt: &mut dyn Prompt,
    ) -> Result<Activation, ActionError> {
        match action.kind {
            ActionKind::Annotate => {
                match EditSession::open(&action.selection, self.store(), prompt, self.home())? {
                    OpenOutcome::Opened(session) => Ok(Activation::Session(session)),
                    OpenOutcome::Declined => Ok(Activation::Declined),
                }
            }
            ActionKind::Erase => {
                match erase_selection(&action.selection, self.store(), cache, prompt)? {
                    Some(report) => Ok(Activation::Erased(report)),
                    None => Ok(Activation::Declined),
                }
            }
        }
    }
}

impl MenuSource for Extension {
    fn file_items(&self, selection: &Selection) -> Vec<MenuItem> {
        if selection.is_empty() {
            return Vec::new();
        }
        build_menu(&classify(selection, self.store()), selection)
    }

    fn background_items(&self, folder: &Entry) -> Vec<MenuItem> {
        self.file_items(&Selection::single(folder.clone()))
    }
}

impl InfoSource for Extension {
    fn update_file_info(&self, entry: &Entry, emblems: &mut dyn EmblemSink) -> OperationResult {
        match self.store.get(&entry.path) {
            Ok(Some(_)) => {
                emblems.add_emblem(&self.emblem);
                OperationResult::Complete
            }
            Ok(None) => OperationResult::Complete,
            Err(e) => {
                debug!("cannot get annotations of {}: {}", entry.path.display(), e);
                OperationResult::Failed
            }
        }
    }
}
