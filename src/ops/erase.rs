use tracing::error;

use crate::host::{Confirmation, EntryCache, Prompt};
use crate::i18n::tr;
use crate::io::metadata::MetadataStore;
use crate::model::Selection;

use super::commit::{self, CommitReport, Write};
use super::extension::ActionError;

/// Asked before erasing annotations from the menu.
pub fn erase_confirmation() -> Confirmation {
    Confirmation {
        primary: tr("Do you really want to erase the annotations attached?"),
        secondary: tr("The annotations will be lost forever."),
        affirmative: tr("E_rase"),
    }
}

/// Stand-alone erase: after confirmation, delete the annotation of every
/// entry. Returns `None` when the user declined.
pub fn erase_selection(
    selection: &Selection,
    store: &dyn MetadataStore,
    cache: &dyn EntryCache,
    prompt: &mut dyn Prompt,
) -> Result<Option<CommitReport>, ActionError> {
    if selection.is_empty() {
        error!("no files were selected to be unannotated");
        return Err(ActionError::NothingToErase);
    }
    if !prompt.confirm(&erase_confirmation()) {
        return Ok(None);
    }
    Ok(Some(commit::apply(selection, Write::Unset, store, cache)))
}
