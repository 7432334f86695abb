use tracing::debug;

use crate::i18n::{ntr, tr};
use crate::io::metadata::MetadataStore;
use crate::model::{ActionKind, EntryKind, MenuAction, MenuItem, Selection};

pub const ITEM_ANNOTATIONS: &str = "Annotations::annotations";
pub const ITEM_ANNOTATE: &str = "Annotations::annotate";
pub const ITEM_UNANNOTATE: &str = "Annotations::unannotate";

const ICON_ANNOTATE: &str = "annotate";
const ICON_UNANNOTATE: &str = "unannotate";

/// Which kinds of entries a selection contains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionKinds {
    pub files: bool,
    pub directories: bool,
}

/// How a selection is phrased in labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    Files,
    Directories,
    /// Files and directories together (or nothing seen at all)
    Mixed,
}

impl SelectionKinds {
    fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::File => self.files = true,
            EntryKind::Directory => self.directories = true,
        }
    }

    pub fn composition(&self) -> Composition {
        match (self.files, self.directories) {
            (true, false) => Composition::Files,
            (false, true) => Composition::Directories,
            _ => Composition::Mixed,
        }
    }
}

/// Whether annotated and/or unannotated entries were seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationPresence {
    pub annotated: bool,
    pub unannotated: bool,
}

impl AnnotationPresence {
    fn record(&mut self, annotated: bool) {
        if annotated {
            self.annotated = true;
        } else {
            self.unannotated = true;
        }
    }

    /// Both facts are known; further probes can't change anything.
    pub fn is_settled(&self) -> bool {
        self.annotated && self.unannotated
    }
}

/// Summary of a selection that drives the menu layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kinds: SelectionKinds,
    pub presence: AnnotationPresence,
    pub len: usize,
}

/// Scan a selection once. Every entry's kind is recorded; annotation probes
/// stop as soon as both an annotated and an unannotated entry were seen.
/// An entry whose metadata can't be read counts as unannotated.
pub fn classify(selection: &Selection, store: &dyn MetadataStore) -> Classification {
    let mut kinds = SelectionKinds::default();
    let mut presence = AnnotationPresence::default();

    for entry in selection {
        kinds.record(entry.kind);
        if presence.is_settled() {
            continue;
        }
        match store.get(&entry.path) {
            Ok(value) => presence.record(value.is_some()),
            Err(e) => {
                debug!("cannot get annotations of {}: {}", entry.path.display(), e);
                presence.record(false);
            }
        }
    }

    Classification {
        kinds,
        presence,
        len: selection.len(),
    }
}

/// Build the menu for a classified selection. Every action carries its own
/// copy of `selection`.
pub fn build_menu(classification: &Classification, selection: &Selection) -> Vec<MenuItem> {
    let n = classification.len;
    let composition = classification.kinds.composition();
    let bind = |kind| MenuAction {
        kind,
        selection: selection.clone(),
    };

    if !classification.presence.annotated {
        let label = match composition {
            Composition::Directories => ntr("_Annotate directory", "_Annotate directories", n),
            Composition::Files => ntr("_Annotate file", "_Annotate files", n),
            Composition::Mixed => tr("_Annotate objects"),
        };
        return vec![MenuItem::action(
            ITEM_ANNOTATE,
            label,
            ntr(
                "Attach an annotation to the selected object",
                "Attach an annotation to the selected objects",
                n,
            ),
            ICON_ANNOTATE,
            bind(ActionKind::Annotate),
        )];
    }

    let (edit_label, edit_tip) = if classification.presence.unannotated {
        (
            tr("_Edit and extend"),
            tr("Edit and extend the annotations attached to the selected objects"),
        )
    } else {
        (
            tr("_Edit"),
            ntr(
                "Edit the annotations attached to the selected object",
                "Edit the annotations attached to the selected objects",
                n,
            ),
        )
    };

    let edit = MenuItem::action(
        ITEM_ANNOTATE,
        edit_label,
        edit_tip,
        ICON_ANNOTATE,
        bind(ActionKind::Annotate),
    );
    let erase = MenuItem::action(
        ITEM_UNANNOTATE,
        tr("E_rase"),
        ntr(
            "Remove the annotations attached to the selected object",
            "Remove the annotations attached to the selected objects",
            n,
        ),
        ICON_UNANNOTATE,
        bind(ActionKind::Erase),
    );

    let label = match composition {
        Composition::Directories => ntr("Directory's _annotations", "Directories' _annotations", n),
        Composition::Files => ntr("File's _annotations", "Files' _annotations", n),
        Composition::Mixed => tr("Objects' _annotations"),
    };
    vec![MenuItem::submenu(
        ITEM_ANNOTATIONS,
        label,
        ntr(
            "Choose an action for the object's annotations",
            "Choose an action for the objects' annotations",
            n,
        ),
        ICON_UNANNOTATE,
        vec![edit, erase],
    )]
}
