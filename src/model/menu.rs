use serde::Serialize;

use super::entry::Selection;

/// What activating a menu item does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Annotate,
    Erase,
}

/// An activatable action bound to its own copy of the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    pub kind: ActionKind,
    pub selection: Selection,
}

/// A menu entry handed to the host.
///
/// Labels use `_` to mark the mnemonic character (`__` is a literal
/// underscore). An item either carries an action or a submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub label: String,
    pub tip: String,
    pub icon: String,
    pub action: Option<MenuAction>,
    pub submenu: Vec<MenuItem>,
}

impl MenuItem {
    pub fn action(name: &str, label: String, tip: String, icon: &str, action: MenuAction) -> Self {
        MenuItem {
            name: name.to_string(),
            label,
            tip,
            icon: icon.to_string(),
            action: Some(action),
            submenu: Vec::new(),
        }
    }

    pub fn submenu(name: &str, label: String, tip: String, icon: &str, items: Vec<MenuItem>) -> Self {
        MenuItem {
            name: name.to_string(),
            label,
            tip,
            icon: icon.to_string(),
            action: None,
            submenu: items,
        }
    }

    /// Label with mnemonic markers removed
    pub fn display_label(&self) -> String {
        strip_mnemonic(&self.label)
    }

    /// Depth-first search by item name, including this item.
    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        if self.name == name {
            return Some(self);
        }
        self.submenu.iter().find_map(|item| item.find(name))
    }
}

/// Remove mnemonic markers from a label (`E_rase` -> `Erase`).
pub fn strip_mnemonic(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// The mnemonic character of a label, lowercased (`E_rase` -> `r`).
pub fn mnemonic(label: &str) -> Option<char> {
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        if c == '_' {
            match chars.next() {
                Some('_') => continue,
                Some(next) => return next.to_lowercase().next(),
                None => return None,
            }
        }
    }
    None
}
