use std::path::Path;

use serde::Serialize;

use crate::model::{ActionKind, MenuItem};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct MenuItemJson {
    pub name: String,
    pub label: String,
    pub tip: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<MenuItemJson>,
}

#[derive(Serialize)]
pub struct AnnotationJson {
    pub path: String,
    pub annotation: Option<String>,
}

#[derive(Serialize)]
pub struct EmblemsJson {
    pub path: String,
    pub emblems: Vec<String>,
    /// False when the entry's metadata could not be read
    pub complete: bool,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn menu_item_to_json(item: &MenuItem) -> MenuItemJson {
    MenuItemJson {
        name: item.name.clone(),
        label: item.label.clone(),
        tip: item.tip.clone(),
        icon: item.icon.clone(),
        action: item.action.as_ref().map(|a| a.kind),
        targets: item
            .action
            .as_ref()
            .map(|a| a.selection.iter().map(|e| path_string(&e.path)).collect())
            .unwrap_or_default(),
        submenu: item.submenu.iter().map(menu_item_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Render a menu tree as indented text, mnemonics stripped
pub fn format_menu(items: &[MenuItem]) -> String {
    let mut out = String::new();
    for item in items {
        format_menu_item(item, 0, &mut out);
    }
    out
}

fn format_menu_item(item: &MenuItem, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let marker = if item.submenu.is_empty() { "-" } else { "+" };
    out.push_str(&format!(
        "{}{} {}  ({})\n",
        indent,
        marker,
        item.display_label(),
        item.tip
    ));
    for child in &item.submenu {
        format_menu_item(child, depth + 1, out);
    }
}

/// A rewritten entry with the emblems it carries after the host refresh
pub fn format_refreshed(verb: &str, path: &Path, emblems: &[String]) -> String {
    if emblems.is_empty() {
        format!("{} {}", verb, path.display())
    } else {
        format!("{} {} [{}]", verb, path.display(), emblems.join(", "))
    }
}
