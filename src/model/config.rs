use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub emblem: EmblemConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where annotations are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Per-user metadata database file
    #[default]
    Database,
    /// `user.` extended attributes on the entries themselves
    Xattr,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database file location (default: $XDG_DATA_HOME/annotate/metadata.json)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmblemConfig {
    /// Emblem attached to annotated entries
    #[serde(default = "default_emblem")]
    pub name: String,
}

impl Default for EmblemConfig {
    fn default() -> Self {
        EmblemConfig {
            name: default_emblem(),
        }
    }
}

fn default_emblem() -> String {
    "emblem-annotations".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.backend, StoreBackend::Database);
        assert!(config.store.path.is_none());
        assert_eq!(config.emblem.name, "emblem-annotations");
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn parses_all_sections() {
        let config: Config = toml::from_str(
            r##"
[store]
backend = "xattr"
path = "/tmp/meta.json"

[emblem]
name = "emblem-notes"

[ui]
show_key_hints = false
colors = { highlight = "#FF0000" }
"##,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Xattr);
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/meta.json")));
        assert_eq!(config.emblem.name, "emblem-notes");
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.ui.colors.get("highlight").map(String::as_str), Some("#FF0000"));
    }
}
