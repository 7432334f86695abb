use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{Config, StoreBackend};

use super::database::DatabaseStore;
use super::metadata::MetadataStore;
use super::xattr::XattrStore;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the user's home directory
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Default config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_or_root().join(".config"));
    config_dir.join("annotate").join("config.toml")
}

/// Default metadata database path, respecting XDG_DATA_HOME
pub fn default_database_path() -> PathBuf {
    let data_dir = std::env::var_os("XDG_DATA_HOME")
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_or_root().join(".local").join("share"));
    data_dir.join("annotate").join("metadata.json")
}

fn home_or_root() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Read config from an explicit file, which must exist.
pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read config from `explicit` if given, else from the default location.
/// A missing default config file yields the built-in defaults.
pub fn read_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config_from(path);
    }
    let path = config_path();
    if !path.exists() {
        return Ok(Config::default());
    }
    read_config_from(&path)
}

/// Build the metadata store the config asks for. `database_override`
/// (the `--store` flag) wins over the configured database path and
/// forces the database backend.
pub fn open_store(config: &Config, database_override: Option<&Path>) -> Box<dyn MetadataStore> {
    if let Some(path) = database_override {
        return Box::new(DatabaseStore::new(path));
    }
    match config.store.backend {
        StoreBackend::Database => {
            let path = config
                .store
                .path
                .clone()
                .unwrap_or_else(default_database_path);
            Box::new(DatabaseStore::new(path))
        }
        StoreBackend::Xattr => Box::new(XattrStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_config_must_exist() {
        let tmp = TempDir::new().unwrap();
        let err = read_config(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn explicit_config_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[store\nbackend = ").unwrap();
        let err = read_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn explicit_config_is_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[emblem]\nname = \"emblem-important\"\n").unwrap();
        let config = read_config(Some(&path)).unwrap();
        assert_eq!(config.emblem.name, "emblem-important");
    }

    #[test]
    fn override_forces_database_store() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.store.backend = StoreBackend::Xattr;
        let db = tmp.path().join("meta.json");
        let store = open_store(&config, Some(&db));
        let entry = tmp.path().join("a.txt");
        store.set(&entry, "note").unwrap();
        assert!(db.exists());
        assert_eq!(store.get(&entry).unwrap().as_deref(), Some("note"));
    }

    #[test]
    fn configured_database_path_is_used() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("configured.json");
        let mut config = Config::default();
        config.store.path = Some(db.clone());
        let store = open_store(&config, None);
        store.set(&tmp.path().join("b"), "x").unwrap();
        assert!(db.exists());
    }
}
