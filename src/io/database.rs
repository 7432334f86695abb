use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::lock::FileLock;
use super::metadata::{ANNOTATION_ATTRIBUTE, MetadataError, MetadataStore};

const DATABASE_VERSION: u32 = 1;

/// On-disk layout of the metadata database.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Database {
    version: u32,
    /// Absolute path -> attribute name -> value
    #[serde(default)]
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl Default for Database {
    fn default() -> Self {
        Database {
            version: DATABASE_VERSION,
            entries: IndexMap::new(),
        }
    }
}

/// Metadata kept in a per-user JSON database keyed by absolute path.
///
/// Reads go straight to the file. Writes take the database lock, re-read,
/// modify and replace the file atomically.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    path: PathBuf,
}

impl DatabaseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatabaseStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Database, MetadataError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Database::default()),
            Err(e) => {
                return Err(MetadataError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(Database::default());
        }
        serde_json::from_str(&text).map_err(|e| MetadataError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn save(&self, db: &Database) -> Result<(), MetadataError> {
        let content = serde_json::to_vec_pretty(db).map_err(|e| MetadataError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;
        atomic_write(&self.path, &content).map_err(|e| MetadataError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    fn update<F>(&self, entry: &Path, f: F) -> Result<(), MetadataError>
    where
        F: FnOnce(&mut IndexMap<String, IndexMap<String, String>>, String),
    {
        let key = entry_key(entry)?;
        let _lock = FileLock::acquire_default(&self.path)?;
        let mut db = self.load()?;
        f(&mut db.entries, key);
        self.save(&db)
    }
}

impl MetadataStore for DatabaseStore {
    fn get(&self, path: &Path) -> Result<Option<String>, MetadataError> {
        let key = entry_key(path)?;
        let db = self.load()?;
        Ok(db
            .entries
            .get(&key)
            .and_then(|attrs| attrs.get(ANNOTATION_ATTRIBUTE))
            .cloned())
    }

    fn set(&self, path: &Path, value: &str) -> Result<(), MetadataError> {
        self.update(path, |entries, key| {
            entries
                .entry(key)
                .or_default()
                .insert(ANNOTATION_ATTRIBUTE.to_string(), value.to_string());
        })
    }

    fn unset(&self, path: &Path) -> Result<(), MetadataError> {
        self.update(path, |entries, key| {
            if let Some(attrs) = entries.get_mut(&key) {
                attrs.shift_remove(ANNOTATION_ATTRIBUTE);
                if attrs.is_empty() {
                    entries.shift_remove(&key);
                }
            }
        })
    }
}

/// Prefix of keys for paths that are not valid UTF-8. NUL never occurs in a
/// path, so these keys cannot collide with a plain one.
const RAW_KEY_PREFIX: &str = "\0raw:";

/// Database key for an entry: its absolute path, or the hex-encoded bytes of
/// that path when it is not valid UTF-8.
fn entry_key(path: &Path) -> Result<String, MetadataError> {
    let abs = std::path::absolute(path).map_err(|e| MetadataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Some(key) = abs.to_str() {
        return Ok(key.to_string());
    }
    let bytes = abs.as_os_str().as_encoded_bytes();
    let mut key = String::with_capacity(RAW_KEY_PREFIX.len() + bytes.len() * 2);
    key.push_str(RAW_KEY_PREFIX);
    for b in bytes {
        key.push_str(&format!("{:02x}", b));
    }
    Ok(key)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> DatabaseStore {
        DatabaseStore::new(tmp.path().join("data/metadata.json"))
    }

    #[test]
    fn missing_database_reads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert_eq!(store.get(Path::new("/some/file")).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn set_then_get() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let entry = tmp.path().join("report.pdf");

        store.set(&entry, "hello").unwrap();
        assert_eq!(store.get(&entry).unwrap().as_deref(), Some("hello"));

        // A second store over the same file sees the write
        let other = DatabaseStore::new(store.path());
        assert_eq!(other.get(&entry).unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn unset_drops_empty_entries() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        store.set(&a, "one").unwrap();
        store.set(&b, "two").unwrap();

        store.unset(&a).unwrap();
        assert_eq!(store.get(&a).unwrap(), None);
        assert_eq!(store.get(&b).unwrap().as_deref(), Some("two"));

        let raw = fs::read_to_string(store.path()).unwrap();
        let db: Database = serde_json::from_str(&raw).unwrap();
        assert_eq!(db.entries.len(), 1);
        assert!(!raw.contains(&a.to_string_lossy().into_owned()));
    }

    #[test]
    fn unset_missing_is_ok() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.unset(&tmp.path().join("nothing")).unwrap();
        assert_eq!(store.get(&tmp.path().join("nothing")).unwrap(), None);
    }

    #[test]
    fn keeps_unrelated_attributes() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let entry = tmp.path().join("song.ogg");
        let key = entry.to_string_lossy().into_owned();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            format!(
                r#"{{"version":1,"entries":{{{}:{{"metadata::rating":"5"}}}}}}"#,
                serde_json::to_string(&key).unwrap()
            ),
        )
        .unwrap();

        store.set(&entry, "great").unwrap();
        store.unset(&entry).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let db: Database = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            db.entries[&key].get("metadata::rating").map(String::as_str),
            Some("5")
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_keep_separate_annotations() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let a = tmp.path().join(OsStr::from_bytes(b"\xff"));
        let b = tmp.path().join(OsStr::from_bytes(b"\xfe"));

        store.set(&a, "only on a").unwrap();
        assert_eq!(store.get(&a).unwrap().as_deref(), Some("only on a"));
        assert_eq!(store.get(&b).unwrap(), None);

        store.set(&b, "only on b").unwrap();
        store.unset(&a).unwrap();
        assert_eq!(store.get(&a).unwrap(), None);
        assert_eq!(store.get(&b).unwrap().as_deref(), Some("only on b"));

        // The encoded key never shadows a plain UTF-8 path
        let raw = fs::read_to_string(store.path()).unwrap();
        let db: Database = serde_json::from_str(&raw).unwrap();
        let key = db.entries.keys().next().unwrap();
        assert!(key.starts_with(RAW_KEY_PREFIX));
        assert!(key.ends_with("fe"));
    }

    #[test]
    fn corrupt_database_is_reported() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json {{{").unwrap();

        let err = store.get(&tmp.path().join("x")).unwrap_err();
        assert!(matches!(err, MetadataError::Corrupt { .. }));
        // Writes refuse to clobber a database they can't parse
        assert!(store.set(&tmp.path().join("x"), "y").is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "not json {{{");
    }
}
