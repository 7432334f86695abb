use std::path::Path;

use super::metadata::{ANNOTATION_ATTRIBUTE, MetadataError, MetadataStore};

/// Metadata kept in `user.` extended attributes of the entries themselves.
///
/// Only available on Linux; elsewhere every call reports
/// [`MetadataError::Unsupported`].
#[derive(Debug, Clone, Default)]
pub struct XattrStore;

impl XattrStore {
    pub fn new() -> Self {
        XattrStore
    }
}

/// Full extended attribute name (user namespace).
pub fn xattr_name() -> String {
    format!("user.{}", ANNOTATION_ATTRIBUTE)
}

#[cfg(target_os = "linux")]
mod sys {
    use std::ffi::CString;
    use std::io;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    fn c_path(path: &Path) -> io::Result<CString> {
        CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }

    fn c_name(name: &str) -> io::Result<CString> {
        CString::new(name).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }

    fn is_missing(err: &io::Error) -> bool {
        err.raw_os_error() == Some(libc::ENODATA)
    }

    pub fn get(path: &Path, name: &str) -> io::Result<Option<Vec<u8>>> {
        let c_path = c_path(path)?;
        let c_name = c_name(name)?;
        loop {
            let size = unsafe {
                libc::getxattr(c_path.as_ptr(), c_name.as_ptr(), std::ptr::null_mut(), 0)
            };
            if size < 0 {
                let err = io::Error::last_os_error();
                return if is_missing(&err) { Ok(None) } else { Err(err) };
            }
            let mut buf = vec![0u8; size as usize];
            let read = unsafe {
                libc::getxattr(
                    c_path.as_ptr(),
                    c_name.as_ptr(),
                    buf.as_mut_ptr().cast(),
                    buf.len(),
                )
            };
            if read < 0 {
                let err = io::Error::last_os_error();
                // Value grew between the two calls; ask for the size again
                if err.raw_os_error() == Some(libc::ERANGE) {
                    continue;
                }
                return if is_missing(&err) { Ok(None) } else { Err(err) };
            }
            buf.truncate(read as usize);
            return Ok(Some(buf));
        }
    }

    pub fn set(path: &Path, name: &str, value: &[u8]) -> io::Result<()> {
        let c_path = c_path(path)?;
        let c_name = c_name(name)?;
        let result = unsafe {
            libc::setxattr(
                c_path.as_ptr(),
                c_name.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                0,
            )
        };
        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub fn remove(path: &Path, name: &str) -> io::Result<()> {
        let c_path = c_path(path)?;
        let c_name = c_name(name)?;
        let result = unsafe { libc::removexattr(c_path.as_ptr(), c_name.as_ptr()) };
        if result == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if is_missing(&err) { Ok(()) } else { Err(err) }
    }
}

#[cfg(target_os = "linux")]
impl MetadataStore for XattrStore {
    fn get(&self, path: &Path) -> Result<Option<String>, MetadataError> {
        let raw = sys::get(path, &xattr_name()).map_err(|e| MetadataError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        match raw {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                MetadataError::InvalidText {
                    path: path.to_path_buf(),
                }
            }),
        }
    }

    fn set(&self, path: &Path, value: &str) -> Result<(), MetadataError> {
        sys::set(path, &xattr_name(), value.as_bytes()).map_err(|e| MetadataError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn unset(&self, path: &Path) -> Result<(), MetadataError> {
        sys::remove(path, &xattr_name()).map_err(|e| MetadataError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(not(target_os = "linux"))]
impl MetadataStore for XattrStore {
    fn get(&self, _path: &Path) -> Result<Option<String>, MetadataError> {
        Err(MetadataError::Unsupported)
    }

    fn set(&self, _path: &Path, _value: &str) -> Result<(), MetadataError> {
        Err(MetadataError::Unsupported)
    }

    fn unset(&self, _path: &Path) -> Result<(), MetadataError> {
        Err(MetadataError::Unsupported)
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Some file systems (tmpfs on older kernels, overlayfs setups) refuse
    /// user xattrs; those runs skip the round trip.
    fn supports_user_xattrs(path: &Path) -> bool {
        XattrStore.set(path, "probe").is_ok()
    }

    #[test]
    fn name_is_in_user_namespace() {
        assert_eq!(xattr_name(), "user.metadata::annotation");
    }

    #[test]
    fn round_trip_when_supported() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("doc.txt");
        std::fs::write(&file, "body").unwrap();
        if !supports_user_xattrs(&file) {
            return;
        }
        let store = XattrStore::new();
        store.set(&file, "hello").unwrap();
        assert_eq!(store.get(&file).unwrap().as_deref(), Some("hello"));
        store.unset(&file).unwrap();
        assert_eq!(store.get(&file).unwrap(), None);
        store.unset(&file).unwrap();
    }

    #[test]
    fn missing_entry_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = XattrStore.get(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, MetadataError::Io { .. }));
    }
}
