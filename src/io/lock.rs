use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::metadata::MetadataError;

/// Advisory lock serializing writers of the metadata database.
///
/// Uses flock (Unix) on a `.lock` file next to the database so several
/// `ann` processes (or a host and the CLI) don't lose each other's writes.
pub struct FileLock {
    _file: File,
}

impl FileLock {
    /// Acquire the lock guarding `db_path`, waiting up to `timeout`.
    pub fn acquire(db_path: &Path, timeout: Duration) -> Result<Self, MetadataError> {
        let lock_path = lock_path(db_path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MetadataError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| MetadataError::Io {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_lock(&file) {
                Ok(()) => return Ok(FileLock { _file: file }),
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => return Err(MetadataError::LockTimeout { path: lock_path }),
            }
        }
    }

    /// Acquire with default timeout (5 seconds)
    pub fn acquire_default(db_path: &Path) -> Result<Self, MetadataError> {
        Self::acquire(db_path, Duration::from_secs(5))
    }
}

fn lock_path(db_path: &Path) -> PathBuf {
    let mut name = db_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    db_path.with_file_name(name)
}

/// Try to acquire an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
