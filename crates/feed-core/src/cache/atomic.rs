//! Atomic file operations for cache persistence.
//!
//! Writes go through a sibling temp file:
//! 1. Write to temp file with unique PID+TID suffix
//! 2. fsync to ensure data reaches disk
//! 3. Atomic rename to target path
//!
//! A reader therefore sees either the previous content or the new content,
//! never a partial write.

use crate::config::PathsConfig;
use crate::error::{FeedCacheError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use tracing::{debug, warn};

/// Read a whole file.
///
/// Returns `None` if the file doesn't exist.
pub fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(FeedCacheError::io_with_path(e, path)),
    };

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| FeedCacheError::io_with_path(e, path))?;

    Ok(Some(contents))
}

/// Replace `path` with `bytes` atomically.
///
/// The parent directory is created if needed. On failure the temp file is
/// removed and the previous content of `path` is left untouched.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| FeedCacheError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let temp_path = temp_path_for(path);

    if let Err(e) = write_synced(&temp_path, bytes) {
        discard_temp(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        discard_temp(&temp_path);
        return Err(FeedCacheError::Io {
            message: format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            ),
            path: Some(path.to_path_buf()),
            source: Some(e),
        });
    }

    debug!("Atomically wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Remove `path`. Returns `false` if there was nothing to remove.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(FeedCacheError::io_with_path(e, path)),
    }
}

fn write_synced(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| FeedCacheError::Io {
            message: format!("Failed to create temp file {}", temp_path.display()),
            path: Some(temp_path.to_path_buf()),
            source: Some(e),
        })?;

    file.write_all(bytes).map_err(|e| FeedCacheError::Io {
        message: format!("Failed to write temp file {}", temp_path.display()),
        path: Some(temp_path.to_path_buf()),
        source: Some(e),
    })?;

    file.sync_all().map_err(|e| FeedCacheError::Io {
        message: format!("Failed to sync temp file {}", temp_path.display()),
        path: Some(temp_path.to_path_buf()),
        source: Some(e),
    })
}

fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        if e.kind() != ErrorKind::NotFound {
            warn!("Failed to remove temp file {}: {}", temp_path.display(), e);
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(
        "{}.{}.{}.{}",
        file_name,
        process::id(),
        thread_id(),
        PathsConfig::TEMP_SUFFIX
    ))
}

/// Get a unique thread identifier.
fn thread_id() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    thread::current().id().hash(&mut hasher);
    hasher.finish()
}
