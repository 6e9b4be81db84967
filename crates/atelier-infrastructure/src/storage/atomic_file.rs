//! Atomic file replacement: write a sibling temp file, fsync, rename.

use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Replaces `path` with `contents`. Readers see the old file or the new one,
/// never a partial write.
pub(crate) fn write(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
    }

    let tmp_path = temp_path(path)?;
    let mut tmp_file = File::create(&tmp_path).map_err(|e| StorageError::io(&tmp_path, e))?;
    tmp_file
        .write_all(contents)
        .map_err(|e| StorageError::io(&tmp_path, e))?;
    tmp_file
        .sync_all()
        .map_err(|e| StorageError::io(&tmp_path, e))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))
}

/// Reads `path`; `None` when the file is missing or blank.
pub(crate) fn read(path: &Path) -> Result<Option<String>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}

fn temp_path(path: &Path) -> Result<PathBuf, StorageError> {
    let file_name = path.file_name().ok_or_else(|| {
        StorageError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Path has no file name"),
        )
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}
