//! Filesystem helpers for persisting key-value slots atomically.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ChemventoryError, Result};

/// Write `data` to `path` through a temp file in the same directory, then rename.
///
/// Readers never observe a half-written slot: they see either the previous
/// contents or the new ones.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| ChemventoryError::Storage("Invalid slot path".to_string()))?;
    fs::create_dir_all(parent).map_err(|e| {
        ChemventoryError::Storage(format!(
            "Failed to create data directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ChemventoryError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ChemventoryError::Storage("Invalid slot filename".to_string()))?;
    let temp_path = parent.join(format!(".{}.{}.{}.tmp", filename, std::process::id(), nanos));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| ChemventoryError::Storage(format!("Temp file create failed: {}", e)))?;
    file.write_all(data)
        .map_err(|e| ChemventoryError::Storage(format!("Temp file write failed: {}", e)))?;
    file.sync_all()
        .map_err(|e| ChemventoryError::Storage(format!("Temp file sync failed: {}", e)))?;

    rename_with_fallback(&temp_path, path)
        .map_err(|e| ChemventoryError::Storage(format!("Atomic rename failed: {}", e)))
}

/// Rename a file, removing the destination first on platforms where rename
/// refuses to overwrite. The temp file is cleaned up if both attempts fail.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!("initial: {}, retry: {}", initial_err, retry_err),
            )
        })?;
    }
    Ok(())
}
