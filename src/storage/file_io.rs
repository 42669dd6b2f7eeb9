//! File I/O utilities with atomic writes
//!
//! Provides safe async file operations that won't corrupt data on
//! failure: reads fall back to a default for missing files, writes go
//! through a temp file and an atomic rename.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::Error;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub async fn read_json<T, P>(path: P) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    match fs::read_to_string(path).await {
        Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
            Error::Storage(format!("Failed to parse {}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(Error::Storage(format!(
            "Failed to open {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// This ensures that the file is either completely written or not
/// modified at all, preventing corruption on crashes or power failures.
pub async fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), Error>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            Error::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory (important for atomic rename)
    let temp_path = path.with_extension("json.tmp");

    let body = serde_json::to_vec_pretty(data)
        .map_err(|e| Error::Storage(format!("Failed to serialize data: {}", e)))?;

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| Error::Storage(format!("Failed to create temp file: {}", e)))?;

    file.write_all(&body)
        .await
        .map_err(|e| Error::Storage(format!("Failed to write data: {}", e)))?;

    // Sync to disk before rename
    file.sync_all()
        .await
        .map_err(|e| Error::Storage(format!("Failed to sync data: {}", e)))?;
    drop(file);

    // Atomic rename
    if let Err(e) = fs::rename(&temp_path, path).await {
        // Try to clean up the temp file if rename fails
        let _ = fs::remove_file(&temp_path).await;
        return Err(Error::Storage(format!("Failed to rename temp file: {}", e)));
    }

    Ok(())
}
