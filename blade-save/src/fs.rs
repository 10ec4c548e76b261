//! File helpers for tools working with save files.

use std::io::Write;
use std::path::Path;

use crate::error::{Result, SaveError};

/// Largest save file read into memory unless the caller picks a limit.
pub const MAX_SAVE_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

/// Read a file into memory with a size cap.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path).map_err(|source| SaveError::Resource {
        action: "failed to read metadata of",
        path: path.to_path_buf(),
        source,
    })?;
    let len = metadata.len();
    if len > max_bytes {
        return Err(SaveError::FileTooLarge {
            path: path.to_path_buf(),
            len,
            max: max_bytes,
        });
    }
    std::fs::read(path).map_err(|source| SaveError::Resource {
        action: "failed to read",
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` with `bytes` in one step.
///
/// The data goes to a temporary file next to the target first, so a failed
/// write never leaves a truncated file behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let resource = |action: &'static str| {
        let path = path.to_path_buf();
        move |source| SaveError::Resource {
            action,
            path,
            source,
        }
    };

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(resource("failed to create temporary file for"))?;
    file.write_all(bytes).map_err(resource("failed to write"))?;
    file.as_file().sync_all().map_err(resource("failed to flush"))?;
    file.persist(path)
        .map_err(|err| err.error)
        .map_err(resource("failed to replace"))?;
    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
