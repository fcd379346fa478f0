//! Single-slot upload storage.
//!
//! The upload directory holds at most one document at a time: the caller
//! purges it before persisting a new upload, then hands the returned path
//! to the orchestrator. The request pipeline itself never writes uploads.

use std::io;
use std::path::{Path, PathBuf};

/// Remove every regular file in the upload directory.
///
/// A missing directory is success (nothing to purge). Per-file removal
/// failures are logged and skipped so one stuck file cannot block new
/// uploads.
pub fn purge_uploads(dir: &Path) -> io::Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete old upload");
            }
        }
    }
    Ok(())
}

/// Write uploaded bytes into the slot and return the stored path.
///
/// Creates the directory if needed. Only the file name of `file_name` is
/// used, so a hostile path cannot escape the upload directory.
pub fn persist_upload(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let path = dir.join(name);

    std::fs::write(&path, bytes)?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "Upload persisted");
    Ok(path)
}
