//! Disk I/O helpers: create, load, and write the database file.
//!
//! [`WriteMode::Atomic`] uses rename-over, which is close to atomic on most
//! platforms. On FAT32 or network shares there are no hard guarantees.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::serializer::JsonSerializer;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// How a save replaces the file on disk.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Write `<path>.tmp`, then rename it over the target. A crash mid-write
    /// leaves the previous content in place.
    #[default]
    Atomic,
    /// Truncate and overwrite the target directly. A crash mid-write can leave
    /// a truncated file.
    InPlace,
}

/// Create an empty file at `path` if nothing is there. Existing files are left
/// untouched whatever they contain.
pub fn ensure_file(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
    Ok(())
}

/// Read and decode the file at `path`. A missing or empty file is an empty
/// document (not an error).
pub fn load(path: &Path, serializer: &JsonSerializer) -> Result<Document> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    serializer.deserialize(&bytes)
}

/// Replace the contents of `path` with `bytes`.
///
/// In [`WriteMode::Atomic`] the bytes land in a sibling `<name>.<ext>.tmp`
/// first and the rename swaps it in, so readers see either the old document
/// or the new one.
pub fn write(path: &Path, bytes: &[u8], mode: WriteMode) -> Result<()> {
    let io = |e: std::io::Error| Error::Io(format!("{}: {e}", path.display()));
    match mode {
        WriteMode::Atomic => {
            let tmp = temp_path(path);
            std::fs::write(&tmp, bytes).map_err(io)?;
            std::fs::rename(&tmp, path).map_err(io)
        }
        WriteMode::InPlace => std::fs::write(path, bytes).map_err(io),
    }
}

/// Sibling path an atomic save stages its bytes in: `db.json` becomes
/// `db.json.tmp`.
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    path.with_extension(format!("{ext}.tmp"))
}
