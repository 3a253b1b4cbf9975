//! Blocking filesystem primitives used by the engine.
//!
//! Every helper attaches the attempted action and the offending path to
//! failures so observers receive actionable diagnostics. Calls are
//! best-effort local filesystem operations with no partial-copy rollback.

use std::fs;
use std::io;
use std::path::Path;

use filetime::set_file_times;

use crate::error::MirrorError;
use crate::event::StatSnapshot;

/// Copies the source file's bytes to the destination, overwriting any
/// existing entry and creating missing parent directories.
pub(crate) fn copy_file(source: &Path, destination: &Path) -> Result<(), MirrorError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|error| MirrorError::io("create parent directory", parent.to_path_buf(), error))?;
    }
    fs::copy(source, destination)
        .map_err(|error| MirrorError::io("copy file to", destination.to_path_buf(), error))?;
    Ok(())
}

/// Ensures the destination directory exists; succeeds if it already does.
pub(crate) fn ensure_dir(destination: &Path) -> Result<(), MirrorError> {
    fs::create_dir_all(destination)
        .map_err(|error| MirrorError::io("create directory", destination.to_path_buf(), error))
}

/// Removes a destination entry, recursively for directories.
///
/// A missing entry is not an error; removal is idempotent.
pub(crate) fn remove_entry(destination: &Path) -> Result<(), MirrorError> {
    let metadata = match fs::symlink_metadata(destination) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => {
            return Err(MirrorError::io(
                "inspect entry for removal",
                destination.to_path_buf(),
                error,
            ));
        }
    };
    let result = if metadata.file_type().is_dir() {
        fs::remove_dir_all(destination)
    } else {
        fs::remove_file(destination)
    };
    match result {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(MirrorError::io(
            "remove entry",
            destination.to_path_buf(),
            error,
        )),
    }
}

/// Captures a metadata snapshot for a source path.
pub(crate) fn stat(source: &Path) -> Result<StatSnapshot, MirrorError> {
    let metadata = fs::metadata(source)
        .map_err(|error| MirrorError::io("stat source entry", source.to_path_buf(), error))?;
    Ok(StatSnapshot::from_metadata(&metadata))
}

/// Applies the snapshot's access and modification times to the destination.
pub(crate) fn apply_times(destination: &Path, snapshot: &StatSnapshot) -> Result<(), MirrorError> {
    set_file_times(destination, snapshot.accessed, snapshot.modified).map_err(|error| {
        MirrorError::io("set timestamps on", destination.to_path_buf(), error)
    })
}
