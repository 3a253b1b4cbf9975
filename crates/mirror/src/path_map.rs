//! Mapping of source-relative paths onto the destination root.

use std::path::{Component, Path, PathBuf};

use crate::error::MirrorError;

/// Maps a source-relative path to its absolute destination path.
///
/// The relative path is the stable identity key shared by source and
/// destination: the destination path is always
/// `destination_root + relative_path`.
///
/// Paths that are absolute or contain parent-directory (`..`) or root
/// components are rejected, so the returned path is guaranteed to be a
/// descendant of `destination_root`. Bare `.` components are tolerated;
/// watchers commonly report the watched root itself that way.
pub fn map_destination(destination_root: &Path, relative: &Path) -> Result<PathBuf, MirrorError> {
    if relative.is_absolute() {
        return Err(MirrorError::path_escape(relative));
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(MirrorError::path_escape(relative));
            }
        }
    }
    Ok(destination_root.join(relative))
}
