//! One-time reconciliation of the destination tree against the visited set.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::error::MirrorError;
use crate::fsops;

/// Removes every destination entry whose relative path was not visited
/// during the initial scan.
///
/// Traversal is depth-first with lexicographically sorted entries so the
/// removal order is deterministic. An unvisited entry is removed outright
/// (recursively for directories) with no further descent; a visited
/// directory is descended into and reconciled the same way. Individual
/// failures are handed to `report` and the sweep continues with the
/// remaining entries.
pub(crate) fn sweep_destination<F>(
    destination_root: &Path,
    visited: &FxHashSet<PathBuf>,
    report: &mut F,
) where
    F: FnMut(MirrorError),
{
    sweep_dir(destination_root, Path::new(""), visited, report);
}

fn sweep_dir<F>(
    dir: &Path,
    relative_prefix: &Path,
    visited: &FxHashSet<PathBuf>,
    report: &mut F,
) where
    F: FnMut(MirrorError),
{
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(error) => {
            report(MirrorError::io(
                "read destination directory",
                dir.to_path_buf(),
                error,
            ));
            return;
        }
    };

    let mut names = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(entry) => names.push(entry.file_name()),
            Err(error) => {
                report(MirrorError::io(
                    "read destination entry in",
                    dir.to_path_buf(),
                    error,
                ));
                return;
            }
        }
    }
    names.sort();

    for name in names {
        let full_path = dir.join(&name);
        let relative_path = relative_prefix.join(&name);

        if visited.contains(&relative_path) {
            let is_dir = fs::symlink_metadata(&full_path)
                .map(|metadata| metadata.file_type().is_dir())
                .unwrap_or(false);
            if is_dir {
                sweep_dir(&full_path, &relative_path, visited, report);
            }
        } else {
            tracing::debug!(path = %relative_path.display(), "sweep removing stale entry");
            if let Err(error) = fsops::remove_entry(&full_path) {
                report(error);
            }
        }
    }
}
