//! Event types crossing the session's two boundaries: notifications consumed
//! from the change event source and events re-emitted to observers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filetime::FileTime;

use crate::error::MirrorError;

/// Kind of filesystem entry a notification refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// Kind of change reported by the change event source.
///
/// The wire labels match the conventional watcher vocabulary: `add`,
/// `change`, `addDir`, `unlink`, and `unlinkDir`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeKind {
    /// A file appeared under the source root.
    FileAdded,
    /// An existing file's contents changed.
    FileChanged,
    /// A directory appeared under the source root.
    DirAdded,
    /// A file disappeared from the source root.
    FileRemoved,
    /// A directory disappeared from the source root.
    DirRemoved,
}

impl ChangeKind {
    /// Returns the entry kind the change applies to.
    #[must_use]
    pub const fn entry_kind(self) -> EntryKind {
        match self {
            Self::FileAdded | Self::FileChanged | Self::FileRemoved => EntryKind::File,
            Self::DirAdded | Self::DirRemoved => EntryKind::Directory,
        }
    }

    /// Reports whether the change removes an entry from the source.
    #[must_use]
    pub const fn is_removal(self) -> bool {
        matches!(self, Self::FileRemoved | Self::DirRemoved)
    }

    /// Returns the conventional watcher label for the change.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FileAdded => "add",
            Self::FileChanged => "change",
            Self::DirAdded => "addDir",
            Self::FileRemoved => "unlink",
            Self::DirRemoved => "unlinkDir",
        }
    }
}

/// Owned snapshot of the metadata a notification carried.
///
/// Watchers hand over [`fs::Metadata`] captured at event time; the snapshot
/// keeps only what the engine propagates so events stay `Copy` and `Send`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatSnapshot {
    /// Last access time of the source entry.
    pub accessed: FileTime,
    /// Last modification time of the source entry.
    pub modified: FileTime,
    /// Length of the source entry in bytes.
    pub len: u64,
}

impl StatSnapshot {
    /// Captures a snapshot from filesystem metadata.
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        Self {
            accessed: FileTime::from_last_access_time(metadata),
            modified: FileTime::from_last_modification_time(metadata),
            len: metadata.len(),
        }
    }
}

/// One change notification consumed from the change event source.
#[derive(Clone, Debug)]
pub struct ChangeEvent {
    /// The kind of change.
    pub kind: ChangeKind,
    /// Path of the entry relative to the source root.
    pub path: PathBuf,
    /// Metadata captured by the watcher, when available.
    pub stat: Option<StatSnapshot>,
}

impl ChangeEvent {
    /// Creates a change notification.
    #[must_use]
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>, stat: Option<StatSnapshot>) -> Self {
        Self {
            kind,
            path: path.into(),
            stat,
        }
    }
}

/// Notification stream consumed by a mirror session.
///
/// `Ready` fires exactly once when the source's initial scan completes;
/// `Error` may fire any number of times without terminating the stream.
#[derive(Clone, Debug)]
pub enum SourceEvent {
    /// A filesystem change under the watched root.
    Change(ChangeEvent),
    /// The initial scan is complete.
    Ready,
    /// The source reported a non-fatal failure.
    Error(String),
}

/// A mutation the engine applied to the destination tree.
#[derive(Clone, Debug)]
pub struct MutationEvent {
    kind: ChangeKind,
    relative_path: PathBuf,
    destination_path: PathBuf,
    stat: Option<StatSnapshot>,
}

impl MutationEvent {
    pub(crate) const fn new(
        kind: ChangeKind,
        relative_path: PathBuf,
        destination_path: PathBuf,
        stat: Option<StatSnapshot>,
    ) -> Self {
        Self {
            kind,
            relative_path,
            destination_path,
            stat,
        }
    }

    /// The kind of change that was mirrored.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Path of the entry relative to the source root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Absolute destination path the mutation was applied to.
    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Source metadata associated with the mutation, when known.
    #[must_use]
    pub const fn stat(&self) -> Option<&StatSnapshot> {
        self.stat.as_ref()
    }
}

/// Event delivered to session observers.
///
/// A single typed channel replaces the named-event emitter of classic watcher
/// libraries; subscribers filter on [`MutationEvent::kind`] to listen
/// narrowly.
#[derive(Clone, Debug)]
pub enum MirrorEvent {
    /// A destination mutation was durably applied.
    Mutation(MutationEvent),
    /// The initial sync, including any deletion sweep, is complete.
    Ready,
    /// A mutation or the change event source failed; the session continues.
    Error(Arc<MirrorError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_labels_match_watcher_vocabulary() {
        assert_eq!(ChangeKind::FileAdded.label(), "add");
        assert_eq!(ChangeKind::FileChanged.label(), "change");
        assert_eq!(ChangeKind::DirAdded.label(), "addDir");
        assert_eq!(ChangeKind::FileRemoved.label(), "unlink");
        assert_eq!(ChangeKind::DirRemoved.label(), "unlinkDir");
    }

    #[test]
    fn change_kind_entry_kinds() {
        assert_eq!(ChangeKind::FileAdded.entry_kind(), EntryKind::File);
        assert_eq!(ChangeKind::FileChanged.entry_kind(), EntryKind::File);
        assert_eq!(ChangeKind::FileRemoved.entry_kind(), EntryKind::File);
        assert_eq!(ChangeKind::DirAdded.entry_kind(), EntryKind::Directory);
        assert_eq!(ChangeKind::DirRemoved.entry_kind(), EntryKind::Directory);
    }

    #[test]
    fn only_unlink_kinds_are_removals() {
        assert!(ChangeKind::FileRemoved.is_removal());
        assert!(ChangeKind::DirRemoved.is_removal());
        assert!(!ChangeKind::FileAdded.is_removal());
        assert!(!ChangeKind::FileChanged.is_removal());
        assert!(!ChangeKind::DirAdded.is_removal());
    }

    #[test]
    fn stat_snapshot_captures_mtime() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("a.txt");
        std::fs::write(&file, b"payload").expect("write");
        let metadata = std::fs::metadata(&file).expect("metadata");
        let snapshot = StatSnapshot::from_metadata(&metadata);
        assert_eq!(
            snapshot.modified,
            FileTime::from_last_modification_time(&metadata)
        );
        assert_eq!(snapshot.len, 7);
    }
}
