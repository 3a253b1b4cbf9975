//! Session policies: timestamp preservation and destination deletion.

use crate::event::EntryKind;

/// Controls which destination entries receive the source's timestamps after
/// a copy or directory creation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimestampMode {
    /// Preserve timestamps for files and directories.
    #[default]
    All,
    /// Preserve timestamps for files only.
    File,
    /// Preserve timestamps for directories only.
    Dir,
    /// Never preserve timestamps.
    None,
}

impl TimestampMode {
    /// Decides whether the source's mtime/atime should be propagated onto a
    /// destination entry of the given kind.
    ///
    /// Evaluated per mutation: the mode is fixed for the session's lifetime
    /// but the entry kind varies per event.
    #[must_use]
    pub const fn preserves(self, kind: EntryKind) -> bool {
        match (self, kind) {
            (Self::All, _) | (Self::File, EntryKind::File) | (Self::Dir, EntryKind::Directory) => {
                true
            }
            _ => false,
        }
    }
}

/// Controls when destination entries absent from the source are deleted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DeletionMode {
    /// Never delete destination entries.
    #[default]
    None,
    /// Reconcile once at the initial-scan-complete transition, then stop.
    InitialSweep,
    /// Reconcile at the transition and mirror removals live afterwards.
    Continuous,
}

impl DeletionMode {
    /// Reports whether the deletion sweep runs at the Initializing→Ready
    /// transition.
    #[must_use]
    pub const fn sweeps_on_ready(self) -> bool {
        matches!(self, Self::InitialSweep | Self::Continuous)
    }

    /// Reports whether `unlink`/`unlinkDir` notifications are mirrored as
    /// destination removals. When this is false, removals are suppressed
    /// entirely and no observer event fires.
    #[must_use]
    pub const fn permits_live_deletion(self) -> bool {
        matches!(self, Self::Continuous)
    }

    /// Reports whether the visited set outlives the sweep.
    #[must_use]
    pub const fn tracks_continuously(self) -> bool {
        matches!(self, Self::Continuous)
    }
}
