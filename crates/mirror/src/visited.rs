//! Tracking of source paths observed as present.
//!
//! The visited set is an explicit state-machine field owned by the session
//! rather than an ad-hoc optional: `Tracking` while paths are being
//! accumulated, `Disabled` once the set can no longer influence behaviour.
//! The Initializing→Ready transition consults it exactly once (the deletion
//! sweep) and then discards it unless the deletion policy keeps tracking
//! continuously.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::policy::DeletionMode;

/// Records the relative paths observed via non-removal notifications.
#[derive(Debug)]
pub enum VisitTracker {
    /// Paths are being accumulated for a future (or ongoing) reconciliation.
    Tracking(FxHashSet<PathBuf>),
    /// The set can no longer affect behaviour and has been discarded.
    Disabled,
}

impl VisitTracker {
    /// Creates the tracker appropriate for a deletion mode.
    ///
    /// Modes that never reconcile skip tracking entirely.
    #[must_use]
    pub fn new(mode: DeletionMode) -> Self {
        if mode.sweeps_on_ready() {
            Self::Tracking(FxHashSet::default())
        } else {
            Self::Disabled
        }
    }

    /// Records a path observed as present in the source.
    ///
    /// Removal notifications must never be recorded; membership means "this
    /// path currently exists in the source per observed events".
    pub fn record(&mut self, path: &Path) {
        if let Self::Tracking(set) = self {
            set.insert(path.to_path_buf());
        }
    }

    /// Evicts a path after its destination entry was actually removed.
    ///
    /// Suppressed removals never evict: the destination entry still exists.
    pub fn evict(&mut self, path: &Path) {
        if let Self::Tracking(set) = self {
            set.remove(path);
        }
    }

    /// Reports whether a path has been observed as present.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        match self {
            Self::Tracking(set) => set.contains(path),
            Self::Disabled => false,
        }
    }

    /// Returns the accumulated set while tracking.
    #[must_use]
    pub const fn set(&self) -> Option<&FxHashSet<PathBuf>> {
        match self {
            Self::Tracking(set) => Some(set),
            Self::Disabled => None,
        }
    }

    /// Transitions the tracker past the deletion sweep: the set is discarded
    /// unless the deletion mode tracks continuously.
    pub fn finish_sweep(&mut self, mode: DeletionMode) {
        if !mode.tracks_continuously() {
            *self = Self::Disabled;
        }
    }
}
