//! The mirror session: lifecycle, configuration, and the engine loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::MirrorError;
use crate::event::{
    ChangeEvent, ChangeKind, EntryKind, MirrorEvent, MutationEvent, SourceEvent, StatSnapshot,
};
use crate::fsops;
use crate::path_map::map_destination;
use crate::policy::{DeletionMode, TimestampMode};
use crate::sweep::sweep_destination;
use crate::visited::VisitTracker;

/// Lifecycle phase of a [`MirrorSession`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// The source's initial scan is still in progress.
    Initializing,
    /// The initial sync completed; no live notification has arrived yet.
    Ready,
    /// Live notifications are being mirrored.
    Steady,
    /// The session no longer consumes notifications. Terminal.
    Closed,
}

/// Configuration accepted at session construction.
///
/// The source working directory is an explicit, required field: relative
/// selection patterns are resolved against it, never against ambient process
/// state.
#[derive(Clone, Debug)]
pub struct MirrorOptions {
    source_working_directory: PathBuf,
    timestamps: TimestampMode,
    deletion: DeletionMode,
}

impl MirrorOptions {
    /// Creates options rooted at the given source working directory.
    #[must_use]
    pub fn new(source_working_directory: impl Into<PathBuf>) -> Self {
        Self {
            source_working_directory: source_working_directory.into(),
            timestamps: TimestampMode::default(),
            deletion: DeletionMode::default(),
        }
    }

    /// Selects the timestamp preservation mode (default: preserve all).
    #[must_use]
    pub const fn timestamps(mut self, mode: TimestampMode) -> Self {
        self.timestamps = mode;
        self
    }

    /// Selects the deletion mode (default: never delete).
    #[must_use]
    pub const fn deletion(mut self, mode: DeletionMode) -> Self {
        self.deletion = mode;
        self
    }
}

/// One live mirroring instance coordinating a source root, a destination
/// root, and a policy configuration.
///
/// The session consumes [`SourceEvent`]s one at a time; each notification's
/// filesystem mutation and observer re-emission complete before the next
/// notification is handled, so observers always see a destination state
/// consistent with exactly the notifications processed so far.
#[derive(Debug)]
pub struct MirrorSession {
    pattern: String,
    source_root: PathBuf,
    destination_root: PathBuf,
    timestamps: TimestampMode,
    deletion: DeletionMode,
    phase: Phase,
    visited: VisitTracker,
    observers: Vec<Sender<MirrorEvent>>,
}

impl MirrorSession {
    /// Creates a session mirroring entries matched by `pattern` under the
    /// options' source working directory into `destination_root`.
    ///
    /// The destination root is created if absent. Construction fails fast on
    /// configuration errors: an absolute selection pattern (patterns must be
    /// root-relative; use [`MirrorOptions::new`] to set the base directory)
    /// or an empty destination root.
    pub fn new(
        pattern: &str,
        destination_root: impl Into<PathBuf>,
        options: MirrorOptions,
    ) -> Result<Self, MirrorError> {
        if Path::new(pattern).is_absolute() {
            return Err(MirrorError::absolute_pattern(pattern));
        }
        let destination_root = destination_root.into();
        if destination_root.as_os_str().is_empty() {
            return Err(MirrorError::missing_destination());
        }
        fsops::ensure_dir(&destination_root)?;

        Ok(Self {
            pattern: pattern.to_owned(),
            source_root: options.source_working_directory,
            destination_root,
            timestamps: options.timestamps,
            deletion: options.deletion,
            phase: Phase::Initializing,
            visited: VisitTracker::new(options.deletion),
            observers: Vec::new(),
        })
    }

    /// Registers an observer and returns its event receiver.
    ///
    /// Every applied mutation, the `Ready` transition, and every error is
    /// delivered to all registered observers in processing order. Dropping
    /// the receiver unregisters the observer.
    pub fn subscribe(&mut self) -> Receiver<MirrorEvent> {
        let (sender, receiver) = unbounded();
        self.observers.push(sender);
        receiver
    }

    /// Feeds one notification from the change event source.
    ///
    /// Processing is synchronous: the corresponding destination mutation and
    /// re-emission are complete when this returns. Failures are surfaced as
    /// [`MirrorEvent::Error`] rather than returned, so one failed mutation
    /// does not abort the notification stream. Notifications arriving after
    /// [`close`](Self::close) are ignored.
    pub fn handle_source_event(&mut self, event: SourceEvent) {
        if self.phase == Phase::Closed {
            return;
        }
        match event {
            SourceEvent::Change(change) => self.handle_change(change),
            SourceEvent::Ready => self.handle_ready(),
            SourceEvent::Error(message) => {
                let error = MirrorError::source_failure(message);
                tracing::warn!(%error, "change event source error");
                self.emit(MirrorEvent::Error(Arc::new(error)));
            }
        }
    }

    /// Pumps notifications from a channel until it disconnects or the
    /// session closes.
    pub fn run(&mut self, events: &Receiver<SourceEvent>) {
        for event in events.iter() {
            self.handle_source_event(event);
            if self.phase == Phase::Closed {
                break;
            }
        }
    }

    /// Stops consuming further notifications. Idempotent.
    ///
    /// There are never in-flight mutations to roll back: every mutation
    /// completes within the `handle_source_event` call that started it.
    pub fn close(&mut self) {
        if self.phase != Phase::Closed {
            tracing::debug!(pattern = %self.pattern, "closing mirror session");
            self.phase = Phase::Closed;
        }
    }

    /// The selection pattern the session was constructed with.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The source working directory relative paths resolve against.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// The destination root receiving mirrored entries.
    #[must_use]
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// The session's current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    fn handle_change(&mut self, change: ChangeEvent) {
        if self.phase == Phase::Ready {
            self.phase = Phase::Steady;
        }
        match self.apply_change(change) {
            Ok(Some(mutation)) => {
                tracing::debug!(
                    kind = mutation.kind().label(),
                    path = %mutation.relative_path().display(),
                    "applied mutation"
                );
                self.emit(MirrorEvent::Mutation(mutation));
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "mutation failed");
                self.emit(MirrorEvent::Error(Arc::new(error)));
            }
        }
    }

    /// Applies one change to the destination tree.
    ///
    /// Returns `Ok(None)` when the deletion policy suppressed a removal; the
    /// destination was not touched, so no event may be emitted for it.
    fn apply_change(&mut self, change: ChangeEvent) -> Result<Option<MutationEvent>, MirrorError> {
        let ChangeEvent { kind, path, stat } = change;
        let destination = map_destination(&self.destination_root, &path)?;
        let mut stat = stat;

        match kind {
            ChangeKind::FileAdded | ChangeKind::FileChanged => {
                let source = self.source_root.join(&path);
                fsops::copy_file(&source, &destination)?;
                if self.timestamps.preserves(EntryKind::File) {
                    let snapshot = snapshot_or_stat(&mut stat, &source)?;
                    fsops::apply_times(&destination, &snapshot)?;
                }
                self.visited.record(&path);
            }
            ChangeKind::DirAdded => {
                fsops::ensure_dir(&destination)?;
                if self.timestamps.preserves(EntryKind::Directory) {
                    // Watchers sometimes omit the stat on addDir; recover by
                    // re-statting the source before applying times.
                    let source = self.source_root.join(&path);
                    let snapshot = snapshot_or_stat(&mut stat, &source)?;
                    fsops::apply_times(&destination, &snapshot)?;
                }
                self.visited.record(&path);
            }
            ChangeKind::FileRemoved | ChangeKind::DirRemoved => {
                if !self.deletion.permits_live_deletion() {
                    tracing::trace!(
                        kind = kind.label(),
                        path = %path.display(),
                        "removal suppressed by deletion policy"
                    );
                    return Ok(None);
                }
                fsops::remove_entry(&destination)?;
                self.visited.evict(&path);
            }
        }

        Ok(Some(MutationEvent::new(kind, path, destination, stat)))
    }

    /// Runs the Initializing→Ready transition: the deletion sweep (when the
    /// policy calls for one), then the `Ready` signal.
    ///
    /// The sweep completes before `Ready` is forwarded, so observers never
    /// see a destination containing stale entries once `Ready` fires.
    fn handle_ready(&mut self) {
        if self.phase != Phase::Initializing {
            return;
        }

        let mut sweep_errors = Vec::new();
        if self.deletion.sweeps_on_ready() {
            if let Some(visited) = self.visited.set() {
                sweep_destination(&self.destination_root, visited, &mut |error| {
                    sweep_errors.push(error);
                });
            }
        }
        self.visited.finish_sweep(self.deletion);

        for error in sweep_errors {
            tracing::warn!(%error, "deletion sweep failure");
            self.emit(MirrorEvent::Error(Arc::new(error)));
        }

        self.phase = Phase::Ready;
        tracing::debug!(
            destination = %self.destination_root.display(),
            "initial sync complete"
        );
        self.emit(MirrorEvent::Ready);
    }

    fn emit(&mut self, event: MirrorEvent) {
        self.observers
            .retain(|observer| observer.send(event.clone()).is_ok());
    }
}

/// Returns the event's stat, re-statting the source when the watcher
/// omitted it, and caches the result back into the event payload.
fn snapshot_or_stat(
    stat: &mut Option<StatSnapshot>,
    source: &Path,
) -> Result<StatSnapshot, MirrorError> {
    if let Some(snapshot) = *stat {
        return Ok(snapshot);
    }
    let snapshot = fsops::stat(source)?;
    *stat = Some(snapshot);
    Ok(snapshot)
}
