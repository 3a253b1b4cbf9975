#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `mirror` keeps a destination directory tree a faithful, continuously
//! updated copy of a source tree selected by a path pattern. It is the core
//! of a build-tooling pipeline that needs a live, filtered staging copy of a
//! source tree without re-scanning it on every change. The crate does not
//! watch the filesystem itself: it consumes an abstract stream of typed
//! change notifications (the kind produced by any recursive directory
//! watcher) and converts them into idempotent mirroring actions.
//!
//! # Design
//!
//! - [`MirrorSession`] owns one source root, one destination root, and one
//!   policy configuration, and drives the engine: each [`SourceEvent`] is
//!   processed to completion (filesystem mutation, timestamp propagation,
//!   observer re-emission) before the next one is handled.
//! - [`TimestampMode`] and [`DeletionMode`] are the two cross-cutting
//!   policies: whether the source's mtime/atime is propagated per entry
//!   kind, and when destination entries absent from the source are deleted.
//! - [`VisitTracker`] records every path observed as present during the
//!   initial scan; the deletion sweep diffs the pre-existing destination
//!   tree against it exactly once, at the Initializing→Ready transition.
//! - [`map_destination`] is the pure path mapper joining relative paths onto
//!   the destination root while rejecting paths that would escape it.
//! - Observers register through [`MirrorSession::subscribe`] and receive
//!   typed [`MirrorEvent`] values over a channel.
//!
//! # Invariants
//!
//! - Notifications are applied strictly in arrival order; observers never
//!   see a destination state inconsistent with the notifications processed
//!   so far.
//! - Every destination path written is a descendant of the destination root.
//! - Once `Ready` is observed, the destination contains no entry the
//!   deletion policy should have removed.
//! - A failed mutation never halts the session; it is reported as an
//!   [`MirrorEvent::Error`] and processing continues.
//!
//! # Errors
//!
//! Configuration problems fail session construction with [`MirrorError`].
//! Runtime failures (copy, stat, removal) are surfaced to observers as
//! [`MirrorEvent::Error`] values instead of being returned, matching the
//! log-and-continue handling expected of mirroring pipelines.
//!
//! # Examples
//!
//! Mirror a small tree by feeding the session the events a watcher's initial
//! scan would produce:
//!
//! ```
//! use mirror::{
//!     ChangeEvent, ChangeKind, MirrorEvent, MirrorOptions, MirrorSession, SourceEvent,
//! };
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let source = temp.path().join("src");
//! fs::create_dir_all(&source)?;
//! fs::write(source.join("hello.txt"), b"hello")?;
//!
//! let mut session = MirrorSession::new(
//!     "**",
//!     temp.path().join("dest"),
//!     MirrorOptions::new(&source),
//! )?;
//! let events = session.subscribe();
//!
//! session.handle_source_event(SourceEvent::Change(ChangeEvent::new(
//!     ChangeKind::FileAdded,
//!     "hello.txt",
//!     None,
//! )));
//! session.handle_source_event(SourceEvent::Ready);
//!
//! assert_eq!(fs::read(temp.path().join("dest/hello.txt"))?, b"hello");
//! assert!(matches!(events.try_recv()?, MirrorEvent::Mutation(_)));
//! assert!(matches!(events.try_recv()?, MirrorEvent::Ready));
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod error;
mod event;
mod fsops;
mod path_map;
mod policy;
mod session;
mod sweep;
mod visited;

pub use error::{MirrorError, MirrorErrorKind, MirrorResult};
pub use event::{
    ChangeEvent, ChangeKind, EntryKind, MirrorEvent, MutationEvent, SourceEvent, StatSnapshot,
};
pub use path_map::map_destination;
pub use policy::{DeletionMode, TimestampMode};
pub use session::{MirrorOptions, MirrorSession, Phase};
pub use visited::VisitTracker;
