//! Helpers shared by the integration suites: a simulated watcher that
//! replays a source tree as the event sequence an initial scan produces.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use mirror::{ChangeEvent, ChangeKind, MirrorSession, SourceEvent, StatSnapshot};

/// Feeds the session one change event for every entry currently under
/// `source_root`, directories before their contents, in sorted order. This is
/// the notification sequence a recursive watcher emits during its initial
/// scan, minus the trailing `Ready`.
pub fn replay_initial_scan(session: &mut MirrorSession, source_root: &Path) {
    // A missing source root scans as empty: the watcher emits no entries.
    if !source_root.exists() {
        return;
    }
    replay_dir(session, source_root, Path::new(""));
}

fn replay_dir(session: &mut MirrorSession, dir: &Path, relative_prefix: &Path) {
    let mut names: Vec<_> = fs::read_dir(dir)
        .expect("read source dir")
        .map(|entry| entry.expect("source entry").file_name())
        .collect();
    names.sort();

    for name in names {
        let full = dir.join(&name);
        let relative = relative_prefix.join(&name);
        let metadata = fs::metadata(&full).expect("source metadata");
        let stat = Some(StatSnapshot::from_metadata(&metadata));
        if metadata.is_dir() {
            session.handle_source_event(SourceEvent::Change(ChangeEvent::new(
                ChangeKind::DirAdded,
                relative.clone(),
                stat,
            )));
            replay_dir(session, &full, &relative);
        } else {
            session.handle_source_event(SourceEvent::Change(ChangeEvent::new(
                ChangeKind::FileAdded,
                relative,
                stat,
            )));
        }
    }
}

/// Builds a change notification without a stat, the way watchers sometimes
/// deliver them.
pub fn change(kind: ChangeKind, relative: &str) -> SourceEvent {
    SourceEvent::Change(ChangeEvent::new(kind, relative, None))
}
