//! Live mirroring after the ready transition: adds, changes, removals under
//! each deletion mode, and error reporting for failed mutations.

mod common;

use common::{change, replay_initial_scan};
use mirror::{
    ChangeKind, DeletionMode, MirrorErrorKind, MirrorEvent, MirrorOptions, MirrorSession, Phase,
    SourceEvent,
};
use test_support::TempTree;

fn ready_session(tree: &TempTree, deletion: DeletionMode) -> MirrorSession {
    let mut session = MirrorSession::new(
        "**",
        tree.join("dest"),
        MirrorOptions::new(tree.join("src")).deletion(deletion),
    )
    .expect("session builds");
    replay_initial_scan(&mut session, &tree.join("src"));
    session.handle_source_event(SourceEvent::Ready);
    session
}

#[test]
fn copies_file_added_after_ready() {
    let tree = TempTree::new();
    tree.create_dir("src");
    let mut session = ready_session(&tree, DeletionMode::None);
    let events = session.subscribe();

    tree.write_file("src/test.txt", "test content");
    session.handle_source_event(change(ChangeKind::FileAdded, "test.txt"));

    match events.try_recv().expect("mutation event") {
        MirrorEvent::Mutation(mutation) => {
            assert_eq!(mutation.kind(), ChangeKind::FileAdded);
            assert_eq!(mutation.relative_path(), std::path::Path::new("test.txt"));
            assert_eq!(mutation.destination_path(), tree.join("dest/test.txt"));
        }
        other => panic!("expected mutation, got {other:?}"),
    }
    assert_eq!(tree.read_file("dest/test.txt"), b"test content");
    assert_eq!(session.phase(), Phase::Steady);
}

#[test]
fn copies_file_changed_after_ready() {
    let tree = TempTree::new();
    tree.write_file("src/test.txt", "initial");
    let mut session = ready_session(&tree, DeletionMode::None);

    tree.write_file("src/test.txt", "updated");
    session.handle_source_event(change(ChangeKind::FileChanged, "test.txt"));

    assert_eq!(tree.read_file("dest/test.txt"), b"updated");
}

#[test]
fn creates_directory_added_after_ready_without_stat() {
    let tree = TempTree::new();
    tree.create_dir("src");
    let mut session = ready_session(&tree, DeletionMode::None);
    let events = session.subscribe();

    // The watcher omitted the stat; the engine re-stats the source so the
    // default timestamp mode can still propagate times.
    tree.create_dir("src/new-dir");
    session.handle_source_event(change(ChangeKind::DirAdded, "new-dir"));

    assert!(tree.join("dest/new-dir").is_dir());
    match events.try_recv().expect("mutation event") {
        MirrorEvent::Mutation(mutation) => {
            assert_eq!(mutation.kind(), ChangeKind::DirAdded);
            assert!(mutation.stat().is_some(), "engine re-stats the source");
        }
        other => panic!("expected mutation, got {other:?}"),
    }
}

#[test]
fn continuous_mode_mirrors_file_removal() {
    let tree = TempTree::new();
    tree.write_file("src/test.txt", "content");
    let mut session = ready_session(&tree, DeletionMode::Continuous);
    let events = session.subscribe();

    std::fs::remove_file(tree.join("src/test.txt")).expect("remove source");
    session.handle_source_event(change(ChangeKind::FileRemoved, "test.txt"));

    match events.try_recv().expect("mutation event") {
        MirrorEvent::Mutation(mutation) => {
            assert_eq!(mutation.kind(), ChangeKind::FileRemoved);
            assert_eq!(mutation.kind().label(), "unlink");
        }
        other => panic!("expected mutation, got {other:?}"),
    }
    assert!(!tree.exists("dest/test.txt"));
}

#[test]
fn continuous_mode_mirrors_directory_removal_recursively() {
    let tree = TempTree::new();
    tree.write_file("src/gone/inner.txt", "x");
    let mut session = ready_session(&tree, DeletionMode::Continuous);

    std::fs::remove_dir_all(tree.join("src/gone")).expect("remove source dir");
    session.handle_source_event(change(ChangeKind::DirRemoved, "gone"));

    assert!(!tree.exists("dest/gone"));
}

#[test]
fn none_mode_suppresses_removal_without_event() {
    let tree = TempTree::new();
    tree.write_file("src/test.txt", "content");
    let mut session = ready_session(&tree, DeletionMode::None);
    let events = session.subscribe();

    session.handle_source_event(change(ChangeKind::FileRemoved, "test.txt"));

    assert!(events.try_recv().is_err(), "suppressed removal emits nothing");
    assert!(tree.exists("dest/test.txt"));
}

#[test]
fn initial_sweep_mode_suppresses_live_removal() {
    let tree = TempTree::new();
    tree.write_file("src/test.txt", "content");
    let mut session = ready_session(&tree, DeletionMode::InitialSweep);
    let events = session.subscribe();

    session.handle_source_event(change(ChangeKind::FileRemoved, "test.txt"));

    assert!(events.try_recv().is_err());
    assert!(tree.exists("dest/test.txt"));
}

#[test]
fn missing_source_file_reports_error_and_session_continues() {
    let tree = TempTree::new();
    tree.create_dir("src");
    let mut session = ready_session(&tree, DeletionMode::None);
    let events = session.subscribe();

    session.handle_source_event(change(ChangeKind::FileAdded, "vanished.txt"));
    match events.try_recv().expect("error event") {
        MirrorEvent::Error(error) => {
            assert!(matches!(error.kind(), MirrorErrorKind::Io { .. }));
        }
        other => panic!("expected error, got {other:?}"),
    }

    tree.write_file("src/next.txt", "still mirroring");
    session.handle_source_event(change(ChangeKind::FileAdded, "next.txt"));
    assert_eq!(tree.read_file("dest/next.txt"), b"still mirroring");
}

#[test]
fn removal_of_already_absent_destination_is_idempotent() {
    let tree = TempTree::new();
    tree.create_dir("src");
    let mut session = ready_session(&tree, DeletionMode::Continuous);
    let events = session.subscribe();

    session.handle_source_event(change(ChangeKind::FileRemoved, "never-mirrored.txt"));

    // Removing a missing entry succeeds and is reported as applied.
    match events.try_recv().expect("mutation event") {
        MirrorEvent::Mutation(mutation) => {
            assert_eq!(mutation.kind(), ChangeKind::FileRemoved);
        }
        other => panic!("expected mutation, got {other:?}"),
    }
}

#[test]
fn every_subscriber_receives_every_event() {
    let tree = TempTree::new();
    tree.create_dir("src");
    let mut session = ready_session(&tree, DeletionMode::None);
    let first = session.subscribe();
    let second = session.subscribe();

    tree.write_file("src/test.txt", "content");
    session.handle_source_event(change(ChangeKind::FileAdded, "test.txt"));

    assert!(matches!(first.try_recv(), Ok(MirrorEvent::Mutation(_))));
    assert!(matches!(second.try_recv(), Ok(MirrorEvent::Mutation(_))));
}
