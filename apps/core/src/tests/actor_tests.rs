//! Actor System Tests
//!
//! Breakout coordinator: regrouping, serialized membership changes and state publication.

use crate::actors::breakout::BreakoutHandle;
use crate::actors::messages::{ActorError, AppError};
use crate::actors::traits::InterestAnalyzer;
use crate::brain::KeywordIndex;
use crate::config::BreakoutConfig;
use crate::models::{ChatMessage, Participant};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Mock Analyzer
// ============================================================================

/// Returns a fixed index regardless of the transcript, counting calls.
pub struct FixedInterests {
    index: KeywordIndex,
    calls: Arc<AtomicUsize>,
}

impl FixedInterests {
    pub fn new(entries: Vec<(&str, Vec<&str>)>) -> Self {
        Self {
            index: entries.into_iter().collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl InterestAnalyzer for FixedInterests {
    fn analyze(&self, _messages: &[ChatMessage]) -> KeywordIndex {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.index.clone()
    }
}

fn roster(ids: &[&str]) -> Vec<Participant> {
    ids.iter().map(|id| Participant::new(*id)).collect()
}

fn spawn_coordinator() -> BreakoutHandle {
    BreakoutHandle::with_analyzer(
        &BreakoutConfig::default(),
        FixedInterests::new(vec![
            ("music", vec!["a", "b", "c"]),
            ("chess", vec!["d", "e", "f", "g"]),
        ]),
    )
}

// ============================================================================
// Coordinator Tests
// ============================================================================

#[tokio::test]
async fn test_regroup_publishes_rooms() {
    let handle = spawn_coordinator();
    assert!(handle.snapshot().rooms().is_empty());

    let rooms = handle
        .regroup(roster(&["a", "b", "c", "d", "e", "f", "g"]), vec![])
        .await
        .unwrap();

    assert_eq!(rooms.len(), 2);
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.rooms(), rooms.as_slice());
    assert_eq!(snapshot.version(), 1);
}

#[tokio::test]
async fn test_analyzer_runs_once_per_regroup() {
    let analyzer = FixedInterests::new(vec![("music", vec!["a", "b", "c"])]);
    let calls = Arc::clone(&analyzer.calls);
    let handle = BreakoutHandle::with_analyzer(&BreakoutConfig::default(), analyzer);

    handle.regroup(roster(&["a", "b", "c"]), vec![]).await.unwrap();
    handle.regroup(roster(&["a", "b", "c"]), vec![]).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_join_and_leave_are_broadcast() {
    let handle = spawn_coordinator();
    let rooms = handle
        .regroup(roster(&["a", "b", "c", "d", "e", "f", "g"]), vec![])
        .await
        .unwrap();

    let mut updates = handle.subscribe();
    let _ = updates.borrow_and_update();

    handle
        .join_room(&rooms[0].id, Participant::new("z"))
        .await
        .unwrap();
    updates.changed().await.unwrap();
    {
        let state = updates.borrow_and_update();
        assert_eq!(state.current_room_of("z"), Some(rooms[0].id.as_str()));
        assert_eq!(state.room(&rooms[0].id).unwrap().len(), 4);
    }

    handle.leave_room("z").await.unwrap();
    updates.changed().await.unwrap();
    let state = updates.borrow_and_update().clone();
    assert_eq!(state.current_room_of("z"), None);
    assert_eq!(state.room(&rooms[0].id).unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_room_is_rejected_without_commit() {
    let handle = spawn_coordinator();
    handle
        .regroup(roster(&["a", "b", "c"]), vec![])
        .await
        .unwrap();
    let before = handle.snapshot();

    let err = handle
        .join_room("no-such-room", Participant::new("a"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnknownRoom(_)));
    assert_eq!(handle.snapshot().version(), before.version());
}

#[tokio::test]
async fn test_leave_from_main_session_publishes_nothing() {
    let handle = spawn_coordinator();
    handle
        .regroup(roster(&["a", "b", "c"]), vec![])
        .await
        .unwrap();
    let mut updates = handle.subscribe();
    let before = updates.borrow_and_update().clone();

    handle.leave_room("nobody").await.unwrap();

    assert!(!updates.has_changed().unwrap());
    assert_eq!(handle.snapshot().version(), before.version());
}

#[tokio::test]
async fn test_concurrent_joins_keep_single_membership() {
    let handle = spawn_coordinator();
    let rooms = handle
        .regroup(roster(&["a", "b", "c", "d", "e", "f", "g"]), vec![])
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let handle = handle.clone();
        let room_id = rooms[i % 2].id.clone();
        tasks.push(tokio::spawn(async move {
            handle.join_room(&room_id, Participant::new("roamer")).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let state = handle.snapshot();
    let memberships = state
        .rooms()
        .iter()
        .filter(|r| r.contains("roamer"))
        .count();
    assert_eq!(memberships, 1);
    assert_eq!(state.version(), 21);
}

#[tokio::test]
async fn test_requests_fail_after_shutdown() {
    let handle = spawn_coordinator();
    handle.shutdown().await.unwrap();

    let err = handle.leave_room("a").await.unwrap_err();
    assert!(matches!(err, AppError::Actor(ActorError::Unavailable(_))));
}
