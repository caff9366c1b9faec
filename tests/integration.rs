//! Integration tests for the note store and change feed.

use notes_sync::{
    add_note, schema, update_note, ActionMeta, ChangeEvent, ChangeFeedBridge, FeedHub, MoveRequest,
    Note, NoteAction, NotePatch, NoteStore, NotesState, Persist, Result, SyncConfig,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn note(id: &str, lane: &str, index: f64) -> Note {
    Note {
        id: id.into(),
        title: format!("note {}", id),
        lane_id: lane.into(),
        user_id: "user-1".into(),
        index,
    }
}

/// Accepts everything without touching the network.
struct AcceptAll;

impl Persist for AcceptAll {
    fn persist(&self, _action: &NoteAction) -> Result<()> {
        Ok(())
    }
}

fn open_config() -> SyncConfig {
    SyncConfig {
        wait_for_auth: false,
        poll_interval: Duration::from_millis(10),
        ..Default::default()
    }
}

// --- Realistic Workflow Tests ---

#[test]
fn test_optimistic_add_then_feed_echo() {
    init_tracing();
    let hub = FeedHub::new();
    let store = NoteStore::new();
    let mut bridge = ChangeFeedBridge::open(hub.connect(), open_config()).unwrap();

    // Local insert, validated upstream
    let draft = NotePatch::new("card-1")
        .with_title("  Plan sprint ")
        .with_lane("lane-todo")
        .with_user("user-1")
        .with_index(1.0);
    let validated = schema::validate_insert(draft).unwrap();
    store.dispatch(add_note(validated.clone(), None));
    assert!(!store.is_synced());
    assert_eq!(store.note(&"card-1".into()).unwrap().title, "Plan sprint");

    // Server commits and echoes
    let mut committed = validated;
    committed.title = "Plan sprint 12".into();
    hub.publish("allNotes", ChangeEvent::inserted(committed));
    assert_eq!(bridge.pump(&store).unwrap(), 1);

    let state = store.state();
    assert!(state.synced);
    assert_eq!(state.len(), 1);
    assert_eq!(state.data[0].title, "Plan sprint 12");
}

#[test]
fn test_feed_update_and_delete() {
    let hub = FeedHub::new();
    let store = NoteStore::with_state(NotesState {
        synced: true,
        error: None,
        data: vec![note("aaa", "lane-1", 1.0), note("bbb", "lane-1", 2.0)],
    });
    let mut bridge = ChangeFeedBridge::open(hub.connect(), open_config()).unwrap();

    let mut renamed = note("aaa", "lane-1", 1.0);
    renamed.title = "renamed".into();
    hub.publish(
        "allNotes",
        ChangeEvent::updated(note("aaa", "lane-1", 1.0), renamed),
    );
    hub.publish("allNotes", ChangeEvent::deleted(note("bbb", "lane-1", 2.0)));
    bridge.pump(&store).unwrap();

    let state = store.state();
    assert_eq!(state.len(), 1);
    assert_eq!(state.data[0].title, "renamed");
    assert!(state.synced);
}

#[test]
fn test_unsubscribe_flushes_store() {
    let hub = FeedHub::new();
    let store = NoteStore::new();
    let mut bridge = ChangeFeedBridge::open(hub.connect(), open_config()).unwrap();

    hub.publish("allNotes", ChangeEvent::inserted(note("aaa", "lane-1", 1.0)));
    bridge.pump(&store).unwrap();
    assert_eq!(store.state().len(), 1);

    hub.kick(bridge.channel().id(), "allNotes").unwrap();
    bridge.pump(&store).unwrap();

    assert_eq!(store.state(), NotesState::default());
    assert!(bridge.is_stopped());
}

#[test]
fn test_bridge_on_its_own_thread() {
    let hub = FeedHub::new();
    let store = Arc::new(NoteStore::new());
    let bridge = ChangeFeedBridge::open(hub.connect(), open_config()).unwrap();
    let channel_id = bridge.channel().id();

    let worker = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut bridge = bridge;
            bridge.run(&*store).unwrap();
        })
    };

    for i in 0..5 {
        hub.publish(
            "allNotes",
            ChangeEvent::inserted(note(&format!("n{:02}", i), "lane-1", i as f64)),
        );
    }
    hub.kick(channel_id, "allNotes").unwrap();
    worker.join().unwrap();

    // Inserts were applied, then the unsubscribe cleared them
    assert_eq!(store.state(), NotesState::default());
    assert_eq!(hub.connection_count(), 0);
}

#[test]
fn test_wait_for_auth_defers_events() {
    let hub = FeedHub::new();
    let store = NoteStore::new();
    let mut bridge = ChangeFeedBridge::open(hub.connect(), SyncConfig::default()).unwrap();

    hub.publish("allNotes", ChangeEvent::inserted(note("aaa", "lane-1", 1.0)));
    assert_eq!(bridge.pump(&store).unwrap(), 0);

    hub.authenticate(bridge.channel().id()).unwrap();
    hub.publish("allNotes", ChangeEvent::inserted(note("bbb", "lane-1", 2.0)));
    assert_eq!(bridge.pump(&store).unwrap(), 1);
    assert!(store.note(&"bbb".into()).is_some());
}

#[test]
fn test_each_load_gets_its_own_connection() {
    let hub = FeedHub::new();
    let store = NoteStore::new();

    let first = ChangeFeedBridge::open(hub.connect(), open_config()).unwrap();
    let mut second = ChangeFeedBridge::open(hub.connect(), open_config()).unwrap();
    assert_eq!(hub.subscriber_count("allNotes"), 2);

    first.close();
    assert_eq!(hub.subscriber_count("allNotes"), 1);

    hub.publish("allNotes", ChangeEvent::inserted(note("aaa", "lane-1", 1.0)));
    assert_eq!(second.pump(&store).unwrap(), 1);
}

#[test]
fn test_drag_across_lanes_then_commit() {
    let store = NoteStore::with_state(NotesState {
        synced: true,
        error: None,
        data: vec![
            note("aaa", "lane-1", 1.0),
            note("bbb", "lane-1", 2.0),
            note("xxx", "lane-2", 1.0),
            note("yyy", "lane-2", 2.0),
        ],
    });
    let positions = store.watch_positions();

    // Hover over yyy in lane-2: lands between xxx and yyy
    let live = store
        .drag_note(&MoveRequest {
            source_id: "bbb".into(),
            source_lane_id: "lane-1".into(),
            source_index: 2.0,
            target_lane_id: "lane-2".into(),
            target_index: 2.0,
        })
        .unwrap();
    assert_eq!(live.index, 1.5);
    assert_eq!(positions.try_recv().unwrap(), live);

    let lane: Vec<String> = store
        .state()
        .lane(&"lane-2".into())
        .iter()
        .map(|n| n.id.to_string())
        .collect();
    assert_eq!(lane, vec!["xxx", "bbb", "yyy"]);

    // Drop: persist the final position
    let patch = NotePatch::new("bbb").with_lane("lane-2").with_index(live.index);
    store
        .commit(update_note(patch, None), &AcceptAll)
        .unwrap();
    assert!(store.is_synced());
}

#[test]
fn test_feed_echo_after_failed_persist_clears_error_on_success() {
    let store = NoteStore::new();
    store.dispatch(add_note(note("aaa", "lane-1", 1.0), None));
    store.dispatch(NoteAction::AddError { error: None });
    assert_eq!(store.error().as_deref(), Some("Error"));

    store.dispatch(add_note(note("aaa", "lane-1", 1.0), Some(ActionMeta::synced())));
    assert_eq!(store.error().as_deref(), Some("Error"));

    store.dispatch(NoteAction::AddSuccess);
    assert!(store.error().is_none());
}
