//! # Notes Sync
//!
//! State management for a collaborative, lane-based note board.
//!
//! ## Core Concepts
//!
//! - **Reducer**: a pure `(state, action) -> state` function over the notes slice
//! - **Optimistic updates**: mutations apply locally first (`synced = false`)
//!   and are acknowledged once the server persists them
//! - **Change feed**: committed changes are echoed back over a pub/sub topic
//!   and re-applied as synced actions
//! - **Fractional indexing**: a dragged note gets a key between its new
//!   neighbours, so no other note is renumbered
//!
//! ## Example
//!
//! ```ignore
//! use notes_sync::{add_note, schema, ChangeFeedBridge, FeedHub, NoteStore, SyncConfig};
//!
//! let store = NoteStore::new();
//! let note = schema::validate_insert(draft)?;
//! store.commit(add_note(note, None), &persister)?;
//!
//! let hub = FeedHub::new();
//! let mut bridge = ChangeFeedBridge::open(hub.connect(), SyncConfig::default())?;
//! bridge.pump(&store)?;
//! ```

pub mod error;
pub mod feed;
pub mod http;
pub mod persist;
pub mod schema;
pub mod state;
pub mod store;
pub mod types;

// Re-exports
pub use error::{NotesError, Result};
pub use feed::{
    map_change, ChangeEvent, ChangeFeedBridge, ChannelEvent, ChannelId, FeedChannel, FeedHub,
    Flow, HubConfig, LocalChannel, SubscribeOptions, SyncConfig, ALL_NOTES_TOPIC,
};
pub use http::{host_url, parse_json, HttpConfig, JsonClient};
pub use persist::{HttpPersister, Persist, DEFAULT_NOTES_ROUTE};
pub use state::{
    add_note, clear_notes, delete_note, new_index, rebalance_lane, reduce, update_note,
    ActionEnvelope, ActionMeta, MoveRequest, NoteAction,
};
pub use store::{Dispatch, LivePosition, NoteStore};
pub use types::*;
