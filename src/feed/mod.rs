//! Realtime sync over a pub/sub change feed.
//!
//! The server publishes every committed note change on the `allNotes`
//! topic. A [`ChangeFeedBridge`] subscribes a [`FeedChannel`] to that topic
//! and turns each change into a synced store action:
//!
//! - insert → `ADD_NOTE`
//! - update → `UPDATE_NOTE`
//! - delete → `DELETE_NOTE`
//! - topic unsubscribed → `CLEAR_NOTES`
//!
//! # Example
//!
//! ```ignore
//! let hub = FeedHub::new();
//! let store = NoteStore::new();
//!
//! let mut bridge = ChangeFeedBridge::open(hub.connect(), SyncConfig::default())?;
//! hub.publish("allNotes", ChangeEvent::inserted(note));
//! bridge.pump(&store)?;
//! ```

mod bridge;
mod channel;
mod hub;
mod types;

pub use bridge::{map_change, ChangeFeedBridge, Flow};
pub use channel::FeedChannel;
pub use hub::{FeedHub, LocalChannel};
pub use types::{
    ChangeEvent, ChannelEvent, ChannelId, HubConfig, SubscribeOptions, SyncConfig,
    ALL_NOTES_TOPIC,
};
