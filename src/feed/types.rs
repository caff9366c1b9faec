//! Change-feed event and configuration types.

use crate::types::Note;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Topic carrying every committed note change.
pub const ALL_NOTES_TOPIC: &str = "allNotes";

/// Configuration for a change-feed bridge.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Topic to subscribe to.
    /// Default: "allNotes"
    pub topic: String,

    /// Only deliver events once the connection is authenticated.
    /// Default: true
    pub wait_for_auth: bool,

    /// How long `run` waits for an event before re-checking the channel.
    /// Default: 100ms
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            topic: ALL_NOTES_TOPIC.to_string(),
            wait_for_auth: true,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Configuration for an in-process feed hub.
#[derive(Clone, Debug)]
pub struct HubConfig {
    /// Max buffered events per connection before it is dropped.
    /// Default: 1000
    pub buffer_size: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { buffer_size: 1000 }
    }
}

/// Options for a topic subscription.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub wait_for_auth: bool,
}

/// A committed change to one note.
///
/// `old_val` absent means insert, `new_val` absent means delete, both
/// present means update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_val: Option<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_val: Option<Note>,
}

impl ChangeEvent {
    pub fn inserted(note: Note) -> Self {
        Self {
            old_val: None,
            new_val: Some(note),
        }
    }

    pub fn updated(old: Note, new: Note) -> Self {
        Self {
            old_val: Some(old),
            new_val: Some(new),
        }
    }

    pub fn deleted(note: Note) -> Self {
        Self {
            old_val: Some(note),
            new_val: None,
        }
    }
}

/// Events delivered by a feed channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// A change was published on a topic.
    Publish { channel: String, data: ChangeEvent },

    /// The connection is no longer subscribed to a topic.
    Unsubscribe { channel: String },
}

/// Unique identifier for a connection to a hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);
