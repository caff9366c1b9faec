//! Change-feed bridge: feed events in, store actions out.

use crate::error::{NotesError, Result};
use crate::state::actions::{add_note, delete_note, update_note, ActionMeta, NoteAction};
use crate::store::Dispatch;
use tracing::{debug, warn};

use super::channel::FeedChannel;
use super::types::{ChangeEvent, ChannelEvent, SubscribeOptions, SyncConfig};

/// Translate a committed change into the matching synced mutation.
///
/// Returns `None` for an event with neither value.
pub fn map_change(event: &ChangeEvent) -> Option<NoteAction> {
    let meta = Some(ActionMeta::synced());
    match (&event.old_val, &event.new_val) {
        (None, Some(new)) => Some(add_note(new.clone(), meta)),
        (Some(old), None) => Some(delete_note(old.id.clone(), meta)),
        (Some(_), Some(new)) => Some(update_note(new.clone(), meta)),
        (None, None) => None,
    }
}

/// Whether the bridge should keep reading after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Our topic was unsubscribed; the store has been cleared.
    Stopped,
}

/// A subscription to the notes topic over one channel.
///
/// The bridge owns its channel: opening it subscribes, closing or
/// dropping it closes the connection. Build one per load.
pub struct ChangeFeedBridge<C: FeedChannel> {
    channel: C,
    config: SyncConfig,
    stopped: bool,
}

impl<C: FeedChannel> ChangeFeedBridge<C> {
    /// Subscribe `channel` to the configured topic.
    pub fn open(mut channel: C, config: SyncConfig) -> Result<Self> {
        let options = SubscribeOptions {
            wait_for_auth: config.wait_for_auth,
        };
        channel.subscribe(&config.topic, options)?;
        debug!(topic = %config.topic, "Change feed bridge opened");

        Ok(Self {
            channel,
            config,
            stopped: false,
        })
    }

    /// Topic this bridge is subscribed to.
    pub fn topic(&self) -> &str {
        &self.config.topic
    }

    /// The underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// True once the topic was unsubscribed or the channel closed.
    pub fn is_stopped(&self) -> bool {
        self.stopped || !self.channel.is_open()
    }

    /// Dispatch whatever a single channel event calls for.
    pub fn handle_event<D: Dispatch + ?Sized>(&mut self, event: ChannelEvent, dispatch: &D) -> Flow {
        match event {
            ChannelEvent::Publish { channel, data } => {
                if channel != self.config.topic {
                    return Flow::Continue;
                }
                match map_change(&data) {
                    Some(action) => {
                        debug!(topic = %channel, action = action.type_name(), "Feed change");
                        dispatch.dispatch(action);
                    }
                    None => warn!(topic = %channel, "Ignoring feed event without old or new value"),
                }
                Flow::Continue
            }
            ChannelEvent::Unsubscribe { channel } => {
                if channel != self.config.topic {
                    return Flow::Continue;
                }
                debug!(topic = %channel, "Feed unsubscribed; clearing notes");
                dispatch.dispatch(NoteAction::Clear);
                self.stopped = true;
                Flow::Stopped
            }
        }
    }

    /// Handle every event that is already waiting. Returns how many were read.
    pub fn pump<D: Dispatch + ?Sized>(&mut self, dispatch: &D) -> Result<usize> {
        let mut handled = 0;
        while !self.stopped {
            match self.channel.try_recv() {
                Ok(Some(event)) => {
                    handled += 1;
                    self.handle_event(event, dispatch);
                }
                Ok(None) => break,
                Err(NotesError::ChannelClosed) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(handled)
    }

    /// Block, handling events until the topic is unsubscribed or the
    /// channel closes.
    pub fn run<D: Dispatch + ?Sized>(&mut self, dispatch: &D) -> Result<()> {
        while !self.stopped {
            match self.channel.recv_timeout(self.config.poll_interval) {
                Ok(Some(event)) => {
                    self.handle_event(event, dispatch);
                }
                Ok(None) => continue,
                Err(NotesError::ChannelClosed) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Close the underlying connection.
    pub fn close(mut self) {
        self.channel.close();
    }
}

impl<C: FeedChannel> Drop for ChangeFeedBridge<C> {
    fn drop(&mut self) {
        self.channel.close();
    }
}
