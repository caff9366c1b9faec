//! The pub/sub transport seen by the bridge.

use crate::error::Result;
use std::time::Duration;

use super::types::{ChannelEvent, SubscribeOptions};

/// A connection to a pub/sub server.
///
/// Implementations own one network connection. Once `close` has been
/// called (or the server hung up and all buffered events were read), the
/// receive methods return `NotesError::ChannelClosed`.
pub trait FeedChannel {
    /// Subscribe to a topic.
    fn subscribe(&mut self, topic: &str, options: SubscribeOptions) -> Result<()>;

    /// Receive the next event, waiting up to `timeout`. `Ok(None)` on timeout.
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<ChannelEvent>>;

    /// Receive an event if one is ready.
    fn try_recv(&mut self) -> Result<Option<ChannelEvent>>;

    /// Close the connection. Idempotent.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

impl<C: FeedChannel + ?Sized> FeedChannel for Box<C> {
    fn subscribe(&mut self, topic: &str, options: SubscribeOptions) -> Result<()> {
        (**self).subscribe(topic, options)
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<ChannelEvent>> {
        (**self).recv_timeout(timeout)
    }

    fn try_recv(&mut self) -> Result<Option<ChannelEvent>> {
        (**self).try_recv()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}
