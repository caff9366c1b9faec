//! In-process pub/sub hub.
//!
//! Stands in for the change-feed server when both ends live in one
//! process: every `publish` fans out to the connections subscribed to the
//! topic. Connections whose buffer overflows are dropped; they then see
//! an `Unsubscribe` for each of their topics.

use crate::error::{NotesError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::channel::FeedChannel;
use super::types::{ChangeEvent, ChannelEvent, ChannelId, HubConfig, SubscribeOptions};

/// Hub-side state of one connection.
struct Connection {
    sender: Sender<ChannelEvent>,
    topics: HashMap<String, SubscribeOptions>,
    authenticated: bool,
}

impl Connection {
    /// Try to send an event. Returns false if the connection should be dropped.
    fn try_send(&self, event: ChannelEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    fn wants(&self, topic: &str) -> bool {
        match self.topics.get(topic) {
            Some(options) => self.authenticated || !options.wait_for_auth,
            None => false,
        }
    }
}

struct HubInner {
    connections: RwLock<HashMap<ChannelId, Connection>>,
    next_id: AtomicU64,
    config: HubConfig,
}

impl HubInner {
    fn disconnect(&self, id: ChannelId) -> bool {
        self.connections.write().remove(&id).is_some()
    }
}

/// An in-process change-feed server.
///
/// Cheap to clone; clones share the same connections.
#[derive(Clone)]
pub struct FeedHub {
    inner: Arc<HubInner>,
}

impl FeedHub {
    /// Create a hub with default configuration.
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with the given configuration.
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                connections: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Open a new connection.
    pub fn connect(&self) -> LocalChannel {
        let id = ChannelId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(self.inner.config.buffer_size);

        self.inner.connections.write().insert(
            id,
            Connection {
                sender,
                topics: HashMap::new(),
                authenticated: false,
            },
        );
        debug!(channel = id.0, "Feed connection opened");

        LocalChannel {
            id,
            hub: Arc::clone(&self.inner),
            receiver,
            topics: Vec::new(),
            pending: VecDeque::new(),
            open: true,
        }
    }

    /// Mark a connection as authenticated, releasing auth-gated topics.
    pub fn authenticate(&self, id: ChannelId) -> Result<()> {
        let mut connections = self.inner.connections.write();
        match connections.get_mut(&id) {
            Some(connection) => {
                connection.authenticated = true;
                Ok(())
            }
            None => Err(NotesError::ChannelClosed),
        }
    }

    /// Publish a change to every connection subscribed to `topic`.
    ///
    /// Returns the number of connections that received it.
    pub fn publish(&self, topic: &str, data: ChangeEvent) -> usize {
        let event = ChannelEvent::Publish {
            channel: topic.to_string(),
            data,
        };

        let mut delivered = 0;
        let mut to_remove = Vec::new();

        {
            let connections = self.inner.connections.read();
            for (id, connection) in connections.iter() {
                if connection.wants(topic) {
                    if connection.try_send(event.clone()) {
                        delivered += 1;
                    } else {
                        to_remove.push(*id);
                    }
                }
            }
        }

        // Dropping the sender lets the client see the hang-up once drained
        if !to_remove.is_empty() {
            let mut connections = self.inner.connections.write();
            for id in to_remove {
                if connections.remove(&id).is_some() {
                    warn!(channel = id.0, topic, "Dropped slow feed connection");
                }
            }
        }

        delivered
    }

    /// Server-side unsubscribe of one connection from a topic.
    pub fn kick(&self, id: ChannelId, topic: &str) -> Result<()> {
        let mut connections = self.inner.connections.write();
        let connection = connections.get_mut(&id).ok_or(NotesError::ChannelClosed)?;
        if connection.topics.remove(topic).is_none() {
            return Err(NotesError::NotSubscribed(topic.to_string()));
        }

        let notice = ChannelEvent::Unsubscribe {
            channel: topic.to_string(),
        };
        if !connection.try_send(notice) {
            connections.remove(&id);
            warn!(channel = id.0, topic, "Dropped slow feed connection");
        }
        Ok(())
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.inner.connections.read().len()
    }

    /// Number of connections subscribed to `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .connections
            .read()
            .values()
            .filter(|c| c.topics.contains_key(topic))
            .count()
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client end of a hub connection.
pub struct LocalChannel {
    id: ChannelId,
    hub: Arc<HubInner>,
    receiver: Receiver<ChannelEvent>,
    /// Topics we believe we are subscribed to.
    topics: Vec<String>,
    /// Unsubscribe notices synthesized after the hub hung up.
    pending: VecDeque<ChannelEvent>,
    open: bool,
}

impl LocalChannel {
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Track topic membership from what we hand out.
    fn observe(&mut self, event: ChannelEvent) -> ChannelEvent {
        if let ChannelEvent::Unsubscribe { ref channel } = event {
            self.topics.retain(|t| t != channel);
        }
        event
    }

    /// The hub dropped us: queue an unsubscribe for every remaining topic.
    fn hung_up(&mut self) -> Result<Option<ChannelEvent>> {
        if self.open {
            debug!(channel = self.id.0, "Feed connection hung up by hub");
            self.open = false;
            for topic in self.topics.drain(..) {
                self.pending
                    .push_back(ChannelEvent::Unsubscribe { channel: topic });
            }
        }
        match self.pending.pop_front() {
            Some(event) => Ok(Some(event)),
            None => Err(NotesError::ChannelClosed),
        }
    }
}

impl FeedChannel for LocalChannel {
    fn subscribe(&mut self, topic: &str, options: SubscribeOptions) -> Result<()> {
        if !self.open {
            return Err(NotesError::ChannelClosed);
        }

        let mut connections = self.hub.connections.write();
        let connection = connections
            .get_mut(&self.id)
            .ok_or(NotesError::ChannelClosed)?;
        connection.topics.insert(topic.to_string(), options);
        if !self.topics.iter().any(|t| t == topic) {
            self.topics.push(topic.to_string());
        }
        debug!(channel = self.id.0, topic, wait_for_auth = options.wait_for_auth, "Subscribed");
        Ok(())
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<ChannelEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        if !self.open {
            return Err(NotesError::ChannelClosed);
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Ok(Some(self.observe(event))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => self.hung_up(),
        }
    }

    fn try_recv(&mut self) -> Result<Option<ChannelEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        if !self.open {
            return Err(NotesError::ChannelClosed);
        }
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(self.observe(event))),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => self.hung_up(),
        }
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.topics.clear();
            self.pending.clear();
            if self.hub.disconnect(self.id) {
                debug!(channel = self.id.0, "Feed connection closed");
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for LocalChannel {
    fn drop(&mut self) {
        self.close();
    }
}
