//! The note store: current state plus dispatch.

use crate::error::Result;
use crate::persist::Persist;
use crate::state::actions::NoteAction;
use crate::state::reorder::{new_index, MoveRequest};
use crate::state::reduce;
use crate::types::{LaneId, Note, NoteId, NotesState};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

/// Anything actions can be dispatched to.
pub trait Dispatch {
    fn dispatch(&self, action: NoteAction);
}

impl<D: Dispatch + ?Sized> Dispatch for &D {
    fn dispatch(&self, action: NoteAction) {
        (**self).dispatch(action)
    }
}

/// Forward actions to another thread.
impl Dispatch for Sender<NoteAction> {
    fn dispatch(&self, action: NoteAction) {
        if self.send(action).is_err() {
            debug!("Action receiver gone; dropping action");
        }
    }
}

/// Where a dragged note sits after a drag step.
#[derive(Clone, Debug, PartialEq)]
pub struct LivePosition {
    pub note_id: NoteId,
    pub lane_id: LaneId,
    pub index: f64,
}

/// Holds the notes state and applies actions to it.
///
/// Dispatch is serialized by a lock, so the store can be shared between
/// the UI thread and a feed bridge thread.
pub struct NoteStore {
    state: RwLock<NotesState>,
    /// Drag gesture observers.
    position_watchers: Mutex<Vec<Sender<LivePosition>>>,
}

impl NoteStore {
    /// Create a store with the initial empty state.
    pub fn new() -> Self {
        Self::with_state(NotesState::default())
    }

    /// Create a store seeded with a state.
    pub fn with_state(state: NotesState) -> Self {
        Self {
            state: RwLock::new(state),
            position_watchers: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> NotesState {
        self.state.read().clone()
    }

    /// Current value of one note.
    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.state.read().get(id).cloned()
    }

    /// Whether the last mutation was acknowledged or echoed by the server.
    pub fn is_synced(&self) -> bool {
        self.state.read().synced
    }

    /// Error message of the last failed mutation.
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Apply an action.
    pub fn dispatch(&self, action: NoteAction) {
        debug!(action = action.type_name(), "Dispatch");
        let mut state = self.state.write();
        let next = reduce(&state, &action);
        *state = next;
    }

    /// Move a note during a drag gesture.
    ///
    /// Computes the new index against the current state, dispatches
    /// `DRAG_NOTE` and returns the new position. The same position is
    /// sent to every `watch_positions` receiver. Returns `None` without
    /// notifying anyone when the note is not in the store.
    pub fn drag_note(&self, request: &MoveRequest) -> Option<LivePosition> {
        let position = {
            let mut state = self.state.write();
            if state.get(&request.source_id).is_none() {
                debug!(note = %request.source_id, "Drag of unknown note ignored");
                return None;
            }

            let index = new_index(&state.data, request);
            let action = NoteAction::Drag {
                source_id: request.source_id.clone(),
                lane_id: request.target_lane_id.clone(),
                index,
            };
            debug!(
                note = %request.source_id,
                lane = %request.target_lane_id,
                index,
                "Drag"
            );
            let next = reduce(&state, &action);
            *state = next;

            LivePosition {
                note_id: request.source_id.clone(),
                lane_id: request.target_lane_id.clone(),
                index,
            }
        };

        self.position_watchers
            .lock()
            .retain(|watcher| watcher.send(position.clone()).is_ok());

        Some(position)
    }

    /// Receive every position produced by `drag_note`.
    pub fn watch_positions(&self) -> Receiver<LivePosition> {
        let (sender, receiver) = unbounded();
        self.position_watchers.lock().push(sender);
        receiver
    }

    /// Apply a mutation optimistically, persist it, then acknowledge.
    ///
    /// On failure the optimistic change stays and the error is recorded in
    /// the state. Actions that are not networked are only dispatched.
    pub fn commit<P: Persist + ?Sized>(&self, action: NoteAction, persister: &P) -> Result<()> {
        if !action.is_networked() {
            self.dispatch(action);
            return Ok(());
        }

        self.dispatch(action.clone());
        match persister.persist(&action) {
            Ok(()) => {
                if let Some(ack) = action.success() {
                    self.dispatch(ack);
                }
                Ok(())
            }
            Err(e) => {
                warn!(action = action.type_name(), error = %e, "Failed to persist note change");
                if let Some(failure) = action.failure(Some(e.to_string())) {
                    self.dispatch(failure);
                }
                Err(e)
            }
        }
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for NoteStore {
    fn dispatch(&self, action: NoteAction) {
        NoteStore::dispatch(self, action)
    }
}
