//! Actions, action creators and the wire envelope.

use crate::error::{NotesError, Result};
use crate::types::{LaneId, Note, NoteId, NotePatch};
use serde::{Deserialize, Serialize};

/// Database table the note actions belong to.
pub const NOTES_TABLE: &str = "notes";

/// Fallback error text when a failure carries no message.
pub const DEFAULT_ERROR: &str = "Error";

pub const ADD_NOTE: &str = "ADD_NOTE";
pub const UPDATE_NOTE: &str = "UPDATE_NOTE";
pub const DELETE_NOTE: &str = "DELETE_NOTE";
pub const DRAG_NOTE: &str = "DRAG_NOTE";
pub const CLEAR_NOTES: &str = "CLEAR_NOTES";
pub const ADD_NOTE_SUCCESS: &str = "ADD_NOTE_SUCCESS";
pub const UPDATE_NOTE_SUCCESS: &str = "UPDATE_NOTE_SUCCESS";
pub const DELETE_NOTE_SUCCESS: &str = "DELETE_NOTE_SUCCESS";
pub const ADD_NOTE_ERROR: &str = "ADD_NOTE_ERROR";
pub const UPDATE_NOTE_ERROR: &str = "UPDATE_NOTE_ERROR";
pub const DELETE_NOTE_ERROR: &str = "DELETE_NOTE_ERROR";

/// Metadata carried by networked mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    pub table: String,
    pub is_optimistic: bool,
    pub synced: bool,
}

impl Default for ActionMeta {
    fn default() -> Self {
        Self {
            table: NOTES_TABLE.to_string(),
            is_optimistic: true,
            synced: false,
        }
    }
}

impl ActionMeta {
    /// Metadata for a change the server has already committed.
    pub fn synced() -> Self {
        Self {
            synced: true,
            ..Default::default()
        }
    }
}

/// Everything that can happen to the notes slice.
#[derive(Clone, Debug, PartialEq)]
pub enum NoteAction {
    Add { note: Note, meta: ActionMeta },
    Update { patch: NotePatch, meta: ActionMeta },
    Delete { id: NoteId, meta: ActionMeta },
    /// Local-only position change during a drag gesture.
    Drag {
        source_id: NoteId,
        lane_id: LaneId,
        index: f64,
    },
    /// The feed channel closed: flush everything.
    Clear,
    AddSuccess,
    UpdateSuccess,
    DeleteSuccess,
    AddError { error: Option<String> },
    UpdateError { error: Option<String> },
    DeleteError { error: Option<String> },
    /// Any type string the reducer does not handle.
    Unrecognized(String),
}

pub fn add_note(note: Note, meta: Option<ActionMeta>) -> NoteAction {
    NoteAction::Add {
        note,
        meta: meta.unwrap_or_default(),
    }
}

pub fn update_note(patch: impl Into<NotePatch>, meta: Option<ActionMeta>) -> NoteAction {
    NoteAction::Update {
        patch: patch.into(),
        meta: meta.unwrap_or_default(),
    }
}

pub fn delete_note(id: impl Into<NoteId>, meta: Option<ActionMeta>) -> NoteAction {
    NoteAction::Delete {
        id: id.into(),
        meta: meta.unwrap_or_default(),
    }
}

pub fn clear_notes() -> NoteAction {
    NoteAction::Clear
}

impl NoteAction {
    /// The wire type string of this action.
    pub fn type_name(&self) -> &str {
        match self {
            NoteAction::Add { .. } => ADD_NOTE,
            NoteAction::Update { .. } => UPDATE_NOTE,
            NoteAction::Delete { .. } => DELETE_NOTE,
            NoteAction::Drag { .. } => DRAG_NOTE,
            NoteAction::Clear => CLEAR_NOTES,
            NoteAction::AddSuccess => ADD_NOTE_SUCCESS,
            NoteAction::UpdateSuccess => UPDATE_NOTE_SUCCESS,
            NoteAction::DeleteSuccess => DELETE_NOTE_SUCCESS,
            NoteAction::AddError { .. } => ADD_NOTE_ERROR,
            NoteAction::UpdateError { .. } => UPDATE_NOTE_ERROR,
            NoteAction::DeleteError { .. } => DELETE_NOTE_ERROR,
            NoteAction::Unrecognized(kind) => kind,
        }
    }

    /// Whether this action is a mutation that should be sent to the server.
    pub fn is_networked(&self) -> bool {
        matches!(
            self,
            NoteAction::Add { .. } | NoteAction::Update { .. } | NoteAction::Delete { .. }
        )
    }

    /// The acknowledgement to dispatch once this mutation is persisted.
    pub fn success(&self) -> Option<NoteAction> {
        match self {
            NoteAction::Add { .. } => Some(NoteAction::AddSuccess),
            NoteAction::Update { .. } => Some(NoteAction::UpdateSuccess),
            NoteAction::Delete { .. } => Some(NoteAction::DeleteSuccess),
            _ => None,
        }
    }

    /// The failure to dispatch when persisting this mutation fails.
    pub fn failure(&self, error: Option<String>) -> Option<NoteAction> {
        match self {
            NoteAction::Add { .. } => Some(NoteAction::AddError { error }),
            NoteAction::Update { .. } => Some(NoteAction::UpdateError { error }),
            NoteAction::Delete { .. } => Some(NoteAction::DeleteError { error }),
            _ => None,
        }
    }

    /// Encode as a `{type, payload, meta, error}` envelope.
    pub fn to_envelope(&self) -> Result<ActionEnvelope> {
        let (payload, meta, error) = match self {
            NoteAction::Add { note, meta } => {
                (serde_json::to_value(note)?, Some(meta.clone()), None)
            }
            NoteAction::Update { patch, meta } => {
                (serde_json::to_value(patch)?, Some(meta.clone()), None)
            }
            NoteAction::Delete { id, meta } => (
                serde_json::json!({ "id": id }),
                Some(meta.clone()),
                None,
            ),
            NoteAction::Drag {
                source_id,
                lane_id,
                index,
            } => (
                serde_json::json!({
                    "sourceId": source_id,
                    "laneId": lane_id,
                    "index": index,
                }),
                None,
                None,
            ),
            NoteAction::AddError { error }
            | NoteAction::UpdateError { error }
            | NoteAction::DeleteError { error } => {
                (serde_json::Value::Null, None, error.clone())
            }
            _ => (serde_json::Value::Null, None, None),
        };

        Ok(ActionEnvelope {
            kind: self.type_name().to_string(),
            payload,
            meta,
            error,
        })
    }

    /// Decode an envelope. Unknown type strings become `Unrecognized`.
    pub fn from_envelope(envelope: ActionEnvelope) -> Result<Self> {
        let meta = || envelope.meta.clone().unwrap_or_default();

        let action = match envelope.kind.as_str() {
            ADD_NOTE => NoteAction::Add {
                note: serde_json::from_value(envelope.payload.clone())?,
                meta: meta(),
            },
            UPDATE_NOTE => NoteAction::Update {
                patch: serde_json::from_value(envelope.payload.clone())?,
                meta: meta(),
            },
            DELETE_NOTE => {
                let id = envelope
                    .payload
                    .get("id")
                    .cloned()
                    .ok_or_else(|| NotesError::InvalidEnvelope("DELETE_NOTE without id".into()))?;
                NoteAction::Delete {
                    id: serde_json::from_value(id)?,
                    meta: meta(),
                }
            }
            DRAG_NOTE => {
                let drag: DragPayload = serde_json::from_value(envelope.payload.clone())?;
                NoteAction::Drag {
                    source_id: drag.source_id,
                    lane_id: drag.lane_id,
                    index: drag.index,
                }
            }
            CLEAR_NOTES => NoteAction::Clear,
            ADD_NOTE_SUCCESS => NoteAction::AddSuccess,
            UPDATE_NOTE_SUCCESS => NoteAction::UpdateSuccess,
            DELETE_NOTE_SUCCESS => NoteAction::DeleteSuccess,
            ADD_NOTE_ERROR => NoteAction::AddError {
                error: envelope.error.clone(),
            },
            UPDATE_NOTE_ERROR => NoteAction::UpdateError {
                error: envelope.error.clone(),
            },
            DELETE_NOTE_ERROR => NoteAction::DeleteError {
                error: envelope.error.clone(),
            },
            other => NoteAction::Unrecognized(other.to_string()),
        };

        Ok(action)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DragPayload {
    source_id: NoteId,
    lane_id: LaneId,
    index: f64,
}

/// Serialized form of an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ActionMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
