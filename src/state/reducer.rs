//! The notes reducer.

use crate::state::actions::{NoteAction, DEFAULT_ERROR};
use crate::types::{Note, NoteId, NotePatch, NotesState};

/// Apply an action to a state, producing the next state.
///
/// The input is never modified. Mutations naming an id that is not in
/// `data` leave `data` as it was.
pub fn reduce(state: &NotesState, action: &NoteAction) -> NotesState {
    match action {
        NoteAction::Add { note, meta } => NotesState {
            synced: meta.synced,
            error: state.error.clone(),
            data: upsert(&state.data, note),
        },

        NoteAction::Update { patch, meta } => NotesState {
            synced: meta.synced,
            error: state.error.clone(),
            data: patch_one(&state.data, patch),
        },

        NoteAction::Delete { id, meta } => NotesState {
            synced: meta.synced,
            error: state.error.clone(),
            data: remove(&state.data, id),
        },

        NoteAction::Clear => NotesState::default(),

        NoteAction::Drag {
            source_id,
            lane_id,
            index,
        } => {
            let patch = NotePatch::new(source_id.clone())
                .with_lane(lane_id.clone())
                .with_index(*index);
            NotesState {
                synced: state.synced,
                error: state.error.clone(),
                data: patch_one(&state.data, &patch),
            }
        }

        NoteAction::AddSuccess | NoteAction::UpdateSuccess | NoteAction::DeleteSuccess => {
            NotesState {
                synced: true,
                error: None,
                data: state.data.clone(),
            }
        }

        NoteAction::AddError { error }
        | NoteAction::UpdateError { error }
        | NoteAction::DeleteError { error } => NotesState {
            synced: true,
            error: Some(error.clone().unwrap_or_else(|| DEFAULT_ERROR.to_string())),
            data: state.data.clone(),
        },

        NoteAction::Unrecognized(_) => state.clone(),
    }
}

/// Insert a note, replacing an existing note with the same id in place.
fn upsert(data: &[Note], note: &Note) -> Vec<Note> {
    let mut next = Vec::with_capacity(data.len() + 1);
    let mut replaced = false;
    for existing in data {
        if existing.id == note.id {
            next.push(note.clone());
            replaced = true;
        } else {
            next.push(existing.clone());
        }
    }
    if !replaced {
        next.push(note.clone());
    }
    next
}

fn patch_one(data: &[Note], patch: &NotePatch) -> Vec<Note> {
    data.iter()
        .map(|note| {
            if note.id == patch.id {
                note.merged(patch)
            } else {
                note.clone()
            }
        })
        .collect()
}

fn remove(data: &[Note], id: &NoteId) -> Vec<Note> {
    data.iter().filter(|note| &note.id != id).cloned().collect()
}
