//! Core types for the note store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a note.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

/// Identifier of the lane (column) that owns a note.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(pub String);

/// Identifier of a note's owner.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }
    };
}

string_id!(NoteId);
string_id!(LaneId);
string_id!(UserId);

/// A single card on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub lane_id: LaneId,
    pub user_id: UserId,
    /// Fractional ordering key, only meaningful within `lane_id`.
    pub index: f64,
}

impl Note {
    /// Merge the present fields of a patch into this note.
    ///
    /// The id is never changed.
    pub fn merged(&self, patch: &NotePatch) -> Note {
        Note {
            id: self.id.clone(),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            lane_id: patch.lane_id.clone().unwrap_or_else(|| self.lane_id.clone()),
            user_id: patch.user_id.clone().unwrap_or_else(|| self.user_id.clone()),
            index: patch.index.unwrap_or(self.index),
        }
    }
}

/// Partial note keyed by id, used for updates and as validation input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    pub id: NoteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_id: Option<LaneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<f64>,
}

impl NotePatch {
    /// An empty patch for the given note.
    pub fn new(id: impl Into<NoteId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            lane_id: None,
            user_id: None,
            index: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_lane(mut self, lane_id: impl Into<LaneId>) -> Self {
        self.lane_id = Some(lane_id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_index(mut self, index: f64) -> Self {
        self.index = Some(index);
        self
    }
}

impl From<Note> for NotePatch {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: Some(note.title),
            lane_id: Some(note.lane_id),
            user_id: Some(note.user_id),
            index: Some(note.index),
        }
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        NoteId(value)
    }
}

impl From<String> for LaneId {
    fn from(value: String) -> Self {
        LaneId(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        UserId(value)
    }
}

/// State of the notes slice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesState {
    /// False while an optimistic mutation awaits server confirmation.
    pub synced: bool,
    /// Last error reported by the persistence layer.
    pub error: Option<String>,
    /// Notes in no particular order; render order comes from `lane`.
    pub data: Vec<Note>,
}

impl NotesState {
    /// Find a note by id.
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.data.iter().find(|note| &note.id == id)
    }

    /// Notes of one lane in render order.
    ///
    /// Equal indices keep their relative order in `data`.
    pub fn lane(&self, lane_id: &LaneId) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self
            .data
            .iter()
            .filter(|note| &note.lane_id == lane_id)
            .collect();
        notes.sort_by(|a, b| a.index.total_cmp(&b.index));
        notes
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, lane: &str, index: f64) -> Note {
        Note {
            id: id.into(),
            title: format!("note {}", id),
            lane_id: lane.into(),
            user_id: "user-1".into(),
            index,
        }
    }

    #[test]
    fn test_note_uses_camel_case_keys() {
        let value = serde_json::to_value(note("abc", "lane-1", 2.5)).unwrap();
        assert_eq!(value["laneId"], "lane-1");
        assert_eq!(value["userId"], "user-1");
        assert_eq!(value["index"], 2.5);
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = NotePatch::new("abc").with_title("renamed");
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"id": "abc", "title": "renamed"}));
    }

    #[test]
    fn test_merge_keeps_id_and_untouched_fields() {
        let original = note("abc", "lane-1", 1.0);
        let merged = original.merged(&NotePatch::new("other").with_index(4.0));
        assert_eq!(merged.id, NoteId::from("abc"));
        assert_eq!(merged.index, 4.0);
        assert_eq!(merged.title, original.title);
        assert_eq!(merged.lane_id, original.lane_id);
    }

    #[test]
    fn test_lane_sorted_by_index() {
        let state = NotesState {
            data: vec![
                note("c", "lane-1", 3.0),
                note("x", "lane-2", 0.0),
                note("a", "lane-1", 1.0),
                note("b", "lane-1", 2.0),
            ],
            ..Default::default()
        };

        let ids: Vec<&str> = state
            .lane(&"lane-1".into())
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
