//! Validation for note inserts and updates.
//!
//! Validation happens before an action is created; the reducer trusts its
//! input. Both entry points return the normalized value (titles trimmed).

use crate::error::{NotesError, Result};
use crate::types::{Note, NotePatch};

/// Minimum length of an identifier, in characters.
pub const ID_MIN_LEN: usize = 3;

/// Maximum length of an identifier, in characters.
pub const ID_MAX_LEN: usize = 36;

/// Maximum length of a trimmed title, in characters.
pub const TITLE_MAX_LEN: usize = 30;

fn check_id(field: &'static str, value: &str) -> Result<()> {
    let len = value.chars().count();
    if len < ID_MIN_LEN {
        return Err(NotesError::validation(
            field,
            format!("must be at least {} characters long", ID_MIN_LEN),
        ));
    }
    if len > ID_MAX_LEN {
        return Err(NotesError::validation(
            field,
            format!("must be at most {} characters long", ID_MAX_LEN),
        ));
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(NotesError::validation("title", "is not allowed to be empty"));
    }
    if trimmed.chars().count() > TITLE_MAX_LEN {
        return Err(NotesError::validation(
            "title",
            format!("must be at most {} characters long", TITLE_MAX_LEN),
        ));
    }
    Ok(trimmed.to_string())
}

fn check_index(index: f64) -> Result<()> {
    if !index.is_finite() {
        return Err(NotesError::validation("index", "must be a finite number"));
    }
    Ok(())
}

/// Validate an update: only `id` is required, present fields are checked.
pub fn validate_update(patch: NotePatch) -> Result<NotePatch> {
    check_id("id", patch.id.as_str())?;

    let title = match patch.title {
        Some(ref title) => Some(normalize_title(title)?),
        None => None,
    };
    if let Some(ref lane_id) = patch.lane_id {
        check_id("laneId", lane_id.as_str())?;
    }
    if let Some(ref user_id) = patch.user_id {
        check_id("userId", user_id.as_str())?;
    }
    if let Some(index) = patch.index {
        check_index(index)?;
    }

    Ok(NotePatch { title, ..patch })
}

/// Validate an insert: every field is required.
pub fn validate_insert(draft: NotePatch) -> Result<Note> {
    let patch = validate_update(draft)?;

    let missing = |field: &'static str| NotesError::validation(field, "is required");
    Ok(Note {
        title: patch.title.ok_or_else(|| missing("title"))?,
        lane_id: patch.lane_id.ok_or_else(|| missing("laneId"))?,
        user_id: patch.user_id.ok_or_else(|| missing("userId"))?,
        index: patch.index.ok_or_else(|| missing("index"))?,
        id: patch.id,
    })
}

/// Validate an already-complete note, e.g. one received over the wire.
pub fn validate_note(note: Note) -> Result<Note> {
    validate_insert(NotePatch::from(note))
}
