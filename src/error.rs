//! Error types for the note store and its sync plumbing.

use thiserror::Error;

/// Main error type for note operations.
///
/// The reducer itself never fails; these come from validation, the change
/// feed channel and the HTTP side band.
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid action envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Feed channel is closed")]
    ChannelClosed,

    #[error("Not subscribed to topic: {0}")]
    NotSubscribed(String),
}

impl NotesError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        NotesError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for NotesError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            NotesError::Deserialization(e.to_string())
        } else {
            NotesError::Serialization(e.to_string())
        }
    }
}

impl From<reqwest::Error> for NotesError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            NotesError::Deserialization(e.to_string())
        } else {
            NotesError::Http(e.to_string())
        }
    }
}

/// Result type for note operations.
pub type Result<T> = std::result::Result<T, NotesError>;
