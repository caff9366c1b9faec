//! Persisting optimistic mutations to the server.

use crate::error::{NotesError, Result};
use crate::http::JsonClient;
use crate::state::actions::NoteAction;
use tracing::debug;

/// Route the note mutations are posted to.
pub const DEFAULT_NOTES_ROUTE: &str = "/api/notes";

/// Sends a mutation to the server. `Ok` once the server accepted it.
pub trait Persist {
    fn persist(&self, action: &NoteAction) -> Result<()>;
}

/// Posts action envelopes to a JSON endpoint.
#[derive(Clone, Debug)]
pub struct HttpPersister {
    client: JsonClient,
    route: String,
}

impl HttpPersister {
    /// Create a persister posting to `DEFAULT_NOTES_ROUTE`.
    pub fn new(client: JsonClient) -> Self {
        Self {
            client,
            route: DEFAULT_NOTES_ROUTE.to_string(),
        }
    }

    /// Post to another route.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Route mutations are posted to.
    pub fn route(&self) -> &str {
        &self.route
    }
}

impl Persist for HttpPersister {
    fn persist(&self, action: &NoteAction) -> Result<()> {
        let envelope = action.to_envelope()?;
        let response = self.client.post_json(&self.route, &envelope)?;

        let status = response.status();
        debug!(action = %envelope.kind, status = status.as_u16(), "Persisted");
        if !status.is_success() {
            return Err(NotesError::Http(format!(
                "{} returned {}",
                self.client.url(&self.route),
                status
            )));
        }
        Ok(())
    }
}
