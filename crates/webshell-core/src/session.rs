//! Shell session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::state::SessionState;
use crate::Result;

/// One running instance of the embedded browser surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSession {
    /// Unique identifier
    pub id: String,
    /// The configured page, trimmed
    pub target_url: String,
    /// URL of the most recent page-start
    pub current_url: Option<String>,
    /// Current state in the state machine
    pub state: SessionState,
    /// Loading generation; bumped by the initial navigation and each page-start
    pub generation: u64,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl ShellSession {
    pub fn new(target_url: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            target_url,
            current_url: None,
            state: SessionState::Created,
            generation: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attempt to transition to a new state
    pub fn transition_to(&mut self, new_state: SessionState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(CoreError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            session_id = %self.id,
            from = %self.state,
            to = %new_state,
            "Session state transition"
        );

        self.state = new_state;
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Enter `Loading` for a navigation to `url`; returns its generation
    pub fn begin_navigation(&mut self, url: &str) -> Result<u64> {
        self.transition_to(SessionState::Loading)?;
        self.generation += 1;
        self.current_url = Some(url.to_string());
        Ok(self.generation)
    }

    /// Leave `Loading`. Returns false if no navigation was in flight.
    pub fn finish_navigation(&mut self) -> Result<bool> {
        if !self.state.is_loading() {
            return Ok(false);
        }
        self.transition_to(SessionState::Loaded)?;
        Ok(true)
    }

    pub fn dispose(&mut self) -> Result<()> {
        self.transition_to(SessionState::Disposed)
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }
}
