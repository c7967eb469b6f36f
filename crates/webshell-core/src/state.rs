//! Shell Session State Machine
//!
//! ```text
//! Created
//!   ↓ initial navigation
//! Loading ⇄ Loaded
//!   ↓ teardown (from any state)
//! Disposed
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Surface constructed, no navigation issued yet
    Created,
    /// A navigation is in flight; the loading indicator is visible
    Loading,
    /// The last navigation finished (or failed)
    Loaded,
    /// Surface released; terminal
    Disposed,
}

impl SessionState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        match (self, target) {
            // Nothing leaves Disposed
            (SessionState::Disposed, SessionState::Disposed) => true,
            (SessionState::Disposed, _) => false,
            // Teardown is allowed from anywhere
            (_, SessionState::Disposed) => true,
            (SessionState::Created, SessionState::Loading) => true,
            (SessionState::Loading, SessionState::Loaded) => true,
            (SessionState::Loaded, SessionState::Loading) => true,
            // A new page-start can supersede an in-flight one
            (SessionState::Loading, SessionState::Loading) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self, SessionState::Disposed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Created => "created",
            SessionState::Loading => "loading",
            SessionState::Loaded => "loaded",
            SessionState::Disposed => "disposed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(SessionState::Created),
            "loading" => Ok(SessionState::Loading),
            "loaded" => Ok(SessionState::Loaded),
            "disposed" => Ok(SessionState::Disposed),
            _ => Err(format!("Unknown session state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(SessionState::Created.can_transition_to(SessionState::Loading));
        assert!(SessionState::Loading.can_transition_to(SessionState::Loaded));
        assert!(SessionState::Loaded.can_transition_to(SessionState::Loading));
        assert!(SessionState::Loading.can_transition_to(SessionState::Loading));
        // Teardown from any state
        assert!(SessionState::Created.can_transition_to(SessionState::Disposed));
        assert!(SessionState::Loading.can_transition_to(SessionState::Disposed));
        assert!(SessionState::Loaded.can_transition_to(SessionState::Disposed));
    }

    #[test]
    fn test_invalid_transitions() {
        // Can't finish a load that never started
        assert!(!SessionState::Created.can_transition_to(SessionState::Loaded));
        // Nothing leaves Disposed
        assert!(!SessionState::Disposed.can_transition_to(SessionState::Loading));
        assert!(!SessionState::Disposed.can_transition_to(SessionState::Loaded));
        assert!(!SessionState::Disposed.can_transition_to(SessionState::Created));
        // No way back to Created
        assert!(!SessionState::Loaded.can_transition_to(SessionState::Created));
    }

    #[test]
    fn test_parse_and_display() {
        for state in [
            SessionState::Created,
            SessionState::Loading,
            SessionState::Loaded,
            SessionState::Disposed,
        ] {
            assert_eq!(state.to_string().parse::<SessionState>().unwrap(), state);
        }
        assert!("frozen".parse::<SessionState>().is_err());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&SessionState::Loading).unwrap();
        assert_eq!(json, "\"loading\"");
    }
}
