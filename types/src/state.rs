use std::collections::HashMap;

use serde_json::Value;

use crate::speech::SpeechBuilder;

/// The serializable half of a conversation session.
///
/// This is what the caller packs into the signed session token between
/// requests. Predicates read from `variables`; action bundles may mutate
/// any field here.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionState {
    /// Key of the dialog node the conversation is currently inside, if any.
    /// Cleared when a terminal dialog node finishes.
    pub current_dialog: Option<String>,

    /// Identifier of the zone (location) the user is currently in.
    pub zone: String,

    /// Actor (NPC) membership per zone, keyed by zone id.
    pub zone_actors: HashMap<String, Vec<String>>,

    /// Whether a zone's entry actions have already run.
    pub zone_initialized: HashMap<String, bool>,

    /// Free-form named variables read by predicates and written by bundles.
    pub variables: HashMap<String, Value>,

    /// Set while the user is being asked to confirm an app restart.
    pub restart_requested: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reverts the session to a fresh app start. Actor membership is
    /// authored data, not progress, so it survives the reset.
    pub fn reset(&mut self) {
        self.current_dialog = None;
        self.zone = String::new();
        self.zone_initialized.clear();
        self.variables.clear();
        self.restart_requested = false;
    }

    /// Marks `zone` as current, reporting whether this is the first entry.
    pub fn enter_zone(&mut self, zone: &str) -> bool {
        self.zone = zone.to_string();
        let initialized = self.zone_initialized.entry(zone.to_string()).or_insert(false);
        let first_entry = !*initialized;
        *initialized = true;
        first_entry
    }

    /// Actors present in the current zone, in authored order.
    pub fn current_actors(&self) -> &[String] {
        self.zone_actors
            .get(&self.zone)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The full mutable state threaded through one request: session fields plus
/// the append-only speech output being built for the response.
///
/// Owned by the caller; the engine and executor only ever see it for the
/// span of a single step.
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    pub state: SessionState,
    pub output: SpeechBuilder,
}

impl RuntimeState {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            output: SpeechBuilder::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_state_round_trips_through_json() {
        let mut state = SessionState::new();
        state.current_dialog = Some("dialog:42".to_string());
        state.zone = "tavern".to_string();
        state
            .zone_actors
            .insert("tavern".to_string(), vec!["barkeep".to_string()]);
        state.variables.insert("gold".to_string(), json!(12));

        let token = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&token).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn enter_zone_reports_first_entry_once() {
        let mut state = SessionState::new();
        assert!(state.enter_zone("cellar"));
        assert!(!state.enter_zone("cellar"));
        assert_eq!(state.zone, "cellar");
    }

    #[test]
    fn reset_keeps_actor_membership() {
        let mut state = SessionState::new();
        state
            .zone_actors
            .insert("tavern".to_string(), vec!["barkeep".to_string()]);
        state.current_dialog = Some("dialog:1".to_string());
        state.variables.insert("gold".to_string(), json!(3));
        state.restart_requested = true;

        state.reset();

        assert!(state.current_dialog.is_none());
        assert!(state.variables.is_empty());
        assert!(!state.restart_requested);
        assert_eq!(state.zone_actors.len(), 1);
    }
}
