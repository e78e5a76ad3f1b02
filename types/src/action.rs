use crate::value::{encode_str_into, ScalarValue};

/// Wire tags for action variants in a compiled bundle.
pub const ACTION_PLAY_SOUND: u8 = 0;
pub const ACTION_SET_ZONE: u8 = 1;
pub const ACTION_SET_VARIABLE: u8 = 2;
pub const ACTION_RESET_APP: u8 = 3;

/// Sub-tags distinguishing the two PlaySound payload kinds.
pub const PLAY_SOUND_TEXT: u8 = 0;
pub const PLAY_SOUND_AUDIO: u8 = 1;

/// One authored effect inside an action bundle.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Action {
    /// Speak literal text.
    PlayText(String),
    /// Play a pre-recorded clip by URL.
    PlayAudio(String),
    /// Move the session into a zone.
    SetZone(String),
    /// Write a named session variable.
    SetVariable(String, ScalarValue),
    /// Reset all app progress, as if starting fresh.
    ResetApp,
}

/// An ordered sequence of actions, referenced from compiled dialogs by a
/// string key. Bundles are read-only once compiled; the executor applies
/// them without ever mutating the bundle itself.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionBundle {
    pub actions: Vec<Action>,
}

impl ActionBundle {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Serializes the bundle into its compiled wire form: a u16 action
    /// count followed by each action's tag byte and payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let count = u16::try_from(self.actions.len()).expect("bundle exceeds u16 action count");
        out.extend_from_slice(&count.to_le_bytes());
        for action in &self.actions {
            match action {
                Action::PlayText(text) => {
                    out.push(ACTION_PLAY_SOUND);
                    out.push(PLAY_SOUND_TEXT);
                    encode_str_into(text, &mut out);
                }
                Action::PlayAudio(url) => {
                    out.push(ACTION_PLAY_SOUND);
                    out.push(PLAY_SOUND_AUDIO);
                    encode_str_into(url, &mut out);
                }
                Action::SetZone(zone) => {
                    out.push(ACTION_SET_ZONE);
                    encode_str_into(zone, &mut out);
                }
                Action::SetVariable(name, value) => {
                    out.push(ACTION_SET_VARIABLE);
                    encode_str_into(name, &mut out);
                    value.encode_into(&mut out);
                }
                Action::ResetApp => {
                    out.push(ACTION_RESET_APP);
                }
            }
        }
        out
    }
}
