use dialog_engine_types::action::{
    ACTION_PLAY_SOUND, ACTION_RESET_APP, ACTION_SET_VARIABLE, ACTION_SET_ZONE, PLAY_SOUND_AUDIO,
    PLAY_SOUND_TEXT,
};
use dialog_engine_types::value::{VALUE_BOOL, VALUE_FLOAT, VALUE_INT, VALUE_STRING};
use dialog_engine_types::{Action, ActionBundle, RuntimeState, ScalarValue};

use crate::cursor::Cursor;
use crate::error::ExecError;

/// Decodes a compiled action bundle: a u16 action count followed by tagged
/// action payloads. Inverse of [`ActionBundle::encode`].
pub fn decode_bundle(bytes: &[u8]) -> Result<ActionBundle, ExecError> {
    let mut cursor = Cursor::new(bytes);
    let count = cursor.read_u16()? as usize;
    let mut actions = Vec::with_capacity(count);
    for _ in 0..count {
        let tag = cursor.read_u8()?;
        let action = match tag {
            ACTION_PLAY_SOUND => match cursor.read_u8()? {
                PLAY_SOUND_TEXT => Action::PlayText(cursor.read_string()?),
                PLAY_SOUND_AUDIO => Action::PlayAudio(cursor.read_string()?),
                other => return Err(ExecError::UnknownSoundType(other)),
            },
            ACTION_SET_ZONE => Action::SetZone(cursor.read_string()?),
            ACTION_SET_VARIABLE => {
                let name = cursor.read_string()?;
                let value = match cursor.read_u8()? {
                    VALUE_INT => ScalarValue::Int(cursor.read_i64()?),
                    VALUE_FLOAT => ScalarValue::Float(cursor.read_f64()?),
                    VALUE_STRING => ScalarValue::Str(cursor.read_string()?),
                    VALUE_BOOL => ScalarValue::Bool(cursor.read_u8()? != 0),
                    other => return Err(ExecError::UnknownValueTag(other)),
                };
                Action::SetVariable(name, value)
            }
            ACTION_RESET_APP => Action::ResetApp,
            other => return Err(ExecError::UnknownAction(other)),
        };
        actions.push(action);
    }
    Ok(ActionBundle::new(actions))
}

/// Applies a compiled bundle to the runtime state, strictly in authored
/// order. Deterministic for a given bundle and starting state.
pub fn apply(runtime: &mut RuntimeState, bytes: &[u8]) -> Result<(), ExecError> {
    let bundle = decode_bundle(bytes)?;
    for action in &bundle.actions {
        apply_action(runtime, action);
    }
    Ok(())
}

fn apply_action(runtime: &mut RuntimeState, action: &Action) {
    match action {
        Action::PlayText(text) => {
            runtime.output.text(text.clone());
        }
        Action::PlayAudio(url) => {
            runtime.output.audio(url.clone());
        }
        Action::SetZone(zone) => {
            let first_entry = runtime.state.enter_zone(zone);
            tracing::debug!(zone = %zone, first_entry, "zone transition");
        }
        Action::SetVariable(name, value) => {
            runtime
                .state
                .variables
                .insert(name.clone(), value.to_json());
        }
        Action::ResetApp => {
            runtime.state.reset();
        }
    }
}
