pub mod action;
pub mod speech;
pub mod state;
pub mod value;

pub use action::{Action, ActionBundle};
pub use speech::{SpeechBuilder, SpeechFragment};
pub use state::{RuntimeState, SessionState};
pub use value::ScalarValue;
