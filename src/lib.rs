//! Evaluation core for compiled branching dialogs.
//!
//! A compiled dialog is a binary program attached to one node of a
//! conversation graph. When a user reaches that node the [`engine`]
//! evaluates the program against the current session state and streams
//! out references to the action bundles that should fire, in authored
//! order. Applying a bundle can mutate the very state that later
//! predicates read, so the engine and the driving caller cooperate in a
//! strict producer/consumer handshake: one resolved reference out, one
//! post-application state snapshot back.
//!
//! The crate performs no network or storage I/O itself; everything
//! external arrives through the [`store::DialogStore`] seam.

pub mod cursor;
pub mod decode;
pub mod engine;
pub mod error;
pub mod executor;
pub mod intent;
pub mod predicate;
pub mod responses;
pub mod session;
pub mod store;

pub use dialog_engine_types as types;

pub use engine::{EvalSession, Resolved};
pub use error::{DecodeError, EvalError, ExecError, LookupError, SessionError};
pub use responses::ResponseCatalog;
pub use session::{run_dialog, run_dialog_or_fallback};
pub use store::{DialogStore, InMemoryStore};
