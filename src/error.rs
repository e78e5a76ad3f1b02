/// Failures while reading a compiled binary's framing.
///
/// Binary corruption will not resolve itself, so none of these are ever
/// retried; the evaluation step aborts and the stream closes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty buffer where a header is required")]
    Empty,
    #[error("declared length needs {needed} bytes but only {remaining} remain at offset {offset}")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("embedded string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
}

/// Failures while evaluating a predicate block against session state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("unrecognized predicate operator 0x{0:02x}")]
    UnknownOperator(u8),
    #[error("unrecognized operand value tag 0x{0:02x}")]
    UnknownValueTag(u8),
    #[error("ordering comparison against non-numeric variable {variable:?}")]
    Incomparable { variable: String },
}

/// Failures while applying an action bundle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Silently dropping an authored action would corrupt the authored
    /// experience, so an unrecognized tag is fatal rather than skipped.
    #[error("unknown action tag 0x{0:02x}")]
    UnknownAction(u8),
    #[error("unknown play-sound subtype 0x{0:02x}")]
    UnknownSoundType(u8),
    #[error("unrecognized variable value tag 0x{0:02x}")]
    UnknownValueTag(u8),
}

/// Failures from the external dialog/bundle store.
///
/// Fatal to the current evaluation step; the transport layer may retry the
/// whole step, the core never does.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("key not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Umbrella error for one dialog-evaluation request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
