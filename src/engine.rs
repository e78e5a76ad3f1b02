use tokio::sync::mpsc;

use dialog_engine_types::SessionState;

use crate::decode;
use crate::error::EvalError;
use crate::predicate;

/// A bundle reference resolved by the engine, tagged with its emission
/// index: 0 is the always-exec, statement *i* maps to *i* + 1.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Resolved {
    pub index: usize,
    pub bundle_key: String,
}

pub type ResultRx = mpsc::Receiver<Result<Resolved, EvalError>>;
pub type StateTx = mpsc::Sender<SessionState>;

/// Handle to one running evaluation: the result stream, the back-channel
/// for post-application state, and the engine task itself.
///
/// Dropping the handle abandons the evaluation; the engine task observes
/// the closed channels and exits without blocking. It never owns fetched
/// bundles or store handles, so nothing caller-side leaks with it.
pub struct EvalSession {
    pub results: ResultRx,
    pub state_tx: StateTx,
    pub handle: tokio::task::JoinHandle<()>,
}

/// Spawns the lazy evaluation engine over a compiled dialog body.
///
/// The engine emits bundle references in strict source order: the
/// always-exec first when present, then each matching conditional
/// statement. After every emission it suspends until the caller applies
/// the bundle and sends the mutated state back, so no statement is ever
/// evaluated against a snapshot staled by an earlier bundle. Statements
/// that do not match consume no snapshot. A decode or evaluation error
/// ends the stream with that error; references already emitted stand as
/// intended side effects.
pub fn spawn(body: Vec<u8>, initial: SessionState, capacity: usize) -> EvalSession {
    let (result_tx, result_rx) = mpsc::channel(capacity);
    // Capacity 1: the engine always consumes the previous snapshot before
    // requesting another, so at most one is ever pending.
    let (state_tx, mut state_rx) = mpsc::channel::<SessionState>(1);

    let handle = tokio::spawn(async move {
        let dialog = match decode::decode(&body) {
            Ok(dialog) => dialog,
            Err(e) => {
                tracing::error!(error = %e, "failed to decode compiled dialog");
                let _ = result_tx.send(Err(e.into())).await;
                return;
            }
        };
        tracing::debug!(
            statements = dialog.statements.len(),
            always = dialog.always_key.is_some(),
            "evaluation started"
        );

        let mut snapshot = initial;

        if let Some(key) = dialog.always_key {
            if result_tx
                .send(Ok(Resolved {
                    index: 0,
                    bundle_key: key,
                }))
                .await
                .is_err()
            {
                return;
            }
            match state_rx.recv().await {
                Some(state) => snapshot = state,
                // Caller abandoned the evaluation.
                None => return,
            }
        }

        for statement in dialog.statements {
            match predicate::evaluate(&snapshot, &statement.bytes) {
                Ok(Some(bundle_key)) => {
                    tracing::debug!(index = statement.index + 1, key = %bundle_key, "statement fired");
                    if result_tx
                        .send(Ok(Resolved {
                            index: statement.index + 1,
                            bundle_key,
                        }))
                        .await
                        .is_err()
                    {
                        return;
                    }
                    match state_rx.recv().await {
                        Some(state) => snapshot = state,
                        None => return,
                    }
                }
                Ok(None) => {
                    // Nothing fired, so the snapshot is still fresh.
                    tracing::trace!(index = statement.index + 1, "statement did not match");
                }
                Err(e) => {
                    tracing::error!(index = statement.index + 1, error = %e, "evaluation failed");
                    let _ = result_tx.send(Err(e)).await;
                    return;
                }
            }
        }
    });

    EvalSession {
        results: result_rx,
        state_tx,
        handle,
    }
}
