use dialog_engine_types::RuntimeState;

use crate::decode::split_dialog_end;
use crate::engine;
use crate::error::SessionError;
use crate::executor;
use crate::responses::{ResponseCatalog, UNKNOWN};
use crate::store::DialogStore;

/// Result-channel capacity for the engine task. The driver drains one
/// result before the engine can produce the next, so anything >= 1 works;
/// a little headroom avoids needless suspensions around the always-exec.
const RESULT_CAPACITY: usize = 8;

/// Drives one compiled dialog to completion: the caller half of the
/// engine's producer/consumer handshake.
///
/// Fetches the dialog, consumes the terminal flag, then loops receiving
/// resolved bundle references, fetching and applying each bundle, and
/// feeding the mutated state back to the engine before it evaluates the
/// next statement. Any failure aborts the step; bundles applied before
/// the failure stay applied (at-most-once, no compensation).
pub async fn run_dialog<S: DialogStore>(
    store: &S,
    runtime: &mut RuntimeState,
    dialog_key: &str,
) -> Result<(), SessionError> {
    let blob = store.fetch_dialog(dialog_key).await?;
    let (dialog_end, body) = split_dialog_end(&blob)?;
    if dialog_end {
        runtime.state.current_dialog = None;
    } else {
        runtime.state.current_dialog = Some(dialog_key.to_string());
    }

    let mut session = engine::spawn(body.to_vec(), runtime.state.clone(), RESULT_CAPACITY);
    while let Some(result) = session.results.recv().await {
        let resolved = result?;
        tracing::debug!(index = resolved.index, key = %resolved.bundle_key, "applying bundle");
        let bundle = store.fetch_bundle(&resolved.bundle_key).await?;
        executor::apply(runtime, &bundle)?;
        // The engine is suspended awaiting exactly this snapshot; a send
        // error just means it has already been torn down.
        let _ = session.state_tx.send(runtime.state.clone()).await;
    }
    let _ = session.handle.await;
    Ok(())
}

/// [`run_dialog`], wrapped with the user-visible failure behavior: on any
/// core error the response falls back to the generic unknown line instead
/// of staying silent, and the error is logged rather than surfaced.
pub async fn run_dialog_or_fallback<S: DialogStore>(
    store: &S,
    catalog: &ResponseCatalog,
    runtime: &mut RuntimeState,
    dialog_key: &str,
) {
    if let Err(e) = run_dialog(store, runtime, dialog_key).await {
        tracing::error!(dialog = dialog_key, error = %e, "dialog evaluation failed");
        if let Some(line) = catalog.choose(UNKNOWN) {
            runtime.output.text(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::CompiledDialogBuilder;
    use crate::error::LookupError;
    use crate::predicate::{Condition, StatementBuilder, OP_EQ, OP_GE};
    use crate::store::{InMemoryStore, MockDialogStore};
    use dialog_engine_types::{Action, ActionBundle, ScalarValue};

    fn text_bundle(line: &str) -> Vec<u8> {
        ActionBundle::new(vec![Action::PlayText(line.to_string())]).encode()
    }

    #[tokio::test]
    async fn threads_state_between_statements() {
        // The always bundle sets visited=1; the lone statement only fires
        // against that freshly written state.
        let dialog = CompiledDialogBuilder::new()
            .always_key("bundle:greet")
            .statement(
                StatementBuilder::new()
                    .when(Condition::new(OP_EQ, "visited", 1i64), "bundle:again")
                    .encode(),
            )
            .encode();

        let mut store = InMemoryStore::new();
        store.insert_dialog("dialog:door", dialog);
        store.insert_bundle(
            "bundle:greet",
            ActionBundle::new(vec![
                Action::PlayText("The door creaks.".to_string()),
                Action::SetVariable("visited".to_string(), ScalarValue::Int(1)),
            ])
            .encode(),
        );
        store.insert_bundle("bundle:again", text_bundle(" You've been here before."));

        let mut runtime = RuntimeState::default();
        run_dialog(&store, &mut runtime, "dialog:door").await.unwrap();

        assert_eq!(
            runtime.output.render(),
            "<speak>The door creaks. You've been here before.</speak>"
        );
        assert_eq!(
            runtime.state.current_dialog.as_deref(),
            Some("dialog:door")
        );
    }

    #[tokio::test]
    async fn terminal_dialog_clears_the_pointer() {
        let dialog = CompiledDialogBuilder::new()
            .dialog_end(true)
            .always_key("bundle:bye")
            .encode();

        let mut store = InMemoryStore::new();
        store.insert_dialog("dialog:end", dialog);
        store.insert_bundle("bundle:bye", text_bundle("Farewell."));

        let mut runtime = RuntimeState::default();
        runtime.state.current_dialog = Some("dialog:end".to_string());
        run_dialog(&store, &mut runtime, "dialog:end").await.unwrap();

        assert!(runtime.state.current_dialog.is_none());
        assert_eq!(runtime.output.render(), "<speak>Farewell.</speak>");
    }

    #[tokio::test]
    async fn statements_fire_in_source_order() {
        let dialog = CompiledDialogBuilder::new()
            .statement(
                StatementBuilder::new()
                    .when(Condition::new(OP_GE, "step", 0i64), "bundle:a")
                    .encode(),
            )
            .statement(
                StatementBuilder::new()
                    .when(Condition::new(OP_EQ, "step", 99i64), "bundle:never")
                    .encode(),
            )
            .statement(
                StatementBuilder::new()
                    .when(Condition::new(OP_GE, "step", 0i64), "bundle:b")
                    .encode(),
            )
            .encode();

        let mut store = InMemoryStore::new();
        store.insert_dialog("dialog:seq", dialog);
        store.insert_bundle("bundle:a", text_bundle("first"));
        store.insert_bundle("bundle:b", text_bundle(" second"));

        let mut runtime = RuntimeState::default();
        runtime
            .state
            .variables
            .insert("step".to_string(), serde_json::json!(0));
        run_dialog(&store, &mut runtime, "dialog:seq").await.unwrap();
        assert_eq!(runtime.output.render(), "<speak>first second</speak>");
    }

    #[tokio::test]
    async fn bundle_lookup_failure_halts_but_keeps_prior_output() {
        let dialog = CompiledDialogBuilder::new()
            .always_key("bundle:greet")
            .statement(
                StatementBuilder::new()
                    .when(Condition::new(OP_GE, "step", 0i64), "bundle:missing")
                    .encode(),
            )
            .encode();

        let mut store = InMemoryStore::new();
        store.insert_dialog("dialog:broken", dialog);
        store.insert_bundle("bundle:greet", text_bundle("Hello."));

        let mut runtime = RuntimeState::default();
        runtime
            .state
            .variables
            .insert("step".to_string(), serde_json::json!(0));
        let err = run_dialog(&store, &mut runtime, "dialog:broken")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SessionError::Lookup(LookupError::NotFound("bundle:missing".to_string()))
        );
        // The already-applied greeting is not rolled back.
        assert_eq!(runtime.output.render(), "<speak>Hello.</speak>");
    }

    #[tokio::test]
    async fn fallback_appends_the_unknown_line() {
        let mut store = MockDialogStore::new();
        store
            .expect_fetch_dialog()
            .returning(|key| Err(LookupError::Unavailable(key.to_string())));

        let catalog = ResponseCatalog::stock();
        let mut runtime = RuntimeState::default();
        run_dialog_or_fallback(&store, &catalog, &mut runtime, "dialog:any").await;
        assert!(!runtime.output.is_empty());
    }

    #[tokio::test]
    async fn empty_dialog_produces_no_output() {
        let mut store = InMemoryStore::new();
        store.insert_dialog("dialog:empty", CompiledDialogBuilder::new().encode());

        let mut runtime = RuntimeState::default();
        run_dialog(&store, &mut runtime, "dialog:empty").await.unwrap();
        assert!(runtime.output.is_empty());
    }
}
