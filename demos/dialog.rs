//! Runs a small two-node dialog end to end against an in-memory store.
//!
//! ```sh
//! cargo run --example dialog
//! ```

use anyhow::Result;

use dialog_engine::decode::CompiledDialogBuilder;
use dialog_engine::predicate::{Condition, StatementBuilder, OP_EQ, OP_GE};
use dialog_engine::types::{Action, ActionBundle, RuntimeState, ScalarValue};
use dialog_engine::{run_dialog, InMemoryStore};

fn store() -> InMemoryStore {
    let mut store = InMemoryStore::new();

    // Root node: always greet, then branch on how often we've met.
    store.insert_dialog(
        "dialog:door",
        CompiledDialogBuilder::new()
            .always_key("bundle:greet")
            .statement(
                StatementBuilder::new()
                    .when(Condition::new(OP_EQ, "visits", 1i64), "bundle:first-visit")
                    .otherwise("bundle:repeat-visit")
                    .encode(),
            )
            .statement(
                StatementBuilder::new()
                    .when(Condition::new(OP_GE, "visits", 3i64), "bundle:regular")
                    .encode(),
            )
            .encode(),
    );

    store.insert_bundle(
        "bundle:greet",
        ActionBundle::new(vec![
            Action::PlayText("The tavern door swings open. ".to_string()),
            Action::SetVariable("visits".to_string(), ScalarValue::Int(1)),
        ])
        .encode(),
    );
    store.insert_bundle(
        "bundle:first-visit",
        ActionBundle::new(vec![Action::PlayText(
            "\"A new face! Welcome.\"".to_string(),
        )])
        .encode(),
    );
    store.insert_bundle(
        "bundle:repeat-visit",
        ActionBundle::new(vec![Action::PlayText("\"Back again?\"".to_string())]).encode(),
    );
    store.insert_bundle(
        "bundle:regular",
        ActionBundle::new(vec![Action::PlayAudio(
            "https://example.com/cheer.wav".to_string(),
        )])
        .encode(),
    );

    store
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dialog_engine=debug".into()),
        )
        .init();

    let store = store();
    let mut runtime = RuntimeState::default();
    run_dialog(&store, &mut runtime, "dialog:door").await?;

    println!("{}", runtime.output.render());
    println!("state: {}", serde_json::to_string_pretty(&runtime.state)?);
    Ok(())
}
