use std::collections::HashMap;

use dialog_engine_types::RuntimeState;

use crate::responses::{ResponseCatalog, UNKNOWN};

/// Raised by a handler that does not apply in the current context, e.g.
/// "confirm" with no pending restart prompt. The registry falls through
/// to the unknown response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("intent does not match the current context")]
pub struct NoMatch;

pub type IntentHandler = fn(&ResponseCatalog, &mut RuntimeState) -> Result<(), NoMatch>;

/// Maps already-classified intent names to handlers. Classification
/// itself happens in an external NLU service; by the time a name reaches
/// this registry it is just a string key.
pub struct IntentRegistry {
    handlers: HashMap<String, IntentHandler>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in conversation intents.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("welcome", welcome);
        registry.register("help", help);
        registry.register("app.help", app_help);
        registry.register("app.stop", app_stop);
        registry.register("app.restart", app_restart);
        registry.register("confirm", confirm);
        registry.register("cancel", cancel);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, handler: IntentHandler) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Runs the handler for `name`; an unregistered name or a handler
    /// reporting [`NoMatch`] both produce the unknown response.
    pub fn dispatch(&self, name: &str, catalog: &ResponseCatalog, runtime: &mut RuntimeState) {
        let outcome = match self.handlers.get(name) {
            Some(handler) => handler(catalog, runtime),
            None => Err(NoMatch),
        };
        if outcome.is_err() {
            tracing::debug!(intent = name, "no matching intent, falling back");
            unknown(catalog, runtime);
        }
    }
}

impl Default for IntentRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Appends the generic could-not-process line.
pub fn unknown(catalog: &ResponseCatalog, runtime: &mut RuntimeState) {
    if let Some(line) = catalog.choose(UNKNOWN) {
        runtime.output.text(line);
    }
    runtime.output.text(" Try saying 'help' if you're unsure what to do.");
}

fn welcome(catalog: &ResponseCatalog, runtime: &mut RuntimeState) -> Result<(), NoMatch> {
    if let Some(line) = catalog.choose("introduce") {
        runtime.output.text(line);
    }
    if let Some(line) = catalog.choose("instructions") {
        runtime.output.text(line);
    }
    Ok(())
}

fn help(catalog: &ResponseCatalog, runtime: &mut RuntimeState) -> Result<(), NoMatch> {
    if let Some(line) = catalog.choose("help") {
        runtime.output.text(line);
    }
    Ok(())
}

fn app_help(_catalog: &ResponseCatalog, runtime: &mut RuntimeState) -> Result<(), NoMatch> {
    runtime.output.text(
        "You can say \"stop app\" to leave the current app, \
         \"restart app\" to start from the beginning, \
         and \"help\" to hear this menu.",
    );
    Ok(())
}

fn app_stop(_catalog: &ResponseCatalog, runtime: &mut RuntimeState) -> Result<(), NoMatch> {
    runtime
        .output
        .text("Okay, stopping the app now. You're back to the main menu.");
    runtime.state = Default::default();
    Ok(())
}

fn app_restart(_catalog: &ResponseCatalog, runtime: &mut RuntimeState) -> Result<(), NoMatch> {
    if runtime.state.restart_requested {
        runtime.state.restart_requested = false;
        runtime.output.text("Okay, restarting now...");
        runtime.state.reset();
        return Ok(());
    }
    runtime.output.text(
        "All of your progress will be lost forever. \
         If you're sure, say \"I'm sure\". Otherwise, say \"cancel\".",
    );
    runtime.state.restart_requested = true;
    Ok(())
}

fn confirm(_catalog: &ResponseCatalog, runtime: &mut RuntimeState) -> Result<(), NoMatch> {
    if !runtime.state.restart_requested {
        return Err(NoMatch);
    }
    runtime.output.text("Okay, restarting now...");
    runtime.state.reset();
    Ok(())
}

fn cancel(_catalog: &ResponseCatalog, runtime: &mut RuntimeState) -> Result<(), NoMatch> {
    if !runtime.state.restart_requested {
        return Err(NoMatch);
    }
    runtime.state.restart_requested = false;
    runtime.output.text("Okay, you've cancelled restarting.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (IntentRegistry, ResponseCatalog, RuntimeState) {
        (
            IntentRegistry::with_defaults(),
            ResponseCatalog::stock(),
            RuntimeState::default(),
        )
    }

    #[test]
    fn unregistered_intent_falls_back_to_unknown() {
        let (registry, catalog, mut runtime) = setup();
        registry.dispatch("no.such.intent", &catalog, &mut runtime);
        assert!(runtime.output.render().contains("Try saying 'help'"));
    }

    #[test]
    fn restart_requires_confirmation() {
        let (registry, catalog, mut runtime) = setup();
        runtime.state.variables.insert(
            "gold".to_string(),
            serde_json::json!(10),
        );

        registry.dispatch("app.restart", &catalog, &mut runtime);
        assert!(runtime.state.restart_requested);
        assert!(!runtime.state.variables.is_empty());

        registry.dispatch("confirm", &catalog, &mut runtime);
        assert!(runtime.state.variables.is_empty());
    }

    #[test]
    fn confirm_outside_a_prompt_is_unknown() {
        let (registry, catalog, mut runtime) = setup();
        registry.dispatch("confirm", &catalog, &mut runtime);
        assert!(runtime.output.render().contains("Try saying 'help'"));
    }

    #[test]
    fn cancel_keeps_progress() {
        let (registry, catalog, mut runtime) = setup();
        runtime
            .state
            .variables
            .insert("gold".to_string(), serde_json::json!(10));
        registry.dispatch("app.restart", &catalog, &mut runtime);
        registry.dispatch("cancel", &catalog, &mut runtime);
        assert!(!runtime.state.restart_requested);
        assert!(!runtime.state.variables.is_empty());
    }
}
