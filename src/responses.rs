use std::collections::HashMap;

use rand::seq::SliceRandom;

/// Canned response lines, several variants per key, chosen at random so
/// repeated prompts do not sound robotic. Passed explicitly into the
/// intent layer and session driver rather than living in a global table.
#[derive(Debug, Clone, Default)]
pub struct ResponseCatalog {
    entries: HashMap<String, Vec<String>>,
}

/// Catalog key for the generic could-not-process fallback.
pub const UNKNOWN: &str = "unknown";

impl ResponseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock catalog used when the embedding application supplies none.
    pub fn stock() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            UNKNOWN,
            &[
                "I'm not sure I understand.",
                "Sorry, I don't think I get that.",
                "That doesn't make sense to me, sorry.",
            ],
        );
        catalog.insert(
            "introduce",
            &[
                "Hello, nice to hear from you.",
                "Hi there, I hope you're having a good day.",
            ],
        );
        catalog.insert(
            "instructions",
            &["Try saying 'help' if you're unsure what to do."],
        );
        catalog.insert(
            "help",
            &["You can say \"help\" to hear this menu, and \"quit\" to leave."],
        );
        catalog
    }

    pub fn insert(&mut self, key: impl Into<String>, variants: &[&str]) -> &mut Self {
        self.entries
            .insert(key.into(), variants.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Picks one variant for `key` at random; `None` for an absent key.
    pub fn choose(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)?
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }
}
