use std::collections::HashMap;

use crate::error::LookupError;

/// External storage for compiled dialogs and action bundles, keyed by the
/// strings embedded in the binaries. Production callers back this with
/// their own store; the core never performs I/O beyond this seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DialogStore: Send + Sync {
    async fn fetch_dialog(&self, key: &str) -> Result<Vec<u8>, LookupError>;
    async fn fetch_bundle(&self, key: &str) -> Result<Vec<u8>, LookupError>;
}

/// HashMap-backed store for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    dialogs: HashMap<String, Vec<u8>>,
    bundles: HashMap<String, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_dialog(&mut self, key: impl Into<String>, blob: Vec<u8>) -> &mut Self {
        self.dialogs.insert(key.into(), blob);
        self
    }

    pub fn insert_bundle(&mut self, key: impl Into<String>, blob: Vec<u8>) -> &mut Self {
        self.bundles.insert(key.into(), blob);
        self
    }
}

#[async_trait::async_trait]
impl DialogStore for InMemoryStore {
    async fn fetch_dialog(&self, key: &str) -> Result<Vec<u8>, LookupError> {
        self.dialogs
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(key.to_string()))
    }

    async fn fetch_bundle(&self, key: &str) -> Result<Vec<u8>, LookupError> {
        self.bundles
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(key.to_string()))
    }
}
