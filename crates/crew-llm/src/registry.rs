//! Construction-time binding of provider identifiers to clients

use crate::{LLMError, LLMProvider, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry mapping provider identifiers (e.g. "gemini", "groq") to clients
///
/// Built once at startup; agents resolve their provider by identifier so that
/// provider selection stays a configuration concern.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LLMProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under an identifier, replacing any previous one
    pub fn register(&mut self, id: impl Into<String>, provider: Arc<dyn LLMProvider>) {
        self.providers.insert(id.into(), provider);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, id: impl Into<String>, provider: Arc<dyn LLMProvider>) -> Self {
        self.register(id, provider);
        self
    }

    /// Get a provider by identifier
    pub fn get(&self, id: &str) -> Option<Arc<dyn LLMProvider>> {
        self.providers.get(id).cloned()
    }

    /// Get a provider by identifier, failing with a configuration error
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn LLMProvider>> {
        self.get(id).ok_or_else(|| {
            LLMError::ConfigurationError(format!(
                "Unknown provider '{id}'. Registered providers: {:?}",
                self.ids()
            ))
        })
    }

    /// Registered identifiers, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}
