//! Registry of provider adapter factories.

use dashmap::DashMap;
use std::sync::Arc;

use replykit_protocols::{LanguageId, ProviderFactory, ProviderId, ReplyProvider};

use crate::error::RegistryError;

/// Maps each provider ID to the factory that builds its adapter.
///
/// Adapters hold the API key, so they are built per request from the
/// settings read at that moment rather than stored here.
pub struct ProviderRegistry {
    factories: DashMap<ProviderId, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Register a factory.
    pub fn register(&self, factory: Arc<dyn ProviderFactory>) -> Result<(), RegistryError> {
        let id = factory.id();

        if self.factories.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }

        self.factories.insert(id, factory);
        Ok(())
    }

    /// Unregister a factory.
    pub fn unregister(&self, id: ProviderId) -> Result<(), RegistryError> {
        self.factories
            .remove(&id)
            .ok_or(RegistryError::NotFound(id))?;
        Ok(())
    }

    /// Get a factory by ID.
    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn ProviderFactory>> {
        self.factories.get(&id).map(|f| f.clone())
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.factories.contains_key(&id)
    }

    /// Registered IDs, in settings-page order.
    pub fn list_ids(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .iter()
            .copied()
            .filter(|id| self.factories.contains_key(id))
            .collect()
    }

    /// Build an adapter for `id` bound to `api_key`.
    pub fn create(&self, id: ProviderId, api_key: &str, language: LanguageId) -> Option<Arc<dyn ReplyProvider>> {
        self.get(id).map(|factory| factory.create(api_key, language))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
