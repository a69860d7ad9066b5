//! Factories registered with the background provider registry.

use std::sync::Arc;

use replykit_protocols::{GenerationParams, LanguageId, ProviderFactory, ProviderId, ReplyProvider};

use crate::provider::{GroqProvider, OpenAIProvider};

/// Builds [`OpenAIProvider`]s.
#[derive(Debug, Clone, Default)]
pub struct OpenAIFactory {
    api_url: Option<String>,
    params: GenerationParams,
}

impl OpenAIFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the endpoint URL.
    pub fn with_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

impl ProviderFactory for OpenAIFactory {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAI
    }

    fn create(&self, api_key: &str, language: LanguageId) -> Arc<dyn ReplyProvider> {
        let provider = match &self.api_url {
            Some(url) => OpenAIProvider::with_url(api_key.to_string(), language, url.clone()),
            None => OpenAIProvider::new(api_key.to_string(), language),
        };
        Arc::new(provider.with_params(self.params))
    }
}

/// Builds [`GroqProvider`]s.
#[derive(Debug, Clone, Default)]
pub struct GroqFactory {
    api_url: Option<String>,
    params: GenerationParams,
}

impl GroqFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

impl ProviderFactory for GroqFactory {
    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    fn create(&self, api_key: &str, language: LanguageId) -> Arc<dyn ReplyProvider> {
        let provider = match &self.api_url {
            Some(url) => GroqProvider::with_url(api_key.to_string(), language, url.clone()),
            None => GroqProvider::new(api_key.to_string(), language),
        };
        Arc::new(provider.with_params(self.params))
    }
}
