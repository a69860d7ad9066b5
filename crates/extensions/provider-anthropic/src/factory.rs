//! Factory registered with the background provider registry.

use std::sync::Arc;

use replykit_protocols::{GenerationParams, LanguageId, ProviderFactory, ProviderId, ReplyProvider};

use crate::provider::AnthropicProvider;

/// Builds [`AnthropicProvider`]s.
#[derive(Debug, Clone, Default)]
pub struct AnthropicFactory {
    api_url: Option<String>,
    params: GenerationParams,
}

impl AnthropicFactory {
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

impl ProviderFactory for AnthropicFactory {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn create(&self, api_key: &str, language: LanguageId) -> Arc<dyn ReplyProvider> {
        let provider = match &self.api_url {
            Some(url) => AnthropicProvider::with_url(api_key.to_string(), language, url.clone()),
            None => AnthropicProvider::new(api_key.to_string(), language),
        };
        Arc::new(provider.with_params(self.params))
    }
}
