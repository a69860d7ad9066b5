//! Factory registered with the background provider registry.

use std::sync::Arc;

use replykit_protocols::{GenerationParams, LanguageId, ProviderFactory, ProviderId, ReplyProvider};

use crate::provider::GeminiProvider;

/// Builds [`GeminiProvider`]s.
#[derive(Debug, Clone, Default)]
pub struct GeminiFactory {
    base_url: Option<String>,
    params: GenerationParams,
}

impl GeminiFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

impl ProviderFactory for GeminiFactory {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn create(&self, api_key: &str, language: LanguageId) -> Arc<dyn ReplyProvider> {
        let provider = match &self.base_url {
            Some(url) => GeminiProvider::with_base_url(api_key.to_string(), language, url.clone()),
            None => GeminiProvider::new(api_key.to_string(), language),
        };
        Arc::new(provider.with_params(self.params))
    }
}
