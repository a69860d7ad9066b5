//! Provider registration for ReplyKit.

use std::sync::Arc;

use tracing::debug;

use replykit_config::EndpointOverrides;
use replykit_core::ProviderRegistry;
use replykit_provider_anthropic::AnthropicFactory;
use replykit_provider_gemini::GeminiFactory;
use replykit_provider_openai::{GroqFactory, OpenAIFactory};

/// Register every provider adapter, applying endpoint overrides.
pub(crate) fn register_providers(endpoints: &EndpointOverrides) -> anyhow::Result<Arc<ProviderRegistry>> {
    let registry = Arc::new(ProviderRegistry::new());

    let mut openai = OpenAIFactory::new();
    if let Some(url) = &endpoints.openai {
        openai = openai.with_url(url.clone());
    }
    registry.register(Arc::new(openai))?;

    let mut groq = GroqFactory::new();
    if let Some(url) = &endpoints.groq {
        groq = groq.with_url(url.clone());
    }
    registry.register(Arc::new(groq))?;

    let mut anthropic = AnthropicFactory::new();
    if let Some(url) = &endpoints.anthropic {
        anthropic = anthropic.with_url(url.clone());
    }
    registry.register(Arc::new(anthropic))?;

    let mut gemini = GeminiFactory::new();
    if let Some(url) = &endpoints.gemini {
        gemini = gemini.with_base_url(url.clone());
    }
    registry.register(Arc::new(gemini))?;

    debug!(providers = ?registry.list_ids(), "providers registered");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use replykit_protocols::ProviderId;

    #[test]
    fn test_all_providers_registered() {
        let registry = register_providers(&EndpointOverrides::default()).unwrap();
        assert_eq!(registry.list_ids(), ProviderId::ALL.to_vec());
    }
}
