//! OpenAI and Groq provider implementations.

use async_trait::async_trait;

use replykit_protocols::{GenerationError, GenerationParams, LanguageId, ProviderId, ReplyProvider};

use crate::client::ChatClient;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-3.5-turbo";

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// OpenAI chat-completions provider.
pub struct OpenAIProvider {
    client: ChatClient,
}

impl OpenAIProvider {
    pub fn new(api_key: String, language: LanguageId) -> Self {
        Self::with_url(api_key, language, OPENAI_API_URL.to_string())
    }

    /// Create provider with custom API URL (proxies, tests).
    pub fn with_url(api_key: String, language: LanguageId, api_url: String) -> Self {
        Self {
            client: ChatClient::new(ProviderId::OpenAI, api_url, api_key, OPENAI_MODEL, language),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.client = self.client.with_params(params);
        self
    }
}

#[async_trait]
impl ReplyProvider for OpenAIProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAI
    }

    fn model(&self) -> &str {
        self.client.model()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.client
            .complete(prompt, |status, detail| self.classify_status(status, detail))
            .await
    }

    async fn validate_key(&self) -> Result<(), GenerationError> {
        self.client
            .list_models(|status, detail| self.classify_status(status, detail))
            .await
    }
}

/// Groq provider (OpenAI-compatible endpoint).
pub struct GroqProvider {
    client: ChatClient,
}

impl GroqProvider {
    pub fn new(api_key: String, language: LanguageId) -> Self {
        Self::with_url(api_key, language, GROQ_API_URL.to_string())
    }

    pub fn with_url(api_key: String, language: LanguageId, api_url: String) -> Self {
        Self {
            client: ChatClient::new(ProviderId::Groq, api_url, api_key, GROQ_MODEL, language),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.client = self.client.with_params(params);
        self
    }
}

#[async_trait]
impl ReplyProvider for GroqProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    fn model(&self) -> &str {
        self.client.model()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.client
            .complete(prompt, |status, detail| self.classify_status(status, detail))
            .await
    }

    async fn validate_key(&self) -> Result<(), GenerationError> {
        self.client
            .list_models(|status, detail| self.classify_status(status, detail))
            .await
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
