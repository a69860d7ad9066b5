//! Anthropic provider implementation.

use async_trait::async_trait;
use tracing::{debug, warn};

use replykit_protocols::provider::api_error_detail;
use replykit_protocols::{
    ErrorKind, GenerationError, GenerationParams, LanguageId, ProviderId, ReplyProvider,
};

use crate::api::{ApiMessage, ApiRequest, ApiResponse};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-3-haiku-20240307";

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    api_key: String,
    api_url: String,
    language: LanguageId,
    params: GenerationParams,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String, language: LanguageId) -> Self {
        Self::with_url(api_key, language, API_URL.to_string())
    }

    pub fn with_url(api_key: String, language: LanguageId, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            language,
            params: GenerationParams::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    fn build_request(&self, prompt: &str) -> ApiRequest {
        ApiRequest {
            model: MODEL.to_string(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.params.max_tokens,
            temperature: Some(self.params.temperature),
        }
    }

    /// One-token request used to check a key.
    fn ping_request(&self) -> ApiRequest {
        ApiRequest {
            model: MODEL.to_string(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: "Hi".to_string(),
            }],
            max_tokens: 1,
            temperature: None,
        }
    }

    async fn post(&self, api_request: &ApiRequest) -> Result<reqwest::Response, GenerationError> {
        self.client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(api_request)
            .send()
            .await
            .map_err(|e| GenerationError::transport(ProviderId::Anthropic, self.language, e))
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<reqwest::Response, GenerationError> {
        let response = self.post(api_request).await?;
        self.check_status(response).await
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response, GenerationError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            // {"type": "error", "error": {"type": "...", "message": "..."}}
            let detail = api_error_detail(&body);
            let kind = self.classify_status(status, detail.as_deref().unwrap_or_default());
            warn!(provider = "anthropic", status, ?kind, "messages request failed");
            return Err(GenerationError::from_status(
                ProviderId::Anthropic,
                status,
                kind,
                detail.as_deref(),
                self.language,
            ));
        }

        Ok(response)
    }

    fn extract_text(&self, response: &ApiResponse) -> Result<String, GenerationError> {
        let text = response.first_text().map(str::trim).unwrap_or_default();
        if !text.is_empty() {
            return Ok(text.to_string());
        }

        let kind = if response.stop_reason.as_deref() == Some("refusal") {
            ErrorKind::ContentBlocked
        } else {
            ErrorKind::EmptyResponse
        };
        warn!(provider = "anthropic", ?kind, "response carried no text");
        Err(GenerationError::localized(kind, Some(ProviderId::Anthropic), self.language))
    }
}

#[async_trait]
impl ReplyProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn model(&self) -> &str {
        MODEL
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_request = self.build_request(prompt);
        debug!(provider = "anthropic", model = MODEL, "sending messages request");

        let response = self.send_request(&api_request).await?;
        let api_response: ApiResponse = response.json().await.map_err(|e| {
            debug!(provider = "anthropic", error = %e, "undecodable messages body");
            GenerationError::localized(ErrorKind::EmptyResponse, Some(ProviderId::Anthropic), self.language)
        })?;
        self.extract_text(&api_response)
    }

    async fn validate_key(&self) -> Result<(), GenerationError> {
        debug!(provider = "anthropic", "validating api key");
        let response = self.post(&self.ping_request()).await?;
        // Authentication runs before request validation, so a 400 still
        // means the key was accepted.
        if response.status().as_u16() == 400 {
            return Ok(());
        }
        self.check_status(response).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
