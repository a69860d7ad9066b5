//! Gemini provider implementation.

use async_trait::async_trait;
use tracing::{debug, warn};

use replykit_protocols::provider::api_error_detail;
use replykit_protocols::{
    ErrorKind, GenerationError, GenerationParams, LanguageId, ProviderId, ReplyProvider,
};

use crate::client::{ClientError, GeminiClient, BASE_URL};
use crate::types::*;

const MODEL: &str = "gemini-2.0-flash";

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    client: GeminiClient,
    language: LanguageId,
    params: GenerationParams,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: String, language: LanguageId) -> Self {
        Self::with_base_url(api_key, language, BASE_URL.to_string())
    }

    /// `base_url` replaces `https://generativelanguage.googleapis.com/v1beta`.
    pub fn with_base_url(api_key: String, language: LanguageId, base_url: String) -> Self {
        Self {
            client: GeminiClient::new(api_key, base_url),
            language,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.params.temperature),
                max_output_tokens: Some(self.params.max_tokens),
            }),
        }
    }

    fn map_client_error(&self, err: ClientError) -> GenerationError {
        match err {
            ClientError::Transport(detail) => {
                GenerationError::transport(ProviderId::Gemini, self.language, detail)
            }
            ClientError::Decode(detail) => {
                debug!(provider = "gemini", error = %detail, "undecodable generateContent body");
                GenerationError::localized(ErrorKind::EmptyResponse, Some(ProviderId::Gemini), self.language)
            }
            ClientError::Status { status, body } => {
                let detail = api_error_detail(&body);
                // The API_KEY marker can sit in `error.details[].reason`, so
                // classification looks at the whole body.
                let kind = self.classify_status(status, &body);
                warn!(provider = "gemini", status, ?kind, "request failed");
                GenerationError::from_status(
                    ProviderId::Gemini,
                    status,
                    kind,
                    detail.as_deref(),
                    self.language,
                )
            }
        }
    }
}

#[async_trait]
impl ReplyProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn model(&self) -> &str {
        MODEL
    }

    fn classify_status(&self, status: u16, detail: &str) -> ErrorKind {
        if status == 400 && detail.contains("API_KEY") {
            return ErrorKind::InvalidApiKey;
        }
        ErrorKind::from_status(status)
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = self.build_request(prompt);
        let response = self
            .client
            .generate_content(MODEL, &request)
            .await
            .map_err(|e| self.map_client_error(e))?;

        let text = response.first_text().map(str::trim).unwrap_or_default();
        if !text.is_empty() {
            return Ok(text.to_string());
        }

        let kind = if response.is_blocked() {
            ErrorKind::ContentBlocked
        } else {
            ErrorKind::EmptyResponse
        };
        warn!(provider = "gemini", ?kind, "unexpected generateContent response");
        Err(GenerationError::localized(kind, Some(ProviderId::Gemini), self.language))
    }

    async fn validate_key(&self) -> Result<(), GenerationError> {
        self.client
            .list_models()
            .await
            .map_err(|e| self.map_client_error(e))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
