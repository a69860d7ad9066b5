//! Shared chat-completions HTTP client.

use tracing::{debug, warn};

use replykit_protocols::provider::api_error_detail;
use replykit_protocols::{ErrorKind, GenerationError, GenerationParams, LanguageId, ProviderId};

use crate::api::{ApiMessage, ApiRequest, ApiResponse};

/// Client for one OpenAI-compatible chat-completions endpoint.
pub struct ChatClient {
    provider: ProviderId,
    api_url: String,
    api_key: String,
    model: String,
    language: LanguageId,
    params: GenerationParams,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(
        provider: ProviderId,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        language: LanguageId,
    ) -> Self {
        Self {
            provider,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            language,
            params: GenerationParams::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub(crate) fn build_request(&self, prompt: &str) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::user(prompt)],
            max_tokens: Some(self.params.max_tokens),
            temperature: Some(self.params.temperature),
        }
    }

    /// Send `prompt` and extract the first choice's text.
    ///
    /// `classify` maps a non-2xx status (and the provider's error detail)
    /// to an [`ErrorKind`].
    pub async fn complete<F>(&self, prompt: &str, classify: F) -> Result<String, GenerationError>
    where
        F: Fn(u16, &str) -> ErrorKind,
    {
        let api_request = self.build_request(prompt);
        debug!(provider = %self.provider, model = %self.model, "sending chat completion");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| GenerationError::transport(self.provider, self.language, e))?;

        if !response.status().is_success() {
            return Err(self.status_error(response, classify).await);
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            debug!(provider = %self.provider, error = %e, "undecodable completion body");
            GenerationError::localized(ErrorKind::EmptyResponse, Some(self.provider), self.language)
        })?;

        self.extract_text(api_response)
    }

    /// `GET {base}/models`, the cheapest authenticated call.
    pub async fn list_models<F>(&self, classify: F) -> Result<(), GenerationError>
    where
        F: Fn(u16, &str) -> ErrorKind,
    {
        debug!(provider = %self.provider, "validating api key");
        let response = self
            .client
            .get(self.models_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| GenerationError::transport(self.provider, self.language, e))?;

        if !response.status().is_success() {
            return Err(self.status_error(response, classify).await);
        }
        Ok(())
    }

    /// Models endpoint next to the chat-completions one.
    pub fn models_url(&self) -> String {
        let url = self.api_url.trim_end_matches('/');
        let base = url.strip_suffix("/chat/completions").unwrap_or(url);
        format!("{base}/models")
    }

    async fn status_error<F>(&self, response: reqwest::Response, classify: F) -> GenerationError
    where
        F: Fn(u16, &str) -> ErrorKind,
    {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = api_error_detail(&body);
        let kind = classify(status, detail.as_deref().unwrap_or_default());
        warn!(provider = %self.provider, status, ?kind, "request failed");
        GenerationError::from_status(self.provider, status, kind, detail.as_deref(), self.language)
    }

    fn extract_text(&self, response: ApiResponse) -> Result<String, GenerationError> {
        let choice = response.first_choice();
        let text = choice
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text.to_string());
        }

        let filtered = choice.and_then(|c| c.finish_reason.as_deref()) == Some("content_filter");
        let kind = if filtered {
            ErrorKind::ContentBlocked
        } else {
            ErrorKind::EmptyResponse
        };
        warn!(provider = %self.provider, ?kind, "completion carried no text");
        Err(GenerationError::localized(kind, Some(self.provider), self.language))
    }
}
