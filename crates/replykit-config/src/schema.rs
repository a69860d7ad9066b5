//! Settings schema.
//!
//! Keys keep the camelCase names of the synced storage (`apiKey`,
//! `apiProvider`, `defaultTone`, `language`). Values are stored as written
//! and resolved into typed identifiers by [`Settings::provider_config`].

use serde::{Deserialize, Serialize};

use replykit_protocols::{LanguageId, ProviderId, ToneId};

use crate::error::ConfigError;

/// Persisted settings, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_provider: Option<String>,

    #[serde(default = "default_tone")]
    pub default_tone: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Endpoint overrides (proxies, self-hosted gateways).
    #[serde(default, skip_serializing_if = "EndpointOverrides::is_empty")]
    pub endpoints: EndpointOverrides,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_provider: None,
            default_tone: default_tone(),
            language: default_language(),
            endpoints: EndpointOverrides::default(),
        }
    }
}

fn default_tone() -> String {
    ToneId::default().as_str().to_string()
}

fn default_language() -> String {
    LanguageId::default().as_str().to_string()
}

impl Settings {
    /// Whether a non-blank API key is saved.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Resolve the stored strings into a typed [`ProviderConfig`].
    ///
    /// A missing provider falls back to OpenAI and an unknown language to
    /// the default language; an unknown provider name is an error because
    /// there is no adapter to send the request to.
    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        let provider = match self.api_provider.as_deref().map(str::trim) {
            None | Some("") => ProviderId::default(),
            Some(name) => ProviderId::parse(name).ok_or_else(|| ConfigError::InvalidValue {
                field: "apiProvider".to_string(),
                message: format!("unknown provider: {name}"),
            })?,
        };

        Ok(ProviderConfig {
            api_key: self.api_key.as_deref().map(str::trim).unwrap_or_default().to_string(),
            provider,
            language: LanguageId::parse(&self.language).unwrap_or_default(),
            default_tone: ToneId::parse(&self.default_tone).unwrap_or_default(),
        })
    }
}

/// Settings resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub provider: ProviderId,
    pub language: LanguageId,
    pub default_tone: ToneId,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Optional per-provider endpoint URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groq: Option<String>,
}

impl EndpointOverrides {
    pub fn is_empty(&self) -> bool {
        self.openai.is_none() && self.anthropic.is_none() && self.gemini.is_none() && self.groq.is_none()
    }

    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        match provider {
            ProviderId::OpenAI => self.openai.as_deref(),
            ProviderId::Anthropic => self.anthropic.as_deref(),
            ProviderId::Gemini => self.gemini.as_deref(),
            ProviderId::Groq => self.groq.as_deref(),
        }
    }
}
