//! Generation errors shared by providers, the broker and the reply modal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::messages::error_template;
use crate::types::{LanguageId, ProviderId};

/// Normalized error taxonomy.
///
/// The kind crosses the page/background boundary next to the localized
/// message, so the page can react to it without matching on text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No API key saved in settings.
    NotConfigured,
    InvalidApiKey,
    Forbidden,
    RateLimited,
    ServerError,
    ModelUnavailable,
    /// Provider refused to answer because of its safety filter.
    ContentBlocked,
    EmptyResponse,
    /// The background side could not be reached.
    ChannelUnavailable,
    /// Generation attempted without any context (page-side validation).
    EmptyContext,
    /// Also the kind of any code this build does not know.
    #[serde(other)]
    Unknown,
}

impl ErrorKind {
    /// Default classification of a non-2xx HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::InvalidApiKey,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::ModelUnavailable,
            429 => ErrorKind::RateLimited,
            500 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        }
    }

    /// Whether the user has to fix their settings before retrying.
    pub fn needs_settings(self) -> bool {
        matches!(
            self,
            ErrorKind::NotConfigured | ErrorKind::InvalidApiKey | ErrorKind::Forbidden
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotConfigured => "not_configured",
            ErrorKind::InvalidApiKey => "invalid_api_key",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ServerError => "server_error",
            ErrorKind::ModelUnavailable => "model_unavailable",
            ErrorKind::ContentBlocked => "content_blocked",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::ChannelUnavailable => "channel_unavailable",
            ErrorKind::EmptyContext => "empty_context",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// A failed generation: structured kind plus a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build the standard localized message for `kind`.
    pub fn localized(kind: ErrorKind, provider: Option<ProviderId>, language: LanguageId) -> Self {
        let name = provider.map(ProviderId::display_name).unwrap_or("AI");
        let message = error_template(kind, language).replace("{provider}", name);
        Self { kind, message }
    }

    /// Build the error for a non-2xx response.
    ///
    /// `kind` is the provider's classification of the status. Unmapped
    /// statuses keep the numeric status in the message together with the
    /// provider's own detail when it sent one.
    pub fn from_status(
        provider: ProviderId,
        status: u16,
        kind: ErrorKind,
        detail: Option<&str>,
        language: LanguageId,
    ) -> Self {
        if kind != ErrorKind::Unknown {
            return Self::localized(kind, Some(provider), language);
        }

        let mut message = error_template(ErrorKind::Unknown, language)
            .replace("{provider}", provider.display_name())
            .replace("{status}", &status.to_string());
        if let Some(detail) = detail.map(str::trim).filter(|d| !d.is_empty()) {
            message.push_str(": ");
            message.push_str(detail);
        }
        Self::new(ErrorKind::Unknown, message)
    }

    /// Transport level failure (connection refused, unreadable body...).
    pub fn transport(provider: ProviderId, language: LanguageId, detail: impl std::fmt::Display) -> Self {
        let prefix = error_template(ErrorKind::Unknown, language)
            .replace("{provider}", provider.display_name())
            .replace(" ({status})", "");
        Self::new(ErrorKind::Unknown, format!("{prefix}: {detail}"))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
