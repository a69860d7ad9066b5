//! Provider traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ErrorKind, GenerationError};
use crate::types::{LanguageId, ProviderId};

/// One external text-generation API bound to an API key.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> ProviderId;

    /// Model sent with every request.
    fn model(&self) -> &str;

    /// Classify a non-2xx status.
    ///
    /// `detail` is the provider's own error message, when the body carried
    /// one. Providers override this for their specific markers.
    fn classify_status(&self, status: u16, detail: &str) -> ErrorKind {
        let _ = detail;
        ErrorKind::from_status(status)
    }

    /// Send `prompt` as a single user message and return the trimmed reply.
    ///
    /// Performs exactly one HTTP call, never retries.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Check the API key with one cheap authenticated request.
    ///
    /// Rejections are classified like [`generate`](Self::generate) failures.
    async fn validate_key(&self) -> Result<(), GenerationError>;
}

/// Builds providers from the settings read for each request.
pub trait ProviderFactory: Send + Sync {
    fn id(&self) -> ProviderId;

    /// `language` selects the language of user-facing error messages.
    fn create(&self, api_key: &str, language: LanguageId) -> Arc<dyn ReplyProvider>;
}
