//! Request broker between the page side and the background service.
//!
//! The page side only ever sees [`BrokerHandle`]. Requests travel as JSON
//! over an mpsc channel, each paired with a oneshot for the answer; the
//! background service alone reads settings and holds the API key.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use replykit_config::SettingsStore;
use replykit_protocols::{
    BrokerRequest, ErrorKind, GenerationError, GenerationRequest, GenerationResult, LanguageId, ToneId,
};

use crate::prompt::PromptBuilder;
use crate::registry::ProviderRegistry;

const CHANNEL_CAPACITY: usize = 32;

struct Envelope {
    payload: String,
    reply: oneshot::Sender<String>,
}

/// Page-side sender.
#[derive(Clone)]
pub struct BrokerHandle {
    tx: mpsc::Sender<Envelope>,
    language: LanguageId,
}

/// Background-side receiver, consumed by [`BackgroundService::serve`].
pub struct BrokerInbox {
    rx: mpsc::Receiver<Envelope>,
}

impl BrokerHandle {
    /// A connected handle/inbox pair.
    pub fn pair() -> (BrokerHandle, BrokerInbox) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (
            BrokerHandle {
                tx,
                language: LanguageId::default(),
            },
            BrokerInbox { rx },
        )
    }

    /// Language of the "refresh the page" message.
    pub fn with_language(mut self, language: LanguageId) -> Self {
        self.language = language;
        self
    }

    /// Send a generation request and wait for its answer.
    pub async fn send(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let payload = serde_json::to_string(&request.into_wire())
            .map_err(|e| GenerationError::new(ErrorKind::Unknown, e.to_string()))?;
        let response = self.send_raw(payload).await?;

        match serde_json::from_str::<GenerationResult>(&response) {
            Ok(result) => result.into_result(),
            Err(e) => {
                warn!(error = %e, "malformed broker response");
                Err(GenerationError::new(ErrorKind::Unknown, e.to_string()))
            }
        }
    }

    /// Send an already-serialized message; returns the raw JSON answer.
    pub async fn send_raw(&self, payload: String) -> Result<String, GenerationError> {
        let (reply, answer) = oneshot::channel();
        if self.tx.send(Envelope { payload, reply }).await.is_err() {
            warn!("broker channel closed");
            return Err(self.unavailable());
        }
        answer.await.map_err(|_| {
            warn!("broker dropped the request");
            self.unavailable()
        })
    }

    fn unavailable(&self) -> GenerationError {
        GenerationError::localized(ErrorKind::ChannelUnavailable, None, self.language)
    }
}

/// Privileged side: settings, prompt building and provider dispatch.
pub struct BackgroundService {
    store: Arc<dyn SettingsStore>,
    providers: Arc<ProviderRegistry>,
}

impl BackgroundService {
    pub fn new(store: Arc<dyn SettingsStore>, providers: Arc<ProviderRegistry>) -> Self {
        Self { store, providers }
    }

    /// Start serving on a new channel.
    pub fn spawn(self: Arc<Self>) -> (BrokerHandle, JoinHandle<()>) {
        let (handle, inbox) = BrokerHandle::pair();
        let task = tokio::spawn(self.serve(inbox));
        (handle, task)
    }

    /// Answer messages until every handle is dropped. Each request runs in
    /// its own task, so requests from different modals proceed concurrently.
    pub async fn serve(self: Arc<Self>, mut inbox: BrokerInbox) {
        info!("background service started");
        while let Some(envelope) = inbox.rx.recv().await {
            let service = Arc::clone(&self);
            tokio::spawn(async move {
                let result = service.handle_message(&envelope.payload).await;
                match serde_json::to_string(&result) {
                    Ok(json) => {
                        if envelope.reply.send(json).is_err() {
                            debug!("requester went away before the answer");
                        }
                    }
                    Err(e) => error!(error = %e, "failed to encode broker response"),
                }
            });
        }
        info!("background service stopped");
    }

    /// Answer one wire message.
    pub async fn handle_message(&self, payload: &str) -> GenerationResult {
        let value: serde_json::Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "malformed broker message");
                return Err(GenerationError::new(ErrorKind::Unknown, format!("malformed message: {e}"))).into();
            }
        };

        let action = value.get("action").and_then(|a| a.as_str()).unwrap_or_default().to_string();
        match serde_json::from_value::<BrokerRequest>(value) {
            Ok(BrokerRequest::GenerateResponse { context, tone }) => self.generate(&context, &tone).await.into(),
            Err(e) if action == "generateResponse" => {
                warn!(error = %e, "malformed generation request");
                Err(GenerationError::new(ErrorKind::Unknown, format!("malformed request: {e}"))).into()
            }
            Err(_) => {
                warn!(action = %action, "unsupported broker action");
                Err(GenerationError::new(ErrorKind::Unknown, format!("unsupported action: {action}"))).into()
            }
        }
    }

    /// Settings lookup, key check, prompt, provider call.
    pub async fn generate(&self, context: &str, tone: &str) -> Result<String, GenerationError> {
        let settings = self.store.load().await.map_err(|e| {
            error!(error = %e, "failed to read settings");
            GenerationError::new(ErrorKind::Unknown, e.to_string())
        })?;

        let language = LanguageId::parse(&settings.language).unwrap_or_default();
        if !settings.has_api_key() {
            info!("generation refused: no API key configured");
            return Err(GenerationError::localized(ErrorKind::NotConfigured, None, language));
        }

        let config = settings
            .provider_config()
            .map_err(|e| GenerationError::new(ErrorKind::Unknown, e.to_string()))?;

        let tone = ToneId::parse(tone).unwrap_or_default();
        let prompt = PromptBuilder::build(context, tone, config.language);

        let provider = self
            .providers
            .create(config.provider, &config.api_key, config.language)
            .ok_or_else(|| {
                error!(provider = %config.provider, "no adapter registered");
                GenerationError::new(
                    ErrorKind::Unknown,
                    format!("no adapter registered for {}", config.provider.display_name()),
                )
            })?;

        info!(provider = %config.provider, model = provider.model(), tone = %tone, "generating reply");
        provider.generate(&prompt).await
    }
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
