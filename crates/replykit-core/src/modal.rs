//! Reply modal state.
//!
//! The modal owns the tone choice, the editable context, the response area
//! and the enabled state of its buttons. Each generation gets a token; a
//! response whose token is not the latest is discarded, so a late reply
//! never overwrites a newer one.

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use replykit_protocols::{ErrorKind, GenerationError, GenerationRequest, LanguageId, ToneId};

use crate::broker::BrokerHandle;
use crate::dom::{Document, NodeId, SharedDocument};
use crate::error::DomError;
use crate::insert::insert_text;

pub const OVERLAY_CLASS: &str = "ai-modal-overlay";
pub const MODAL_CLASS: &str = "ai-modal";

/// Why a modal action was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("a generation is already in progress")]
    Busy,

    #[error("the modal is closed")]
    Closed,

    #[error("{0}")]
    EmptyContext(GenerationError),

    #[error("no generated reply to insert")]
    NothingToInsert,

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// What the response area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseState {
    Idle,
    Pending,
    Ready(String),
    Failed(GenerationError),
}

/// A generation handed to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGeneration {
    pub token: u64,
    pub request: GenerationRequest,
}

#[derive(Debug)]
struct ModalNodes {
    overlay: NodeId,
    context_area: NodeId,
    response_area: NodeId,
    generate_button: NodeId,
    insert_button: NodeId,
}

/// One open reply modal bound to a target field.
#[derive(Debug)]
pub struct ReplyModal {
    field: NodeId,
    nodes: ModalNodes,
    context: String,
    tone: ToneId,
    language: LanguageId,
    response: ResponseState,
    generating: bool,
    latest_token: u64,
    open: bool,
}

impl ReplyModal {
    /// Mount a modal for `field`, replacing any modal already on the page.
    pub fn open(
        doc: &mut Document,
        field: NodeId,
        context: String,
        tone: ToneId,
        language: LanguageId,
    ) -> Result<Self, DomError> {
        for existing in doc.select(&format!(".{OVERLAY_CLASS}"))? {
            doc.remove(existing)?;
        }

        let host = doc.body().unwrap_or_else(|| doc.root());
        let overlay = element(doc, "div", OVERLAY_CLASS)?;
        let modal = element(doc, "div", MODAL_CLASS)?;
        let context_area = element(doc, "textarea", "ai-context-text")?;
        let response_area = element(doc, "textarea", "ai-response-text")?;
        let generate_button = element(doc, "button", "ai-btn ai-btn-generate")?;
        let insert_button = element(doc, "button", "ai-btn ai-btn-insert")?;

        for child in [context_area, response_area, generate_button, insert_button] {
            doc.append_child(modal, child)?;
        }
        doc.append_child(overlay, modal)?;
        doc.append_child(host, overlay)?;

        let modal = Self {
            field,
            nodes: ModalNodes {
                overlay,
                context_area,
                response_area,
                generate_button,
                insert_button,
            },
            context,
            tone,
            language,
            response: ResponseState::Idle,
            generating: false,
            latest_token: 0,
            open: true,
        };
        doc.set_value(context_area, modal.context.clone())?;
        modal.render(doc)?;
        debug!(field = %field, tone = %tone, "reply modal opened");
        Ok(modal)
    }

    pub fn field(&self) -> NodeId {
        self.field
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn tone(&self) -> ToneId {
        self.tone
    }

    pub fn response(&self) -> &ResponseState {
        &self.response
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn can_generate(&self) -> bool {
        self.open && !self.generating
    }

    pub fn can_insert(&self) -> bool {
        self.open && !self.generating && matches!(self.response, ResponseState::Ready(_))
    }

    /// Text currently shown in the response area.
    pub fn response_text(&self) -> String {
        match &self.response {
            ResponseState::Idle => String::new(),
            ResponseState::Pending => pending_label(self.language).to_string(),
            ResponseState::Ready(text) => text.clone(),
            ResponseState::Failed(err) => err.message().to_string(),
        }
    }

    pub fn select_tone(&mut self, tone: ToneId) {
        self.tone = tone;
    }

    pub fn set_context(&mut self, doc: &mut Document, context: impl Into<String>) -> Result<(), DomError> {
        self.context = context.into();
        doc.set_value(self.nodes.context_area, self.context.clone())
    }

    /// Validate the context and hand out the next request.
    ///
    /// An empty context is answered locally and never reaches the broker.
    pub fn begin_generation(&mut self, doc: &mut Document) -> Result<PendingGeneration, ModalError> {
        if !self.open {
            return Err(ModalError::Closed);
        }
        if self.generating {
            return Err(ModalError::Busy);
        }

        let context = self.context.trim();
        if context.is_empty() {
            let err = GenerationError::localized(ErrorKind::EmptyContext, None, self.language);
            self.response = ResponseState::Failed(err.clone());
            self.render(doc)?;
            return Err(ModalError::EmptyContext(err));
        }

        let request = GenerationRequest::new(context, self.tone);
        self.latest_token += 1;
        self.generating = true;
        self.response = ResponseState::Pending;
        self.render(doc)?;

        Ok(PendingGeneration {
            token: self.latest_token,
            request,
        })
    }

    /// Apply a broker response. Returns `false` when the response is stale.
    pub fn complete(
        &mut self,
        doc: &mut Document,
        token: u64,
        result: Result<String, GenerationError>,
    ) -> Result<bool, DomError> {
        if !self.open || token != self.latest_token {
            debug!(token, latest = self.latest_token, "discarding stale response");
            return Ok(false);
        }

        self.generating = false;
        self.response = match result {
            Ok(text) => ResponseState::Ready(text),
            Err(err) => {
                info!(kind = err.kind().as_str(), "generation failed");
                ResponseState::Failed(err)
            }
        };
        self.render(doc)?;
        Ok(true)
    }

    /// Write the generated reply into the target field and close.
    pub fn insert(&mut self, doc: &mut Document) -> Result<(), ModalError> {
        if !self.can_insert() {
            return Err(ModalError::NothingToInsert);
        }
        let ResponseState::Ready(text) = &self.response else {
            return Err(ModalError::NothingToInsert);
        };
        insert_text(doc, self.field, text)?;
        self.close(doc)?;
        Ok(())
    }

    /// Unmount the modal. Responses still in flight are discarded.
    pub fn close(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.generating = false;
        self.latest_token += 1;
        doc.remove(self.nodes.overlay)
    }

    fn render(&self, doc: &mut Document) -> Result<(), DomError> {
        doc.set_value(self.nodes.response_area, self.response_text())?;
        set_disabled(doc, self.nodes.generate_button, !self.can_generate())?;
        set_disabled(doc, self.nodes.insert_button, !self.can_insert())
    }
}

/// Run one generation: validate, send through the broker, apply the reply.
///
/// Locks are released while the request is in flight. Returns whether the
/// response was applied (`false` when a newer request superseded it).
pub async fn run_generation(
    document: &SharedDocument,
    modal: &Mutex<ReplyModal>,
    broker: &BrokerHandle,
) -> Result<bool, ModalError> {
    let pending = {
        let mut doc = document.lock();
        modal.lock().begin_generation(&mut doc)?
    };

    let result = broker.send(pending.request).await;

    let mut doc = document.lock();
    Ok(modal.lock().complete(&mut doc, pending.token, result)?)
}

fn element(doc: &mut Document, tag: &str, class: &str) -> Result<NodeId, DomError> {
    let id = doc.create_element(tag);
    doc.set_attr(id, "class", class)?;
    Ok(id)
}

fn set_disabled(doc: &mut Document, id: NodeId, disabled: bool) -> Result<(), DomError> {
    if disabled {
        doc.set_attr(id, "disabled", "")
    } else {
        doc.remove_attr(id, "disabled")
    }
}

fn pending_label(language: LanguageId) -> &'static str {
    match language {
        LanguageId::Fr => "Génération...",
        LanguageId::En => "Generating...",
        LanguageId::Es => "Generando...",
        LanguageId::De => "Wird generiert...",
    }
}

#[cfg(test)]
#[path = "modal_tests.rs"]
mod tests;
