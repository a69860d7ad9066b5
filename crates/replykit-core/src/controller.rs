//! Affordance controller.
//!
//! Keeps icons attached to editable fields as the page changes and turns
//! page events (icon clicks, the keyboard shortcut, the context menu, the
//! hover button) into activations naming the target field.
//!
//! Lock order is document first, then controller state. Neither lock is
//! held across an `.await`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use replykit_protocols::{LanguageId, ToneId};

use crate::context::ContextExtractor;
use crate::dom::{BoundingBox, Document, MutationRecord, NodeId, SharedDocument};
use crate::error::DomError;
use crate::fields::{FieldRegistry, ICON_CLASS};
use crate::modal::{ReplyModal, OVERLAY_CLASS};

pub const TOAST_CLASS: &str = "ai-toast";
pub const HOVER_BUTTON_CLASS: &str = "ai-hover-btn";
pub const CONTEXT_MENU_CLASS: &str = "ai-context-menu";
pub const CONTEXT_MENU_ITEM_CLASS: &str = "ai-context-menu-item";

const HOVER_BUTTON_SIZE: f64 = 24.0;
const DEBOUNCE_TICK: Duration = Duration::from_millis(25);

/// Timings and display language.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Quiet period after the last mutation before rescanning.
    pub debounce: Duration,
    /// Rescan interval independent of mutations.
    pub poll_interval: Duration,
    pub toast_duration: Duration,
    /// Delay before the hover button goes away once the pointer left.
    pub hover_grace: Duration,
    pub language: LanguageId,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(150),
            poll_interval: Duration::from_secs(2),
            toast_duration: Duration::from_secs(3),
            hover_grace: Duration::from_millis(300),
            language: LanguageId::default(),
        }
    }
}

/// Page events the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    FocusIn { target: NodeId },
    Click { target: NodeId },
    KeyDown { key: String, ctrl: bool, shift: bool },
    ContextMenu { target: NodeId },
    PointerEnter { target: NodeId },
    PointerLeave { target: NodeId },
}

/// How the user asked for a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationSource {
    Icon,
    Shortcut,
    ContextMenu,
    HoverButton,
}

/// A request to open the reply modal for `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub field: NodeId,
    pub source: ActivationSource,
}

#[derive(Debug, Clone, Copy)]
struct ContextMenu {
    menu: NodeId,
    item: NodeId,
    field: NodeId,
}

#[derive(Debug, Clone, Copy)]
struct HoverButton {
    button: NodeId,
    field: NodeId,
}

struct ControllerState {
    registry: FieldRegistry,
    last_focused: Option<NodeId>,
    context_menu: Option<ContextMenu>,
    hover: Option<HoverButton>,
    hover_epoch: u64,
    toast: Option<NodeId>,
    toast_epoch: u64,
}

/// Owns the field registry and the transient page UI.
pub struct AffordanceController {
    document: SharedDocument,
    config: ControllerConfig,
    extractor: ContextExtractor,
    state: Arc<Mutex<ControllerState>>,
}

impl AffordanceController {
    /// Controller for the site profile matching the document's host.
    pub fn new(document: SharedDocument, config: ControllerConfig) -> Result<Self, DomError> {
        let extractor = ContextExtractor::for_document(&document.lock());
        let registry = FieldRegistry::new(extractor.profile())?;
        debug!(profile = extractor.profile().name(), "affordance controller created");

        Ok(Self {
            document,
            config,
            extractor,
            state: Arc::new(Mutex::new(ControllerState {
                registry,
                last_focused: None,
                context_menu: None,
                hover: None,
                hover_epoch: 0,
                toast: None,
                toast_epoch: 0,
            })),
        })
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Attach icons to new fields. Returns the fields decorated by this call.
    pub fn scan(&self) -> Result<Vec<NodeId>, DomError> {
        let mut doc = self.document.lock();
        let attached = self.state.lock().registry.scan(&mut doc)?;
        if !attached.is_empty() {
            info!(count = attached.len(), "attached reply icons");
        }
        Ok(attached)
    }

    /// Decorated fields, in creation order.
    pub fn fields(&self) -> Vec<NodeId> {
        self.state.lock().registry.fields()
    }

    pub fn last_focused(&self) -> Option<NodeId> {
        self.state.lock().last_focused
    }

    /// Context text for `field`.
    pub fn extract_context(&self, field: NodeId) -> String {
        self.extractor.extract(&self.document.lock(), field)
    }

    /// Open the reply modal for `field`, prefilled with its context.
    pub fn open_modal(&self, field: NodeId, tone: ToneId, language: LanguageId) -> Result<ReplyModal, DomError> {
        let mut doc = self.document.lock();
        let context = self.extractor.extract(&doc, field);
        debug!(field = %field, chars = context.chars().count(), "context extracted");
        ReplyModal::open(&mut doc, field, context, tone, language)
    }

    /// React to one page event.
    ///
    /// Timed removals (toast, hover button) are scheduled on the current
    /// Tokio runtime.
    pub fn handle(&self, event: PageEvent) -> Result<Option<Activation>, DomError> {
        match event {
            PageEvent::FocusIn { target } => {
                let doc = self.document.lock();
                if let Some(field) = editable_field(&doc, target) {
                    self.state.lock().last_focused = Some(field);
                }
                Ok(None)
            }
            PageEvent::Click { target } => self.on_click(target),
            PageEvent::KeyDown { key, ctrl, shift } => {
                if ctrl && shift && key.eq_ignore_ascii_case("g") {
                    self.on_shortcut()
                } else {
                    Ok(None)
                }
            }
            PageEvent::ContextMenu { target } => {
                self.on_context_menu(target)?;
                Ok(None)
            }
            PageEvent::PointerEnter { target } => {
                self.on_pointer_enter(target)?;
                Ok(None)
            }
            PageEvent::PointerLeave { target } => {
                self.on_pointer_leave(target);
                Ok(None)
            }
        }
    }

    fn on_click(&self, target: NodeId) -> Result<Option<Activation>, DomError> {
        let mut doc = self.document.lock();
        let mut state = self.state.lock();

        if let Some(menu) = state.context_menu.take() {
            doc.remove(menu.menu)?;
            if doc.contains(menu.item, target) {
                return Ok(Some(activation(menu.field, ActivationSource::ContextMenu)));
            }
        }

        if let Some(hover) = state.hover.filter(|h| doc.contains(h.button, target)) {
            state.hover = None;
            state.hover_epoch += 1;
            doc.remove(hover.button)?;
            return Ok(Some(activation(hover.field, ActivationSource::HoverButton)));
        }

        Ok(state
            .registry
            .field_for_icon(&doc, target)
            .map(|field| activation(field, ActivationSource::Icon)))
    }

    fn on_shortcut(&self) -> Result<Option<Activation>, DomError> {
        let mut doc = self.document.lock();
        let mut state = self.state.lock();

        match state.last_focused.filter(|field| doc.is_connected(*field)) {
            Some(field) => Ok(Some(activation(field, ActivationSource::Shortcut))),
            None => {
                state.last_focused = None;
                self.show_toast(&mut doc, &mut state)?;
                Ok(None)
            }
        }
    }

    fn on_context_menu(&self, target: NodeId) -> Result<(), DomError> {
        let mut doc = self.document.lock();
        let mut state = self.state.lock();

        if let Some(menu) = state.context_menu.take() {
            doc.remove(menu.menu)?;
        }
        let Some(field) = editable_field(&doc, target) else {
            return Ok(());
        };

        let menu = doc.create_element("div");
        doc.set_attr(menu, "class", CONTEXT_MENU_CLASS)?;
        let item = doc.create_element("div");
        doc.set_attr(item, "class", CONTEXT_MENU_ITEM_CLASS)?;
        let label = doc.create_text(context_menu_label(self.config.language));
        doc.append_child(item, label)?;
        doc.append_child(menu, item)?;
        let host = doc.body().unwrap_or_else(|| doc.root());
        doc.append_child(host, menu)?;

        state.context_menu = Some(ContextMenu { menu, item, field });
        Ok(())
    }

    fn on_pointer_enter(&self, target: NodeId) -> Result<(), DomError> {
        let mut doc = self.document.lock();
        let mut state = self.state.lock();

        if state.hover.is_some_and(|h| doc.contains(h.button, target)) {
            state.hover_epoch += 1;
            return Ok(());
        }

        let Some(field) = editable_field(&doc, target) else {
            return Ok(());
        };
        if std::iter::once(field)
            .chain(doc.ancestors(field))
            .any(|id| doc.has_class(id, OVERLAY_CLASS))
        {
            return Ok(());
        }

        state.hover_epoch += 1;
        if let Some(hover) = state.hover {
            if hover.field == field {
                return Ok(());
            }
            doc.remove(hover.button)?;
            state.hover = None;
        }

        let button = doc.create_element("button");
        doc.set_attr(button, "class", HOVER_BUTTON_CLASS)?;
        doc.set_attr(button, "type", "button")?;
        let (x, y) = doc.bounding_box(field).top_right();
        doc.set_bounding_box(
            button,
            BoundingBox::new(x - HOVER_BUTTON_SIZE, y, HOVER_BUTTON_SIZE, HOVER_BUTTON_SIZE),
        )?;
        let host = doc.body().unwrap_or_else(|| doc.root());
        doc.append_child(host, button)?;

        state.hover = Some(HoverButton { button, field });
        Ok(())
    }

    fn on_pointer_leave(&self, target: NodeId) {
        let doc = self.document.lock();
        let mut state = self.state.lock();

        let Some(hover) = state.hover else {
            return;
        };
        let left_field = editable_field(&doc, target) == Some(hover.field);
        if !left_field && !doc.contains(hover.button, target) {
            return;
        }

        state.hover_epoch += 1;
        let epoch = state.hover_epoch;
        let document = Arc::clone(&self.document);
        let shared = Arc::clone(&self.state);
        let grace = self.config.hover_grace;

        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let mut doc = document.lock();
            let mut state = shared.lock();
            if state.hover_epoch != epoch {
                return;
            }
            if let Some(hover) = state.hover.take() {
                if let Err(e) = doc.remove(hover.button) {
                    warn!(error = %e, "failed to remove hover button");
                }
            }
        });
    }

    fn show_toast(&self, doc: &mut Document, state: &mut ControllerState) -> Result<(), DomError> {
        if let Some(toast) = state.toast.take() {
            doc.remove(toast)?;
        }

        let toast = doc.create_element("div");
        doc.set_attr(toast, "class", TOAST_CLASS)?;
        let text = doc.create_text(toast_message(self.config.language));
        doc.append_child(toast, text)?;
        let host = doc.body().unwrap_or_else(|| doc.root());
        doc.append_child(host, toast)?;

        state.toast = Some(toast);
        state.toast_epoch += 1;
        let epoch = state.toast_epoch;
        let document = Arc::clone(&self.document);
        let shared = Arc::clone(&self.state);
        let duration = self.config.toast_duration;

        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut doc = document.lock();
            let mut state = shared.lock();
            if state.toast_epoch != epoch {
                return;
            }
            if let Some(toast) = state.toast.take() {
                if let Err(e) = doc.remove(toast) {
                    warn!(error = %e, "failed to remove toast");
                }
            }
        });
        debug!("no focused field, toast shown");
        Ok(())
    }

    /// Scan now, then keep scanning on mutation bursts and on the poll
    /// interval until the handle is stopped.
    pub fn spawn(self: Arc<Self>) -> ControllerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let mut observer = self.document.lock().observe();

        let task = tokio::spawn(async move {
            self.rescan("initial");

            let mut debounce_timer: Option<Instant> = None;
            let period = self.config.poll_interval;
            let mut poll = tokio::time::interval_at(Instant::now() + period, period);

            loop {
                tokio::select! {
                    Some(record) = observer.recv() => {
                        if self.is_relevant(&record) {
                            debounce_timer = Some(Instant::now());
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("affordance controller shutting down");
                        break;
                    }
                    _ = poll.tick() => {
                        self.rescan("poll");
                    }
                    _ = tokio::time::sleep(DEBOUNCE_TICK) => {
                        if let Some(timer) = debounce_timer {
                            if timer.elapsed() >= self.config.debounce {
                                debounce_timer = None;
                                self.rescan("mutation");
                            }
                        }
                    }
                }
            }
        });

        ControllerHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    fn rescan(&self, trigger: &str) {
        match self.scan() {
            Ok(attached) => debug!(trigger, attached = attached.len(), "field scan"),
            Err(e) => warn!(trigger, error = %e, "field scan failed"),
        }
    }

    /// Mutations made only of our own UI do not trigger a rescan.
    fn is_relevant(&self, record: &MutationRecord) -> bool {
        let doc = self.document.lock();
        record
            .added
            .iter()
            .chain(record.removed.iter())
            .any(|node| !is_own_ui(&doc, *node))
    }
}

/// Stops the scanning task.
pub struct ControllerHandle {
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: JoinHandle<()>,
}

impl ControllerHandle {
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Err(e) = self.task.await {
            warn!(error = %e, "affordance controller task failed");
        }
    }
}

fn activation(field: NodeId, source: ActivationSource) -> Activation {
    debug!(field = %field, source = ?source, "reply requested");
    Activation { field, source }
}

/// The editable field `target` belongs to, if any.
fn editable_field(doc: &Document, target: NodeId) -> Option<NodeId> {
    std::iter::once(target)
        .chain(doc.ancestors(target))
        .find(|id| doc.is_editable(*id))
}

fn is_own_ui(doc: &Document, node: NodeId) -> bool {
    [ICON_CLASS, HOVER_BUTTON_CLASS, TOAST_CLASS, CONTEXT_MENU_CLASS, OVERLAY_CLASS]
        .iter()
        .any(|class| doc.has_class(node, class))
}

fn toast_message(language: LanguageId) -> &'static str {
    match language {
        LanguageId::Fr => "Veuillez d'abord cliquer dans un champ de texte",
        LanguageId::En => "Please click in a text field first",
        LanguageId::Es => "Primero haz clic en un campo de texto",
        LanguageId::De => "Bitte klicken Sie zuerst in ein Textfeld",
    }
}

fn context_menu_label(language: LanguageId) -> &'static str {
    match language {
        LanguageId::Fr => "Générer une réponse avec l'IA",
        LanguageId::En => "Generate a reply with AI",
        LanguageId::Es => "Generar una respuesta con IA",
        LanguageId::De => "Antwort mit KI generieren",
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
