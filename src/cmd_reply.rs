//! `reply` and `scan` command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use parking_lot::Mutex;
use tracing::{debug, info};

use replykit_config::{FileSettingsStore, SettingsStore};
use replykit_core::{
    run_generation, AffordanceController, BackgroundService, ControllerConfig, Document, ModalError, ResponseState,
};
use replykit_protocols::{LanguageId, ToneId};

use crate::register::register_providers;

/// Options of the `reply` command.
pub(crate) struct ReplyOptions {
    pub field: usize,
    pub tone: Option<String>,
    pub context: Option<String>,
    pub insert: bool,
}

async fn load_page(page: &Path, url: Option<&str>, language: LanguageId) -> anyhow::Result<Arc<AffordanceController>> {
    let html = tokio::fs::read_to_string(page)
        .await
        .with_context(|| format!("failed to read {}", page.display()))?;
    let mut doc = Document::parse(&html);
    if let Some(url) = url {
        doc.set_url(url)?;
    }
    debug!(nodes = doc.len(), host = ?doc.host(), "page parsed");

    let config = ControllerConfig {
        language,
        ..ControllerConfig::default()
    };
    let controller = Arc::new(AffordanceController::new(Arc::new(Mutex::new(doc)), config)?);
    controller.scan()?;
    Ok(controller)
}

pub(crate) async fn handle_scan(store: &FileSettingsStore, page: &Path, url: Option<&str>) -> anyhow::Result<()> {
    let settings = store.load().await?;
    let language = LanguageId::parse(&settings.language).unwrap_or_default();
    let controller = load_page(page, url, language).await?;

    let fields = controller.fields();
    if fields.is_empty() {
        println!("No editable field found.");
        return Ok(());
    }
    for (index, field) in fields.into_iter().enumerate() {
        let tag = controller
            .document()
            .lock()
            .tag_name(field)
            .unwrap_or_default()
            .to_string();
        println!("[{index}] <{tag}> node {field}");
        let context = controller.extract_context(field);
        if context.is_empty() {
            println!("    (no context)");
        }
        for line in context.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}

pub(crate) async fn handle_reply(
    store: Arc<FileSettingsStore>,
    page: &Path,
    url: Option<&str>,
    options: ReplyOptions,
) -> anyhow::Result<()> {
    let settings = store.load().await?;
    let language = LanguageId::parse(&settings.language).unwrap_or_default();
    let tone = match options.tone.as_deref() {
        Some(name) => ToneId::parse(name).ok_or_else(|| anyhow!("unknown tone: {name}"))?,
        None => ToneId::parse(&settings.default_tone).unwrap_or_default(),
    };

    let controller = load_page(page, url, language).await?;
    let fields = controller.fields();
    let Some(field) = fields.get(options.field).copied() else {
        bail!("field {} not found: the page has {} editable field(s)", options.field, fields.len());
    };

    let modal = controller.open_modal(field, tone, language)?;
    let modal = Mutex::new(modal);
    if let Some(context) = options.context {
        let mut doc = controller.document().lock();
        modal.lock().set_context(&mut doc, context)?;
    }

    let providers = register_providers(&settings.endpoints)?;
    let service = Arc::new(BackgroundService::new(store, providers));
    let (broker, _task) = service.spawn();
    let broker = broker.with_language(language);

    info!(field = %field, tone = %tone, "requesting reply");
    match run_generation(controller.document(), &modal, &broker).await {
        Ok(_) => {}
        Err(ModalError::EmptyContext(err)) => bail!("{}", err.message()),
        Err(e) => return Err(e.into()),
    }

    let mut modal = modal.lock();
    match modal.response().clone() {
        ResponseState::Ready(text) => println!("{text}"),
        ResponseState::Failed(err) => {
            if err.kind().needs_settings() {
                eprintln!("hint: replykit settings set --api-key <KEY> --provider <PROVIDER>");
            }
            bail!("{}", err.message());
        }
        ResponseState::Idle | ResponseState::Pending => bail!("no response received"),
    }

    if options.insert {
        let mut doc = controller.document().lock();
        modal.insert(&mut doc)?;
        let content = doc.value(field).unwrap_or_else(|| doc.text_content(field));
        println!("--- field content ---");
        println!("{content}");
    }
    Ok(())
}
