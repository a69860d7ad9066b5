//! ReplyKit - AI reply assistant for forum comment fields
//!
//! Main entry point for the ReplyKit CLI.

mod cli;
mod cmd_reply;
mod cmd_settings;
mod register;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use replykit_config::FileSettingsStore;

use crate::cli::{Cli, Commands};
use crate::cmd_reply::{handle_reply, handle_scan, ReplyOptions};
use crate::cmd_settings::handle_settings_command;

fn replykit_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("replykit"))
        .unwrap_or_else(|| PathBuf::from(".replykit"))
}

fn init_tracing() -> anyhow::Result<()> {
    let log_dir = replykit_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("replykit")
        .filename_suffix("log")
        .max_log_files(7)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The worker guard flushes the file writer on drop.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> = std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Console output goes to stderr; stdout carries the generated reply.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    let store = match cli.settings {
        Some(path) => FileSettingsStore::new(path),
        None => FileSettingsStore::at_default_path()?,
    };
    if store.initialize_defaults().await? {
        info!(path = %store.path().display(), "created default settings");
    }

    match cli.command {
        Commands::Reply {
            page,
            url,
            field,
            tone,
            context,
            insert,
        } => {
            let options = ReplyOptions {
                field,
                tone,
                context,
                insert,
            };
            handle_reply(Arc::new(store), &page, url.as_deref(), options).await
        }
        Commands::Scan { page, url } => handle_scan(&store, &page, url.as_deref()).await,
        Commands::Settings { action } => handle_settings_command(&store, action).await,
    }
}
