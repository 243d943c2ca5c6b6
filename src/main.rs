// src/main.rs — Quill entry point

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

use quill::cli::{Cli, Commands, LibraryAction};
use quill::infra::config::Config;
use quill::infra::logger;
use quill::provider::openai_compat::OpenAICompatBackend;
use quill::provider::ChatBackend;
use quill::session::SessionStore;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let store = SessionStore::open_default();

    // Library commands don't need a backend
    match &cli.command {
        Some(Commands::Library { action }) => {
            return match action {
                None | Some(LibraryAction::List) => quill::cli::library::run_list(&store),
                Some(LibraryAction::Show { id }) => quill::cli::library::run_show(&store, id),
            };
        }
        Some(Commands::Replay { id }) => {
            return quill::cli::library::run_show(&store, id);
        }
        None | Some(Commands::Chat) => {}
    }

    let api_key = config.resolve_api_key()?;
    let backend: Arc<dyn ChatBackend> = Arc::new(OpenAICompatBackend::new(
        "openrouter",
        api_key,
        config.backend.base_url.clone(),
        Duration::from_secs(config.backend.timeout_seconds),
    )?);

    let model = cli
        .model
        .clone()
        .unwrap_or_else(|| config.model.default.clone());

    quill::cli::chat::run_chat(backend, &model, &config, store).await
}
