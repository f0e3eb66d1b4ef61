//! Quill CLI entry point.
//!
//! Binary name: `quill`
//!
//! Parses arguments, initializes config and the session store, then runs
//! one completion turn (or a stored-conversation introspection command).

mod cli;
mod printer;
mod sessions;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use quill_core::chat::ChatHandler;
use quill_core::role::RoleRegistry;
use quill_infra::config::load_global_config;
use quill_infra::llm::OpenAiCompatProvider;
use quill_infra::storage::FileSessionStore;
use quill_types::error::UsageError;

use cli::Cli;
use printer::{MarkdownPrinter, TextPrinter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,quill=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(err) => {
            // Misuse (wrong persona, unknown role) exits 2, like any
            // argument error; everything else propagates as a failure.
            if let Some(usage) = err.chain().find_map(|cause| cause.downcast_ref::<UsageError>()) {
                eprintln!("{}", console::style(usage).red());
                std::process::exit(2);
            }
            Err(err)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quill");
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quill");

    let config = load_global_config(&config_dir).await;
    let store = Arc::new(FileSessionStore::new(
        config.chat_cache_path(&data_dir),
        config.window(),
    ));
    let registry = RoleRegistry::with_defaults(std::env::consts::OS, &current_shell());

    if cli.list_chats {
        return sessions::list_chats(&store).await;
    }
    if let Some(chat_id) = &cli.show_chat {
        return sessions::show_chat(&store, chat_id, &config, cli.markdown()).await;
    }

    let Some(prompt) = cli.prompt.clone() else {
        anyhow::bail!("a prompt is required; see 'quill --help'");
    };

    let role = registry
        .get(&cli.role)
        .cloned()
        .ok_or_else(|| UsageError::RoleNotFound {
            name: cli.role.clone(),
        })?;
    let handler = ChatHandler::new(
        Arc::clone(&store),
        &registry,
        cli.chat.clone(),
        role,
        cli.markdown(),
    )
    .await?;

    let api_key = std::env::var("OPENAI_API_KEY")
        .map(SecretString::from)
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;
    let model = cli.model.clone().unwrap_or_else(|| config.model.clone());
    let provider = Arc::new(OpenAiCompatProvider::new(
        &api_key,
        config.api_base_url.as_deref(),
        &model,
    ));

    let live = !cli.no_stream;
    tracing::debug!(%model, role = %handler.role().name, live, "sending completion request");
    if handler.markdown() {
        let mut printer = MarkdownPrinter::new(&config.default_color, &config.code_theme);
        handler
            .handle(&prompt, provider, &mut printer, &model, None, live)
            .await?;
    } else {
        let mut printer = TextPrinter::new(&config.default_color);
        handler
            .handle(&prompt, provider, &mut printer, &model, None, live)
            .await?;
    }

    Ok(())
}

/// Basename of `$SHELL`, falling back to `sh`.
fn current_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .and_then(|shell| {
            PathBuf::from(shell)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "sh".to_string())
}
