//! CLI transport for direct terminal interaction

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::backend::create_backend;
use crate::config::{AssistantConfig, BackendKind, Config};
use crate::core::{ConversationError, ConversationManager, Message};
use crate::tui::app::{install_panic_hook, restore_terminal, setup_terminal};
use crate::tui::{
    AppConfig, ControllerOptions, CrosstermEventSource, SystemHost, Theme, TuiController,
};

/// Command-line overrides for the `[assistant]` config section
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BackendOverrides {
    /// Answer backend to use
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Answer endpoint for the http backend
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Latency of the simulated backend in milliseconds
    #[arg(long = "delay-ms")]
    pub delay_ms: Option<u64>,
}

impl BackendOverrides {
    pub fn apply(&self, config: &mut AssistantConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
            // An endpoint alone implies the http backend
            if self.backend.is_none() {
                config.backend = BackendKind::Http;
            }
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(delay) = self.delay_ms {
            config.response_delay_ms = delay;
        }
    }
}

/// Run TUI chat mode
///
/// Takes over the terminal until the user quits; the terminal is restored
/// on exit and on panic.
pub async fn run_tui_chat(config: Config) -> Result<()> {
    let backend = create_backend(&config.assistant)?;
    tracing::info!(
        backend = backend.name(),
        theme = config.ui.theme.display_name(),
        "starting chat"
    );

    let options = ControllerOptions {
        app_config: AppConfig {
            show_timestamps: config.ui.show_timestamps,
            ..AppConfig::default()
        },
        theme: Theme::from_preset(config.ui.theme),
        download_dir: config.download.resolved_directory(),
    };
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms.max(10));
    let events = CrosstermEventSource::new(tick_rate);

    let terminal = setup_terminal().context("Failed to initialize terminal")?;
    install_panic_hook();

    let mut controller =
        TuiController::new(terminal, events, backend, Arc::new(SystemHost::new()), options);
    let result = controller.run().await;

    restore_terminal().context("Failed to restore terminal")?;
    result
}

/// Write the default config to `path`
///
/// An existing file is kept unless `force` is set.
pub fn run_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Config::default().save_to(path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

/// Ask a single question and print the answer
pub async fn run_ask(question: &str, config: &AssistantConfig, json: bool) -> Result<()> {
    let backend = create_backend(config)?;
    let mut conversation = ConversationManager::new();

    let (request, _) = conversation.submit(question).map_err(|e| match e {
        ConversationError::BlankInput => anyhow::anyhow!("Question is empty"),
        other => other.into(),
    })?;
    let result = backend.answer(&request.question).await;
    conversation.complete(request.id, result)?;

    let answer = conversation.last().context("Conversation has no answer")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ask_json(question, answer))?);
    } else if !answer.failed {
        println!("{}", format_answer(answer));
    }

    if answer.failed {
        anyhow::bail!("{}", answer.content);
    }
    Ok(())
}

/// JSON shape of `ask --json`, mirroring the http answer contract
fn ask_json(question: &str, answer: &Message) -> serde_json::Value {
    serde_json::json!({
        "question": question,
        "answer": answer.content,
        "citations": answer.citations,
        "failed": answer.failed,
    })
}

fn format_answer(answer: &Message) -> String {
    let mut out = answer.content.clone();
    if answer.citations.is_empty() {
        return out;
    }

    out.push_str(&format!("\n\n{}", "Citations:".bold()));
    for (n, citation) in answer.citations.iter().enumerate() {
        out.push_str(&format!(
            "\n  {} {} · {}\n      {}\n      {}",
            format!("[{}]", n + 1).yellow().bold(),
            citation.source.cyan(),
            citation.paragraph.dimmed(),
            format!("\"{}\"", citation.text).italic(),
            citation.link.blue().underline()
        ));
    }
    out
}
