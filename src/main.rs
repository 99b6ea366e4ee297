use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lexi_cli::config::Config;
use lexi_cli::transport::cli::{self, BackendOverrides};

#[derive(Parser)]
#[command(name = "lexi")]
#[command(author, version, about = "Lexi - legal Q&A assistant with cited answers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (TUI, default)
    Chat {
        #[command(flatten)]
        backend: BackendOverrides,
    },

    /// Ask one question and print the answer with its citations
    Ask {
        /// The question to ask
        question: String,

        /// Print the answer as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        backend: BackendOverrides,
    },

    /// Write a config file with the default settings
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Logs go to a file while the TUI owns the terminal, otherwise to stderr
fn init_logging(verbose: bool, to_file: bool) -> Result<()> {
    let filter = if verbose {
        "lexi_cli=debug"
    } else {
        "lexi_cli=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if to_file {
        let log_dir = Config::log_dir();
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("lexi.log"))
            .context("Failed to open log file")?;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat {
        backend: BackendOverrides::default(),
    });

    init_logging(cli.verbose, matches!(command, Commands::Chat { .. }))?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    if let Commands::Init { force } = command {
        return cli::run_init(&config_path, force);
    }

    let mut config = Config::load_from(&config_path)?;

    match command {
        Commands::Chat { backend } => {
            backend.apply(&mut config.assistant);
            cli::run_tui_chat(config).await?;
        }
        Commands::Ask {
            question,
            json,
            backend,
        } => {
            backend.apply(&mut config.assistant);
            cli::run_ask(&question, &config.assistant, json).await?;
        }
        // Handled before the config is loaded
        Commands::Init { .. } => {}
    }

    Ok(())
}
