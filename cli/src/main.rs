//! `analyzer-chat`: command-line host for the analysis chat panel.
//!
//! Each invocation restores the saved conversation, turns one command into
//! panel events, runs the panel until every request it sent has been
//! answered, then prints the resulting view. The panel persists as it goes.

mod actions;
mod print;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use panel::config::ConfigError;
use panel::diagnostics::{DiagnosticLog, FileLog, TracingLog};
use panel::{
    AnalyzeError, ConversationStore, HttpTransport, JsonFileStore, Panel, PanelConfig, PanelOutput, event_channel,
    output_channel,
};
use tracing_subscriber::EnvFilter;

/// Subscriber filter when `RUST_LOG` is unset. Keeps the `diagnostics`
/// target visible for runs that log traffic to `tracing`.
const DEFAULT_LOG_FILTER: &str = "warn,diagnostics=info";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("transport setup failed: {0}")]
    Transport(#[from] AnalyzeError),
}

#[derive(Parser, Debug)]
#[command(name = "analyzer-chat", about = "Chat with the code analysis service")]
struct Cli {
    /// Analysis service base URL.
    #[arg(long, env = "ANALYZER_BASE_URL")]
    base_url: Option<String>,

    /// Conversation snapshot file.
    #[arg(long, env = "ANALYZER_STATE_PATH")]
    state_path: Option<PathBuf>,

    /// Append request/response diagnostics to this file (default
    /// `.analyzer-chat/diagnostics.log`).
    #[arg(long, env = "ANALYZER_LOG_PATH")]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Analyze a file, as if it were the active editor file.
    Analyze {
        file: PathBuf,
        /// Replace the suggested "Analyze <name>" purpose.
        #[arg(long)]
        purpose: Option<String>,
    },
    /// Send code with an explicit purpose.
    Send {
        #[arg(long)]
        purpose: String,
        #[arg(long, required_unless_present = "file", conflicts_with = "file")]
        code: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Stage a file to go with every following request.
    Attach { file: PathBuf },
    /// Remove a staged file by its 1-based position.
    Detach { index: usize },
    /// Remove every staged file.
    DetachAll,
    /// Clear the conversation; staged files stay.
    Clear,
    /// Print the conversation and staged files.
    Show,
}

impl Cli {
    fn config(&self) -> Result<PanelConfig, CliError> {
        let mut config = PanelConfig::from_env()?;
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url)?;
        }
        if let Some(state_path) = &self.state_path {
            config.state_path.clone_from(state_path);
        }
        if self.log_path.is_some() {
            config.log_path.clone_from(&self.log_path);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    run(&config, &cli.command).await
}

async fn run(config: &PanelConfig, command: &Command) -> Result<(), CliError> {
    let log: Arc<dyn DiagnosticLog> = match &config.log_path {
        Some(path) => Arc::new(FileLog::new(path)),
        None => Arc::new(TracingLog),
    };
    let transport = Arc::new(HttpTransport::new(config.endpoint(), log, config.preview_chars)?);
    let store = ConversationStore::open(Arc::new(JsonFileStore::new(&config.state_path)));
    tracing::debug!(endpoint = transport.endpoint(), state = %config.state_path.display(), "panel ready");

    let plan = actions::plan(command);
    let (events_tx, events_rx) = event_channel();
    for event in plan.events {
        let _ = events_tx.send(event);
    }
    drop(events_tx);

    let (outputs_tx, mut outputs_rx) = output_channel();
    let panel = Panel::new(store, transport, outputs_tx).run(events_rx).await;
    let view = panel.view();
    drop(panel);

    for notice in &plan.notices {
        eprintln!("{}", print::render_notice(notice));
    }
    while let Some(output) = outputs_rx.recv().await {
        if let PanelOutput::Notify(notice) = output {
            eprintln!("{}", print::render_notice(&notice));
        }
    }
    print!("{}", print::render_view(&view));
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
