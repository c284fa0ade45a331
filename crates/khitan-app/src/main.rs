use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use khitan_config::Config;
use khitan_core::Direction;
use khitan_core::types::AppEvent;
use tokio::signal;

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod render;
pub mod state;
pub mod status;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::events::handle_events;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "khitan", about = "Khitan small script glossary lookup and analysis")]
struct Cli {
    /// Config file (JSON); overrides the profile
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Profile name under the khitan home directory
    #[arg(long, global = true, default_value = "main")]
    profile: String,

    /// Completion API key; overrides config and environment
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Query direction: c2k (modern -> Khitan) or k2c (Khitan -> modern)
    #[arg(short, long, global = true)]
    direction: Option<Direction>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve glossary context and ask the completion service
    Ask {
        /// Query text
        query: Vec<String>,
    },

    /// Retrieve glossary context only
    Context {
        /// Query text
        query: Vec<String>,
    },

    /// Inspect or edit the query history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show glossary diagnostics and settings
    Status,

    /// Interactive session
    Shell,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List records, most recent first
    List,

    /// Show one record
    Show {
        id: String,

        /// Re-run retrieval and show the matched context
        #[arg(long)]
        evidence: bool,
    },

    /// Delete one record
    Delete { id: String },

    /// Delete every record
    Clear,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = env::var("KHITAN_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => profile::load_config_file(path)?,
        None => profile::load_user_profile(&profile::khitan_root(), &cli.profile)?,
    };

    let mut config = config.with_env_credential();
    if let Some(key) = &cli.api_key {
        config.completion.api_key = key.clone();
    }
    if let Some(direction) = cli.direction {
        config.default_direction = direction;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let direction = config.default_direction;
    let state = Arc::new(AppState::new(config)?);

    let event = match cli.command {
        Commands::Ask { query } => AppEvent::Analyze {
            query: query.join(" "),
            direction,
        },
        Commands::Context { query } => AppEvent::Lookup {
            query: query.join(" "),
            direction,
        },
        Commands::History { action } => match action {
            HistoryAction::List => AppEvent::ShowHistory,
            HistoryAction::Show { id, evidence } => {
                handle_events(&state, AppEvent::OpenRecord(id)).await?;
                if !evidence {
                    return Ok(());
                }
                AppEvent::ShowEvidence
            }
            HistoryAction::Delete { id } => AppEvent::DeleteRecord(id),
            HistoryAction::Clear => AppEvent::ClearHistory,
        },
        Commands::Status => AppEvent::ShowStatus,
        Commands::Shell => return run_shell(state).await,
    };

    handle_events(&state, event).await?;
    Ok(())
}

async fn run_shell(state: Arc<AppState>) -> Result<()> {
    println!(
        "Khitan glossary shell [{}]. Type a query, /mode c2k|k2c, /history, /open <id>, /evidence, /delete <id>, /clear, /status or /quit.",
        state.direction().await
    );

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::debug!("event loop finished"),
                Ok(Err(e)) => tracing::error!("event loop exited: {e}"),
                Err(e) => tracing::error!("event loop panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    Ok(())
}
