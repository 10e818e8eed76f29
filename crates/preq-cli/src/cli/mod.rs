//! CLI for preq.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use preq_core::config;
use preq_core::manager::{ManagerRegistry, QueueSettings};
use std::path::{Path, PathBuf};

use commands::{
    run_export_har, run_import_har, run_list, run_remove, run_replay, run_reset, run_send,
    run_show,
};

/// Top-level CLI for preq.
#[derive(Debug, Parser)]
#[command(name = "preq")]
#[command(about = "preq: persist in-flight HTTP requests and replay them after a restart", long_about = None)]
pub struct Cli {
    /// Store file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send a request; it stays queued until a 2xx response arrives.
    Send(SendArgs),

    /// List queued requests.
    List,

    /// Print the stored record of a queued request.
    Show {
        /// Request identifier.
        id: String,
    },

    /// Send queued requests again, removing each one that succeeds.
    Replay {
        /// Request identifier.
        #[arg(required_unless_present = "all")]
        id: Option<String>,

        /// Replay every queued request, oldest first.
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },

    /// Drop a queued request without sending it.
    Remove {
        /// Request identifier.
        id: String,
    },

    /// Drop every queued request.
    Reset,

    /// Write the queue as a HAR 1.2 log.
    ExportHar {
        /// Output file (stdout if omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Queue the requests of a HAR file without sending them.
    ImportHar {
        /// Path to the HAR file.
        path: String,
    },
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS).
    pub method: String,

    /// Absolute URL, or a path relative to the configured base URL.
    pub url: String,

    /// Request header, repeatable.
    #[arg(short = 'H', long = "header", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub headers: Vec<(String, String)>,

    /// JSON body.
    #[arg(long, conflicts_with_all = ["data", "form", "file"])]
    pub json: Option<String>,

    /// Raw text body, sent as is.
    #[arg(short = 'd', long, conflicts_with_all = ["form", "file"])]
    pub data: Option<String>,

    /// Multipart text field, repeatable.
    #[arg(long, value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub form: Vec<(String, String)>,

    /// Multipart file field read from disk, repeatable.
    #[arg(long, value_name = "NAME=PATH", value_parser = parse_key_val)]
    pub file: Vec<(String, String)>,
}

/// `NAME=VALUE`; the value may itself contain `=`.
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    if name.is_empty() {
        return Err(format!("empty name in '{s}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let mut settings = QueueSettings::from_config(&cfg)?;
        // Every command works on the stored queue.
        settings.load_from_store = true;
        if let Some(store) = cli.store {
            settings.store_path = Some(store);
        }

        let mut registry = ManagerRegistry::new();
        let manager = registry.acquire(&settings).await?;

        match cli.command {
            CliCommand::Send(args) => {
                run_send(manager, &mut registry, &settings, &args).await?;
            }
            CliCommand::List => run_list(&manager).await?,
            CliCommand::Show { id } => run_show(&manager, &id).await?,
            CliCommand::Replay { id, all } => {
                run_replay(&manager, &settings, id.as_deref(), all).await?;
            }
            CliCommand::Remove { id } => run_remove(&manager, &id).await?,
            CliCommand::Reset => run_reset(&manager).await?,
            CliCommand::ExportHar { output } => run_export_har(&manager, output.as_deref()).await?,
            CliCommand::ImportHar { path } => {
                run_import_har(&manager, &settings, Path::new(&path)).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
