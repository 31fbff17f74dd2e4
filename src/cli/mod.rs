//! CLI module for Prompt Gateway
//!
//! Subcommands:
//! - `serve`: HTTP server exposing `/prompt`, `/chat` and `/ama`
//! - `ask`: run one prompt through the gateway and print the answer

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Prompt Gateway - forwards prompts to a chat-completion provider
#[derive(Parser)]
#[command(name = "prompt-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(long, short, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Send one prompt and print the answers
    Ask(ask::AskArgs),
}

/// Load `.env`, the layered configuration and the global subscriber
pub(crate) fn bootstrap(config_file: Option<&str>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_with(config_file)?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
