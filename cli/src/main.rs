// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # ListingGenius CLI
//!
//! The `listing-genius` binary generates and translates product-listing copy
//! through one of several LLM backends.
//!
//! ## Commands
//!
//! - `listing-genius serve` - Run the HTTP API
//! - `listing-genius generate|translate` - Single operations from the terminal
//! - `listing-genius batch` - Generate a file of rows sequentially
//! - `listing-genius config show|validate|generate` - Configuration management

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use listing_genius::commands::{self, BatchArgs, ConfigCommand, GenerateArgs, ServeArgs, TranslateArgs};
use listing_genius::logging;
use listing_genius_core::domain::service_config::ServiceConfigManifest;

/// ListingGenius - marketplace listing copy from any LLM backend
#[derive(Parser)]
#[command(name = "listing-genius")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "LISTING_GENIUS_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) [default: config, else info]
    #[arg(long, global = true, env = "LISTING_GENIUS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (text, json) [default: config, else text]
    #[arg(long, global = true, env = "LISTING_GENIUS_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    #[command(name = "serve")]
    Serve(ServeArgs),

    /// Generate bullet points for one product
    #[command(name = "generate")]
    Generate(GenerateArgs),

    /// Translate listing copy
    #[command(name = "translate")]
    Translate(TranslateArgs),

    /// Generate listings for every row of a JSON file
    #[command(name = "batch")]
    Batch(BatchArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Config logging settings only fill in flags that were not given. Load
    // errors are reported again by the command itself.
    let logging_config = if cli.log_level.is_none() || cli.log_format.is_none() {
        ServiceConfigManifest::load_or_default(cli.config.clone())
            .ok()
            .and_then(|config| config.spec.observability)
            .and_then(|observability| observability.logging)
    } else {
        None
    };
    let settings = logging::resolve_settings(cli.log_level, cli.log_format, logging_config.as_ref());
    logging::init_logging(&settings)?;

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::execute(args, cli.config).await,
        Some(Commands::Generate(args)) => commands::listing::generate(args, cli.config).await,
        Some(Commands::Translate(args)) => commands::listing::translate(args, cli.config).await,
        Some(Commands::Batch(args)) => commands::batch::execute(args, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}
