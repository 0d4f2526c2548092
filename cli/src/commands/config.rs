// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use listing_genius_core::domain::llm::ProviderKind;
use listing_genius_core::domain::service_config::{ServiceConfigManifest, CONFIG_PATH_ENV};

const SAMPLE_CONFIG: &str = include_str!("../../templates/listing-genius.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./listing-genius.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output } => generate(output),
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", secret.chars().take(4).collect::<String>())
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ServiceConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        for path in ServiceConfigManifest::search_paths() {
            let marker = if path.exists() { "✓".green() } else { "-".dimmed() };
            println!("  {} {}", marker, path.display());
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!(
        "  Server: {}:{} (body limit {} bytes)",
        config.spec.server.bind_address, config.spec.server.port, config.spec.server.body_limit_bytes
    );
    println!();

    println!("{}", "Providers:".bold());
    let default_provider = config.default_provider();
    for kind in ProviderKind::ALL {
        let provider = config.spec.providers.get(kind);
        let label = if kind == default_provider {
            format!("{} (default)", kind).bold()
        } else {
            kind.to_string().bold()
        };
        let state = if provider.enabled {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };

        println!("  {} [{}]", label, state);
        println!("    API key: {}", mask(&provider.resolved_api_key()));
        if let Some(endpoint) = &provider.endpoint {
            println!("    Endpoint: {}", endpoint);
        }
        if let Some(model) = &provider.model {
            println!("    Model: {}", model);
        }
        if let Some(model) = &provider.translation_model {
            println!("    Translation model: {}", model);
        }
    }
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ServiceConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf) -> Result<()> {
    std::fs::write(&output, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
