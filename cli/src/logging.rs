// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Logging setup
//!
//! Precedence: RUST_LOG, then the CLI flags, then
//! `spec.observability.logging`, then `info` / `text`.

use anyhow::{Context, Result};

use listing_genius_core::domain::service_config::LoggingConfig;

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_FORMAT: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: String,
}

pub fn resolve_settings(
    level_flag: Option<String>,
    format_flag: Option<String>,
    config: Option<&LoggingConfig>,
) -> LogSettings {
    LogSettings {
        level: level_flag
            .or_else(|| config.map(|c| c.level.clone()))
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
        format: format_flag
            .or_else(|| config.map(|c| c.format.clone()))
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
    }
}

/// Initialize tracing subscriber for logging
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&settings.level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match settings.format.as_str() {
        "json" => builder.json().init(),
        "text" => builder.compact().init(),
        other => anyhow::bail!("Unknown log format '{}'. Use 'text' or 'json'", other),
    }

    Ok(())
}
