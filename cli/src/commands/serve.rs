// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `serve` command

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::embedded::EmbeddedServices;
use crate::server;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides spec.server.bind_address)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// HTTP port (overrides spec.server.port and PORT)
    #[arg(long, value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut services = EmbeddedServices::new(config_path)?;

    if let Some(host) = args.host {
        services.config.spec.server.bind_address = host;
    }
    if let Some(port) = args.port {
        services.config.spec.server.port = port;
    }

    info!("Starting ListingGenius server");
    server::start_server(services).await
}
