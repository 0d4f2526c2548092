// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP server
//!
//! Serves the listing API in the foreground until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use listing_genius_core::domain::service_config::ServiceConfigManifest;
use listing_genius_core::presentation::api;

use crate::embedded::EmbeddedServices;

pub async fn start_server(services: EmbeddedServices) -> Result<()> {
    let server = services.config.spec.server.clone();

    install_metrics_exporter(&services.config)?;

    let app = api::app(
        services.listing_service.clone(),
        services.registry.default_provider(),
        server.body_limit_bytes,
    );

    let addr = format!("{}:{}", server.bind_address, server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        "ListingGenius listening on {} (default provider: {})",
        addr,
        services.registry.default_provider()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutting down");

    Ok(())
}

fn install_metrics_exporter(config: &ServiceConfigManifest) -> Result<()> {
    let metrics = match config
        .spec
        .observability
        .as_ref()
        .and_then(|o| o.metrics.as_ref())
    {
        Some(metrics) if metrics.enabled => metrics,
        _ => return Ok(()),
    };

    let addr: SocketAddr = format!("{}:{}", config.spec.server.bind_address, metrics.port)
        .parse()
        .context("Invalid metrics listen address")?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Prometheus metrics exporter listening on {}", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
