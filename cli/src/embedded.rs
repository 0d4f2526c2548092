// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process service wiring
//!
//! Builds the registry and listing service from configuration. Every command
//! and the HTTP server run against this stack.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use listing_genius_core::{
    application::listing_service::{ListingService, StandardListingService},
    domain::service_config::ServiceConfigManifest,
    infrastructure::{HttpImageFetcher, ProviderRegistry},
};

const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct EmbeddedServices {
    pub config: ServiceConfigManifest,
    pub registry: Arc<ProviderRegistry>,
    pub listing_service: Arc<dyn ListingService>,
}

impl EmbeddedServices {
    /// Load, override and validate configuration, then build services
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = ServiceConfigManifest::load_or_default(config_path)
            .context("Failed to load configuration")?;

        config
            .validate()
            .context("Configuration validation failed")?;

        Self::from_config(config)
    }

    pub fn from_config(config: ServiceConfigManifest) -> Result<Self> {
        let registry = Arc::new(ProviderRegistry::from_config(&config));
        let image_fetcher = Arc::new(
            HttpImageFetcher::with_timeout(IMAGE_FETCH_TIMEOUT)
                .context("Failed to initialize image fetcher")?,
        );

        let listing_service: Arc<dyn ListingService> = Arc::new(StandardListingService::new(
            registry.clone(),
            image_fetcher,
        ));

        Ok(Self {
            config,
            registry,
            listing_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing_genius_core::domain::llm::ProviderKind;

    #[test]
    fn test_from_config_uses_configured_default() {
        let mut config = ServiceConfigManifest::default();
        config.spec.llm_selection.default_provider = Some("kimi".to_string());

        let services = EmbeddedServices::from_config(config).unwrap();
        assert_eq!(services.registry.default_provider(), ProviderKind::Kimi);
        assert_eq!(services.registry.registered().len(), 3);
    }

    #[test]
    fn test_invalid_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "apiVersion: wrong/v0\nkind: ServiceConfig\nmetadata:\n  name: x\n").unwrap();

        assert!(EmbeddedServices::new(Some(path)).is_err());
    }
}
