// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Provider Name Resolution
//
// Holds one adapter per enabled backend and resolves a per-call provider
// name (or the configured default) to that adapter.

use crate::domain::llm::{LLMError, ListingProvider, ProviderKind};
use crate::domain::service_config::ServiceConfigManifest;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::gemini::GeminiAdapter;
use super::kimi::KimiAdapter;
use super::openai::OpenAIAdapter;

/// Registry for managing listing providers
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn ListingProvider>>,
    default_provider: ProviderKind,
}

impl ProviderRegistry {
    /// Empty registry; adapters are added with [`ProviderRegistry::register`].
    pub fn new(default_provider: ProviderKind) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider,
        }
    }

    /// Create provider registry from service configuration
    pub fn from_config(config: &ServiceConfigManifest) -> Self {
        let mut registry = Self::new(config.default_provider());

        info!("Initializing listing provider registry");

        for kind in ProviderKind::ALL {
            let provider_config = config.spec.providers.get(kind);
            if !provider_config.enabled {
                info!("Provider '{}' disabled, skipping", kind);
                continue;
            }

            if provider_config.resolved_api_key().is_empty() {
                warn!(
                    "Provider '{}' has no API key; calls will fail until {} is set",
                    kind,
                    kind.credential_env_var()
                );
            }

            let provider: Arc<dyn ListingProvider> = match kind {
                ProviderKind::OpenAI => Arc::new(OpenAIAdapter::from_config(provider_config)),
                ProviderKind::Gemini => Arc::new(GeminiAdapter::from_config(provider_config)),
                ProviderKind::Kimi => Arc::new(KimiAdapter::from_config(provider_config)),
            };
            registry.register(provider);
        }

        if !registry.providers.contains_key(&registry.default_provider) {
            warn!(
                "Default provider '{}' is not registered; requests without an explicit provider will fail",
                registry.default_provider
            );
        }

        info!(
            "Registered providers: {:?} (default: {})",
            registry.registered(),
            registry.default_provider
        );
        registry
    }

    /// Add or replace the adapter for its backend.
    pub fn register(&mut self, provider: Arc<dyn ListingProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    pub fn with_provider(mut self, provider: Arc<dyn ListingProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Resolve the adapter for a call.
    ///
    /// A non-blank `explicit` name wins over the configured default. Names
    /// that do not parse, or that name a backend with no registered adapter,
    /// fail with [`LLMError::UnsupportedProvider`].
    pub fn resolve(&self, explicit: Option<&str>) -> Result<Arc<dyn ListingProvider>, LLMError> {
        let kind = match explicit.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => name.parse::<ProviderKind>()?,
            None => self.default_provider,
        };

        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| LLMError::UnsupportedProvider(kind.to_string()))
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Registered backends in canonical order
    pub fn registered(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.contains_key(kind))
            .collect()
    }
}
