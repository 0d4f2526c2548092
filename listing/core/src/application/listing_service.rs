// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Listing Service Use Case
//!
//! Operation orchestrator for a single generate or translate call.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Wire Registry → Adapter → Normalizer and report a
//!   uniform result or a uniform typed error
//! - **Collaborators:**
//!   - Domain: request/result value objects, `ListingProvider`
//!   - Infrastructure: ProviderRegistry, ImageFetcher, normalizer
//!
//! # Flow (generate)
//!
//! 1. Resolve the provider (explicit name, else configured default)
//! 2. Check the provider's credential before any network call
//! 3. Materialize the image: inline data as-is, else fetch the URL
//! 4. Invoke the adapter and normalize its raw text
//! 5. Tag the result with the resolved provider
//!
//! Calls are single-shot. Any failure surfaces immediately; nothing is retried.

use crate::domain::listing::{
    GenerationRequest, GenerationResult, ImageSource, TranslationRequest, TranslationResult,
};
use crate::domain::llm::{LLMError, ListingProvider, ProviderKind};
use crate::infrastructure::image_fetcher::ImageFetcher;
use crate::infrastructure::llm::ProviderRegistry;
use crate::infrastructure::normalizer::{normalize_generation, normalize_translation};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Listing operations use case
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Generate bullet points for one product
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, LLMError>;

    /// Translate an ordered list of listing strings
    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResult, LLMError>;
}

/// Standard implementation of ListingService
pub struct StandardListingService {
    registry: Arc<ProviderRegistry>,
    image_fetcher: Arc<dyn ImageFetcher>,
}

impl StandardListingService {
    pub fn new(registry: Arc<ProviderRegistry>, image_fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            registry,
            image_fetcher,
        }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    async fn run_generation(
        &self,
        provider: &dyn ListingProvider,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, LLMError> {
        provider.check_credentials()?;

        let image = match request.image_source() {
            Some(ImageSource::Inline(data)) => Some(data.to_string()),
            Some(ImageSource::Url(url)) => Some(self.image_fetcher.fetch_base64(url).await?),
            None => None,
        };

        let raw = provider
            .generate(request.title(), image.as_deref(), request.target_platform)
            .await?;

        Ok(normalize_generation(&raw)?.into_result(provider.kind()))
    }

    async fn run_translation(
        &self,
        provider: &dyn ListingProvider,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, LLMError> {
        provider.check_credentials()?;

        let raw = provider
            .translate(&request.source_items, &request.target_language_code)
            .await?;

        Ok(normalize_translation(&raw, request.source_items.len())?.into_result(provider.kind()))
    }
}

fn record_outcome<T>(operation: &'static str, provider: Option<ProviderKind>, result: &Result<T, LLMError>) {
    let provider_label = provider.map(|kind| kind.as_str()).unwrap_or("unresolved");
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    };

    metrics::counter!(
        "listing_operations_total",
        "operation" => operation,
        "provider" => provider_label,
        "outcome" => outcome
    )
    .increment(1);

    if let Err(e) = result {
        warn!(operation, provider = provider_label, kind = %e.kind(), "Listing operation failed: {}", e);
    }
}

#[async_trait]
impl ListingService for StandardListingService {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, LLMError> {
        let provider = match self.registry.resolve(request.provider_override.as_deref()) {
            Ok(provider) => provider,
            Err(e) => {
                record_outcome::<()>("generate", None, &Err(e.clone()));
                return Err(e);
            }
        };
        let kind = provider.kind();

        info!(
            provider = %kind,
            platform = %request.target_platform,
            has_title = request.title().is_some(),
            has_image = request.image_source().is_some(),
            "Generating listing bullet points"
        );

        let result = self.run_generation(provider.as_ref(), &request).await;
        record_outcome("generate", Some(kind), &result);

        if let Ok(generated) = &result {
            info!(
                provider = %kind,
                bullets = generated.bullet_points.len(),
                language = %generated.language_code,
                "Generation succeeded"
            );
        }
        result
    }

    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResult, LLMError> {
        let provider = match self.registry.resolve(request.provider_override.as_deref()) {
            Ok(provider) => provider,
            Err(e) => {
                record_outcome::<()>("translate", None, &Err(e.clone()));
                return Err(e);
            }
        };
        let kind = provider.kind();

        info!(
            provider = %kind,
            items = request.source_items.len(),
            target_language = %request.target_language_code,
            "Translating listing copy"
        );

        let result = self.run_translation(provider.as_ref(), &request).await;
        record_outcome("translate", Some(kind), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::TargetPlatform;
    use crate::domain::llm::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const FIVE_POINTS: &str =
        r#"{"bullet_points":["one","two","three","four","five"],"language":"en-GB"}"#;

    /// Records what the orchestrator forwarded to the backend.
    struct ScriptedProvider {
        kind: ProviderKind,
        has_key: bool,
        reply: Result<String, LLMError>,
        seen_image: Mutex<Option<Option<String>>>,
    }

    impl ScriptedProvider {
        fn new(kind: ProviderKind, reply: Result<&str, LLMError>) -> Self {
            Self {
                kind,
                has_key: true,
                reply: reply.map(str::to_string),
                seen_image: Mutex::new(None),
            }
        }

        fn without_key(mut self) -> Self {
            self.has_key = false;
            self
        }
    }

    #[async_trait]
    impl ListingProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn check_credentials(&self) -> Result<(), LLMError> {
            if self.has_key {
                Ok(())
            } else {
                Err(LLMError::CredentialMissing {
                    provider: self.kind,
                    env_var: self.kind.credential_env_var(),
                })
            }
        }

        async fn generate(
            &self,
            _title: Option<&str>,
            image_base64: Option<&str>,
            _platform: TargetPlatform,
        ) -> Result<String, LLMError> {
            *self.seen_image.lock().unwrap() = Some(image_base64.map(str::to_string));
            self.reply.clone()
        }

        async fn translate(&self, _items: &[String], _target: &str) -> Result<String, LLMError> {
            self.reply.clone()
        }
    }

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageFetcher for CountingFetcher {
        async fn fetch_base64(&self, _url: &str) -> Result<String, LLMError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("ZmV0Y2hlZA==".to_string())
        }
    }

    fn service(provider: Arc<ScriptedProvider>) -> (StandardListingService, Arc<CountingFetcher>) {
        let registry = ProviderRegistry::new(ProviderKind::OpenAI).with_provider(provider);
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
        });
        (
            StandardListingService::new(Arc::new(registry), fetcher.clone()),
            fetcher,
        )
    }

    #[tokio::test]
    async fn test_generate_tags_result_with_provider() {
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::OpenAI, Ok(FIVE_POINTS)));
        let (service, _) = service(provider);

        let result = service.generate(GenerationRequest::new("Mug")).await.unwrap();
        assert_eq!(result.provider, ProviderKind::OpenAI);
        assert_eq!(result.bullet_points.len(), 5);
        assert_eq!(result.language_code, "en-GB");
    }

    #[tokio::test]
    async fn test_url_is_fetched_only_without_inline_data() {
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::OpenAI, Ok(FIVE_POINTS)));
        let (service, fetcher) = service(provider.clone());

        service
            .generate(GenerationRequest::new("Mug").with_image_url("https://cdn.example.com/a.jpg"))
            .await
            .unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *provider.seen_image.lock().unwrap(),
            Some(Some("ZmV0Y2hlZA==".to_string()))
        );

        service
            .generate(
                GenerationRequest::new("Mug")
                    .with_image_url("https://cdn.example.com/a.jpg")
                    .with_image_inline("aW5saW5l"),
            )
            .await
            .unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *provider.seen_image.lock().unwrap(),
            Some(Some("aW5saW5l".to_string()))
        );
    }

    #[tokio::test]
    async fn test_missing_credential_stops_before_image_fetch() {
        let provider =
            Arc::new(ScriptedProvider::new(ProviderKind::OpenAI, Ok(FIVE_POINTS)).without_key());
        let (service, fetcher) = service(provider.clone());

        let err = service
            .generate(GenerationRequest::new("Mug").with_image_url("https://cdn.example.com/a.jpg"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(provider.seen_image.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_schema_violation_is_surfaced_not_masked() {
        let provider = Arc::new(ScriptedProvider::new(
            ProviderKind::OpenAI,
            Ok(r#"{"bullet_points":["a","b","c","d"]}"#),
        ));
        let (service, _) = service(provider);

        let err = service.generate(GenerationRequest::new("Mug")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[tokio::test]
    async fn test_empty_backend_text_is_parse_error() {
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::OpenAI, Ok("")));
        let (service, _) = service(provider);

        let err = service.generate(GenerationRequest::new("Mug")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_unregistered_override_is_unsupported() {
        let provider = Arc::new(ScriptedProvider::new(ProviderKind::OpenAI, Ok(FIVE_POINTS)));
        let (service, _) = service(provider);

        let err = service
            .generate(GenerationRequest::new("Mug").with_provider("gemini"))
            .await
            .unwrap_err();
        assert_eq!(err, LLMError::UnsupportedProvider("gemini".to_string()));
    }

    #[tokio::test]
    async fn test_translate_enforces_length() {
        let provider = Arc::new(ScriptedProvider::new(
            ProviderKind::OpenAI,
            Ok(r#"{"translated_array":["Hallo"]}"#),
        ));
        let (service, _) = service(provider);

        let ok = service
            .translate(TranslationRequest::new(vec!["Hello".to_string()], "de-DE"))
            .await
            .unwrap();
        assert_eq!(ok.translated_items, vec!["Hallo"]);

        let err = service
            .translate(TranslationRequest::new(
                vec!["Hello".to_string(), "World".to_string()],
                "de-DE",
            ))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}
