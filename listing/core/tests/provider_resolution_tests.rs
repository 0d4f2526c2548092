// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use listing_genius_core::application::listing_service::{ListingService, StandardListingService};
use listing_genius_core::domain::listing::{GenerationRequest, TranslationRequest};
use listing_genius_core::domain::llm::{ErrorKind, LLMError, ProviderKind};
use listing_genius_core::domain::service_config::ServiceConfigManifest;
use listing_genius_core::infrastructure::llm::{GeminiAdapter, KimiAdapter, OpenAIAdapter};
use listing_genius_core::infrastructure::{HttpImageFetcher, ProviderRegistry};
use serde_json::json;
use std::sync::Arc;

fn service(registry: ProviderRegistry) -> StandardListingService {
    StandardListingService::new(Arc::new(registry), Arc::new(HttpImageFetcher::new()))
}

#[tokio::test]
async fn test_unknown_provider_override_is_unsupported() {
    let registry = ProviderRegistry::new(ProviderKind::OpenAI)
        .with_provider(Arc::new(OpenAIAdapter::new("sk-test")));

    let err = service(registry)
        .generate(GenerationRequest::new("Mug").with_provider("unknown"))
        .await
        .unwrap_err();

    assert_eq!(err, LLMError::UnsupportedProvider("unknown".to_string()));
}

#[tokio::test]
async fn test_no_override_uses_configured_default() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-3-pro-preview:generateContent")
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{ "content": { "parts": [{
                    "text": "{\"bullet_points\":[\"a\",\"b\",\"c\",\"d\",\"e\"],\"language\":\"de-DE\"}"
                }] } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let registry = ProviderRegistry::new(ProviderKind::Gemini)
        .with_provider(Arc::new(OpenAIAdapter::new("sk-test").with_endpoint("http://127.0.0.1:9")))
        .with_provider(Arc::new(GeminiAdapter::new("g-key").with_endpoint(server.url())));

    let result = service(registry)
        .generate(GenerationRequest::new("Schreibtischlampe"))
        .await
        .unwrap();

    assert_eq!(result.provider, ProviderKind::Gemini);
    assert_eq!(result.language_code, "de-DE");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_credential_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let completions = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;
    let image = server
        .mock("GET", "/lamp.jpg")
        .expect(0)
        .create_async()
        .await;

    let registry = ProviderRegistry::new(ProviderKind::Kimi).with_provider(Arc::new(
        KimiAdapter::new("").with_endpoint(format!("{}/chat/completions", server.url())),
    ));

    let err = service(registry)
        .generate(
            GenerationRequest::new("Desk lamp")
                .with_image_url(format!("{}/lamp.jpg", server.url())),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LLMError::CredentialMissing {
            provider: ProviderKind::Kimi,
            env_var: "KIMI_API_KEY"
        }
    );
    completions.assert_async().await;
    image.assert_async().await;
}

#[tokio::test]
async fn test_translation_round_trip_through_openai_adapter() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            json!({
                "choices": [{ "message": {
                    "content": "{\"translated_array\":[\"Lampe\",\"Tasse\"]}"
                } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let registry = ProviderRegistry::new(ProviderKind::OpenAI)
        .with_provider(Arc::new(OpenAIAdapter::new("sk-test").with_endpoint(server.url())));

    let result = service(registry)
        .translate(TranslationRequest::new(
            vec!["Lamp".to_string(), "Mug".to_string()],
            "de-DE",
        ))
        .await
        .unwrap();

    assert_eq!(result.translated_items, vec!["Lampe", "Tasse"]);
    assert_eq!(result.provider, ProviderKind::OpenAI);
}

#[test]
fn test_registry_from_config_honours_disabled_backends() {
    let manifest = ServiceConfigManifest::from_yaml_str(
        r#"
apiVersion: listinggenius/v1
kind: ServiceConfig
metadata:
  name: test
spec:
  llm_selection:
    default_provider: kimi
  providers:
    openai:
      enabled: false
"#,
    )
    .unwrap();

    let registry = ProviderRegistry::from_config(&manifest);
    assert_eq!(registry.registered(), vec![ProviderKind::Gemini, ProviderKind::Kimi]);
    assert_eq!(registry.default_provider(), ProviderKind::Kimi);
    assert_eq!(
        registry.resolve(Some("openai")).err().map(|e| e.kind()),
        Some(ErrorKind::UnsupportedProvider)
    );
}

#[tokio::test]
async fn test_non_ascii_inline_image_is_forwarded_without_panicking() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::Regex("data:image/jpeg;base64,abc".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{ "message": {
                    "content": "{\"bullet_points\":[\"a\",\"b\",\"c\",\"d\",\"e\"]}"
                } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let registry = ProviderRegistry::new(ProviderKind::OpenAI)
        .with_provider(Arc::new(OpenAIAdapter::new("sk-test").with_endpoint(server.url())));

    let result = service(registry)
        .generate(GenerationRequest::new("Mug").with_image_inline("abcé"))
        .await
        .unwrap();

    assert_eq!(result.bullet_points.len(), 5);
    mock.assert_async().await;
}
