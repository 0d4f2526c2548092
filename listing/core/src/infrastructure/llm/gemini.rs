// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Google Gemini LLM Provider Adapter
//
// Anti-Corruption Layer for the Gemini generateContent API.
// Model ids collapse to two tiers; anything unrecognized uses the default.

use super::{http, sniff_image_mime};
use crate::domain::listing::TargetPlatform;
use crate::domain::llm::{LLMError, ListingProvider, ProviderKind};
use crate::domain::service_config::ProviderConfig;
use crate::infrastructure::prompt_builder;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL_ID: &str = "gemini-3-pro-preview";
pub const FLASH_MODEL_ID: &str = "gemini-3-flash-preview";

const GENERATION_TEMPERATURE: f32 = 0.6;
const TRANSLATION_TEMPERATURE: f32 = 0.3;

/// Map a configured model id onto a supported tier.
pub fn resolve_model_id(requested: Option<&str>) -> &'static str {
    match requested.map(str::trim) {
        Some(FLASH_MODEL_ID) => FLASH_MODEL_ID,
        _ => DEFAULT_MODEL_ID,
    }
}

/// Per-model call target, built once and shared across calls.
#[derive(Debug)]
pub struct GeminiModelHandle {
    pub model_id: &'static str,
    url: String,
}

pub struct GeminiAdapter {
    client: OnceCell<reqwest::Client>,
    models: DashMap<&'static str, Arc<GeminiModelHandle>>,
    endpoint: String,
    api_key: String,
    model: Option<String>,
    translation_model: Option<String>,
    timeout: Option<Duration>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OnceCell::new(),
            models: DashMap::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: None,
            translation_model: None,
            timeout: None,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut adapter = Self::new(config.resolved_api_key());
        if let Some(endpoint) = &config.endpoint {
            adapter.endpoint = endpoint.clone();
        }
        adapter.model = config.model.clone();
        adapter.translation_model = config.translation_model.clone();
        adapter.timeout = config.timeout_secs.map(Duration::from_secs);
        adapter
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    async fn client(&self) -> Result<&reqwest::Client, LLMError> {
        self.check_credentials()?;
        self.client
            .get_or_try_init(|| async { http::build_client(self.timeout) })
            .await
    }

    /// Handle for the resolved model, created on first use.
    pub fn model_handle(&self, requested: Option<&str>) -> Arc<GeminiModelHandle> {
        let model_id = resolve_model_id(requested);
        self.models
            .entry(model_id)
            .or_insert_with(|| {
                tracing::debug!(model = model_id, "Creating Gemini model handle");
                Arc::new(GeminiModelHandle {
                    model_id,
                    url: format!(
                        "{}/models/{}:generateContent",
                        self.endpoint.trim_end_matches('/'),
                        model_id
                    ),
                })
            })
            .value()
            .clone()
    }

    pub fn cached_models(&self) -> usize {
        self.models.len()
    }

    async fn generate_content(
        &self,
        model: Option<&str>,
        request: &GenerateContentRequest,
    ) -> Result<String, LLMError> {
        let client = self.client().await?;
        let handle = self.model_handle(model);

        let builder = client
            .post(&handle.url)
            .header("x-goog-api-key", &self.api_key);

        let response: GenerateContentResponse = http::send_json(builder, request).await?;
        Ok(response.into_text())
    }
}

fn text(value: impl Into<String>) -> Part {
    Part::Text { text: value.into() }
}

fn json_config(temperature: f32) -> GenerationConfig {
    GenerationConfig {
        temperature,
        response_mime_type: "application/json",
    }
}

#[async_trait]
impl ListingProvider for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn check_credentials(&self) -> Result<(), LLMError> {
        if self.api_key.trim().is_empty() {
            return Err(LLMError::CredentialMissing {
                provider: ProviderKind::Gemini,
                env_var: ProviderKind::Gemini.credential_env_var(),
            });
        }
        Ok(())
    }

    async fn generate(
        &self,
        title: Option<&str>,
        image_base64: Option<&str>,
        platform: TargetPlatform,
    ) -> Result<String, LLMError> {
        let mut parts = vec![text(prompt_builder::product_title_line(title))];
        if let Some(image) = image_base64 {
            parts.push(text("Product image:"));
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: sniff_image_mime(image),
                    data: image.to_string(),
                },
            });
        }

        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![text(prompt_builder::build_generation_prompt(platform))],
            },
            contents: vec![Content {
                role: Some("user"),
                parts,
            }],
            generation_config: json_config(GENERATION_TEMPERATURE),
        };

        self.generate_content(self.model.as_deref(), &request).await
    }

    async fn translate(&self, items: &[String], target_language: &str) -> Result<String, LLMError> {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![text(prompt_builder::build_translation_prompt(target_language))],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![text(prompt_builder::translation_payload(items))],
            }],
            generation_config: json_config(TRANSLATION_TEMPERATURE),
        };

        let model = self.translation_model.as_deref().or(self.model.as_deref());
        self.generate_content(model, &request).await
    }
}
