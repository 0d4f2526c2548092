// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenAI LLM Provider Adapter
//
// Anti-Corruption Layer for the OpenAI chat completions API.
// Vision input is sent as a data URI image part next to the title text.

use super::chat_completions::{
    self, ChatCompletionRequest, ChatMessage, ContentPart, ImageUrl, MessageContent,
    ResponseFormat,
};
use super::{http, sniff_image_mime};
use crate::domain::listing::TargetPlatform;
use crate::domain::llm::{LLMError, ListingProvider, ProviderKind};
use crate::domain::service_config::ProviderConfig;
use crate::infrastructure::prompt_builder;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::OnceCell;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TRANSLATION_MODEL: &str = "gpt-5.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const TEMPERATURE: f32 = 0.6;

pub struct OpenAIAdapter {
    /// Built on first use, after the credential check passes
    client: OnceCell<reqwest::Client>,
    endpoint: String,
    api_key: String,
    model: String,
    translation_model: String,
    timeout: Duration,
}

impl OpenAIAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OnceCell::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            translation_model: DEFAULT_TRANSLATION_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut adapter = Self::new(config.resolved_api_key());
        if let Some(endpoint) = &config.endpoint {
            adapter.endpoint = endpoint.clone();
        }
        if let Some(model) = &config.model {
            adapter.model = model.clone();
        }
        if let Some(model) = &config.translation_model {
            adapter.translation_model = model.clone();
        }
        if let Some(secs) = config.timeout_secs {
            adapter.timeout = Duration::from_secs(secs);
        }
        adapter
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn client(&self) -> Result<&reqwest::Client, LLMError> {
        self.check_credentials()?;
        self.client
            .get_or_try_init(|| async { http::build_client(Some(self.timeout)) })
            .await
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl ListingProvider for OpenAIAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    fn check_credentials(&self) -> Result<(), LLMError> {
        if self.api_key.trim().is_empty() {
            return Err(LLMError::CredentialMissing {
                provider: ProviderKind::OpenAI,
                env_var: ProviderKind::OpenAI.credential_env_var(),
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
        let client = self.client().await?;

        let mut parts = vec![ContentPart::Text {
            text: prompt_builder::product_title_line(title),
        }];
        if let Some(image) = image_base64 {
            parts.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{};base64,{}", sniff_image_mime(image), image),
                    detail: "high",
                },
            });
        }

        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            response_format: ResponseFormat::json_object(),
            messages: vec![
                ChatMessage::system(prompt_builder::build_generation_prompt(platform)),
                ChatMessage::user(MessageContent::Parts(parts)),
            ],
        };

        tracing::debug!(model = %self.model, with_image = image_base64.is_some(), "OpenAI generate");
        chat_completions::complete(client, &self.url(), &self.api_key, &request).await
    }

    async fn translate(&self, items: &[String], target_language: &str) -> Result<String, LLMError> {
        let client = self.client().await?;

        let request = ChatCompletionRequest {
            model: &self.translation_model,
            temperature: TEMPERATURE,
            response_format: ResponseFormat::json_object(),
            messages: vec![
                ChatMessage::system(prompt_builder::build_translation_prompt(target_language)),
                ChatMessage::user(MessageContent::Text(prompt_builder::translation_payload(items))),
            ],
        };

        tracing::debug!(model = %self.translation_model, items = items.len(), "OpenAI translate");
        chat_completions::complete(client, &self.url(), &self.api_key, &request).await
    }
}
