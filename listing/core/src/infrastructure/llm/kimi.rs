// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Kimi (Moonshot) LLM Provider Adapter
//
// Text-only backend on the chat completions dialect. The endpoint is the full
// completions URL, not a base URL.

use super::chat_completions::{
    self, ChatCompletionRequest, ChatMessage, MessageContent, ResponseFormat,
};
use super::http;
use crate::domain::listing::TargetPlatform;
use crate::domain::llm::{LLMError, ListingProvider, ProviderKind};
use crate::domain::service_config::ProviderConfig;
use crate::infrastructure::prompt_builder::{self, IMAGE_NOT_SUPPORTED_NOTE};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::OnceCell;

pub const DEFAULT_ENDPOINT: &str = "https://api.moonshot.cn/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "kimi-k2-turbo-preview";

const GENERATION_TEMPERATURE: f32 = 0.6;
const TRANSLATION_TEMPERATURE: f32 = 0.3;

pub struct KimiAdapter {
    client: OnceCell<reqwest::Client>,
    endpoint: String,
    api_key: String,
    model: String,
    translation_model: Option<String>,
    timeout: Option<Duration>,
}

impl KimiAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OnceCell::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            translation_model: None,
            timeout: None,
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
        adapter.translation_model = config.translation_model.clone();
        adapter.timeout = config.timeout_secs.map(Duration::from_secs);
        adapter
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn client(&self) -> Result<&reqwest::Client, LLMError> {
        self.check_credentials()?;
        self.client
            .get_or_try_init(|| async { http::build_client(self.timeout) })
            .await
    }
}

/// User message for generation. Images cannot be forwarded, so their presence
/// is stated in text instead.
fn generation_user_text(title: Option<&str>, has_image: bool) -> String {
    let title_line = prompt_builder::product_title_line(title);
    if has_image {
        format!("{}\n{}", title_line, IMAGE_NOT_SUPPORTED_NOTE)
    } else {
        title_line
    }
}

#[async_trait]
impl ListingProvider for KimiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kimi
    }

    fn check_credentials(&self) -> Result<(), LLMError> {
        if self.api_key.trim().is_empty() {
            return Err(LLMError::CredentialMissing {
                provider: ProviderKind::Kimi,
                env_var: ProviderKind::Kimi.credential_env_var(),
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

        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: GENERATION_TEMPERATURE,
            response_format: ResponseFormat::json_object(),
            messages: vec![
                ChatMessage::system(prompt_builder::build_generation_prompt(platform)),
                ChatMessage::user(MessageContent::Text(generation_user_text(
                    title,
                    image_base64.is_some(),
                ))),
            ],
        };

        if image_base64.is_some() {
            tracing::debug!("Kimi cannot read images; sending title only");
        }
        chat_completions::complete(client, &self.endpoint, &self.api_key, &request).await
    }

    async fn translate(&self, items: &[String], target_language: &str) -> Result<String, LLMError> {
        let client = self.client().await?;

        let request = ChatCompletionRequest {
            model: self.translation_model.as_deref().unwrap_or(&self.model),
            temperature: TRANSLATION_TEMPERATURE,
            response_format: ResponseFormat::json_object(),
            messages: vec![
                ChatMessage::system(prompt_builder::build_translation_prompt(target_language)),
                ChatMessage::user(MessageContent::Text(prompt_builder::translation_payload(items))),
            ],
        };

        chat_completions::complete(client, &self.endpoint, &self.api_key, &request).await
    }
}
