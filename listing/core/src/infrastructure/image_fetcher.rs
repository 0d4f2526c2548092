// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Product Image Fetcher
//
// Materializes an image URL into base64 so adapters only ever see inline
// image data.

use crate::domain::llm::LLMError;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download `url` and return its body base64-encoded.
    async fn fetch_base64(&self, url: &str) -> Result<String, LLMError>;
}

pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, LLMError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LLMError::ImageFetch(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_base64(&self, url: &str) -> Result<String, LLMError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| LLMError::ImageFetch(format!("invalid image URL '{}': {}", url, e)))?;

        let response = self
            .client
            .get(parsed.as_str())
            .send()
            .await
            .map_err(|e| LLMError::ImageFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LLMError::ImageFetch(format!(
                "image download failed with status {}",
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LLMError::ImageFetch(e.to_string()))?;

        tracing::debug!("Fetched product image ({} bytes) from {}", bytes.len(), url);

        Ok(base64::engine::general_purpose::STANDARD.encode(&bytes))
    }
}
