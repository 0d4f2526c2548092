// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Shared HTTP plumbing for provider adapters.

use crate::domain::llm::LLMError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub(super) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, LLMError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(LLMError::network)
}

/// Send `body` as JSON and decode the response envelope.
///
/// Non-2xx responses surface as `Transport` with the status and body text.
pub(super) async fn send_json<B, R>(request: reqwest::RequestBuilder, body: &B) -> Result<R, LLMError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(LLMError::network)?;

    let status = response.status();
    let text = response.text().await.map_err(LLMError::network)?;

    if !status.is_success() {
        return Err(LLMError::Transport {
            status: Some(status.as_u16()),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| LLMError::Transport {
        status: Some(status.as_u16()),
        body: format!("unexpected response envelope: {}", e),
    })
}
