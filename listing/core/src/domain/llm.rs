// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Llm
//!
//! Provider contract for listing copy backends.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Anti-corruption layer between listing operations and vendor
//!   APIs. Adapters live in `infrastructure/llm/`.

// The set of backends is closed: every provider is a `ProviderKind` variant,
// so "unsupported provider" can only come from parsing an outside string.

use crate::domain::listing::TargetPlatform;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend used when neither the request nor the configuration names one.
pub const FALLBACK_PROVIDER: ProviderKind = ProviderKind::OpenAI;

/// Identity of a supported LLM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Gemini,
    Kimi,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [ProviderKind::OpenAI, ProviderKind::Gemini, ProviderKind::Kimi];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Kimi => "kimi",
        }
    }

    /// Environment variable that carries this backend's API key.
    pub fn credential_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GOOGLE_GEMINI_API_KEY",
            ProviderKind::Kimi => "KIMI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "gemini" => Ok(ProviderKind::Gemini),
            "kimi" => Ok(ProviderKind::Kimi),
            _ => Err(LLMError::UnsupportedProvider(key)),
        }
    }
}

/// Capability set every backend adapter implements.
///
/// Both operations return the backend's raw text output; parsing and schema
/// enforcement belong to the normalizer.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Which backend this adapter talks to
    fn kind(&self) -> ProviderKind;

    /// Fail with [`LLMError::CredentialMissing`] if the adapter cannot be used.
    /// Never touches the network.
    fn check_credentials(&self) -> Result<(), LLMError>;

    /// Ask the backend for bullet points.
    ///
    /// `image_base64` is forwarded inline when the backend accepts images;
    /// otherwise the adapter mentions the image in the prompt text.
    async fn generate(
        &self,
        title: Option<&str>,
        image_base64: Option<&str>,
        platform: TargetPlatform,
    ) -> Result<String, LLMError>;

    /// Ask the backend to translate `items` into `target_language`.
    async fn translate(&self, items: &[String], target_language: &str) -> Result<String, LLMError>;
}

/// Category of an [`LLMError`], used by batch records and the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CredentialMissing,
    UnsupportedProvider,
    Transport,
    Parse,
    Schema,
    ImageFetch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::CredentialMissing => "credential_missing",
            ErrorKind::UnsupportedProvider => "unsupported_provider",
            ErrorKind::Transport => "transport",
            ErrorKind::Parse => "parse",
            ErrorKind::Schema => "schema",
            ErrorKind::ImageFetch => "image_fetch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during listing operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LLMError {
    #[error("{provider} credential is not configured (set {env_var})")]
    CredentialMissing {
        provider: ProviderKind,
        env_var: &'static str,
    },

    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),

    #[error("{}", transport_message(.status, .body))]
    Transport { status: Option<u16>, body: String },

    #[error("Backend output is not valid JSON: {0}")]
    Parse(String),

    #[error("Backend output violates the listing schema: {0}")]
    Schema(String),

    #[error("Failed to fetch product image: {0}")]
    ImageFetch(String),
}

fn transport_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("Backend request failed: HTTP {} - {}", code, body),
        None => format!("Backend request failed: {}", body),
    }
}

impl LLMError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LLMError::CredentialMissing { .. } => ErrorKind::CredentialMissing,
            LLMError::UnsupportedProvider(_) => ErrorKind::UnsupportedProvider,
            LLMError::Transport { .. } => ErrorKind::Transport,
            LLMError::Parse(_) => ErrorKind::Parse,
            LLMError::Schema(_) => ErrorKind::Schema,
            LLMError::ImageFetch(_) => ErrorKind::ImageFetch,
        }
    }

    /// Whether the caller (rather than the backend or deployment) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnsupportedProvider | ErrorKind::Parse | ErrorKind::Schema
        )
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        LLMError::Transport {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}
