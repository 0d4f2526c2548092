// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Listing
//!
//! Request and result types for the two listing operations.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Transient value objects created per call and never persisted
//!   by the core. Accepted results are persisted by the caller's draft store.

use crate::domain::llm::ProviderKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bullet points every generated listing must contain.
pub const BULLET_POINT_COUNT: usize = 5;

/// Language tag reported when a backend omits one.
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// Marketplace whose listing rules the generated copy must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetPlatform {
    #[default]
    Amazon,
    Ebay,
}

impl TargetPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Amazon => "AMAZON",
            TargetPlatform::Ebay => "EBAY",
        }
    }

    /// Lenient parse used for loosely-typed inputs such as batch rows.
    /// Unknown labels fall back to Amazon.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown target platform '{}', using AMAZON", label);
            TargetPlatform::Amazon
        })
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amazon" => Ok(TargetPlatform::Amazon),
            "ebay" => Ok(TargetPlatform::Ebay),
            other => Err(format!("unknown target platform: {}", other)),
        }
    }
}

/// Where the product image for a generation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Base64 image bytes supplied by the caller.
    Inline(&'a str),
    /// Absolute URL that must be fetched and encoded before the provider call.
    Url(&'a str),
}

/// Input of the generate operation.
///
/// At least one of title or image must be present. That is enforced by the
/// caller (HTTP layer, CLI), not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub product_title: Option<String>,
    pub image_url: Option<String>,
    /// Base64 image data
    pub image_inline: Option<String>,
    pub target_platform: TargetPlatform,
    /// Raw provider name; validated when the registry resolves it.
    pub provider_override: Option<String>,
}

impl GenerationRequest {
    pub fn new(product_title: impl Into<String>) -> Self {
        Self {
            product_title: Some(product_title.into()),
            ..Self::default()
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_image_inline(mut self, base64: impl Into<String>) -> Self {
        self.image_inline = Some(base64.into());
        self
    }

    pub fn with_platform(mut self, platform: TargetPlatform) -> Self {
        self.target_platform = platform;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider_override = Some(provider.into());
        self
    }

    /// Trimmed title, `None` when absent or blank.
    pub fn title(&self) -> Option<&str> {
        self.product_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Inline data always wins over a URL when both are supplied; the URL is
    /// then never fetched.
    pub fn image_source(&self) -> Option<ImageSource<'_>> {
        fn non_blank(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        if let Some(inline) = non_blank(&self.image_inline) {
            return Some(ImageSource::Inline(inline));
        }
        non_blank(&self.image_url).map(ImageSource::Url)
    }

    pub fn has_content(&self) -> bool {
        self.title().is_some() || self.image_source().is_some()
    }
}

/// Output of a successful generate operation.
///
/// `bullet_points` always holds exactly [`BULLET_POINT_COUNT`] non-empty
/// entries; otherwise the operation fails and no result exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub bullet_points: Vec<String>,
    pub language_code: String,
    pub provider: ProviderKind,
    /// Parsed backend JSON, kept for diagnostics
    pub raw_payload: serde_json::Value,
}

/// Input of the translate operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub source_items: Vec<String>,
    pub target_language_code: String,
    pub provider_override: Option<String>,
}

impl TranslationRequest {
    pub fn new(source_items: Vec<String>, target_language_code: impl Into<String>) -> Self {
        Self {
            source_items,
            target_language_code: target_language_code.into(),
            provider_override: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider_override = Some(provider.into());
        self
    }
}

/// Output of a successful translate operation. Same length and order as the
/// request's `source_items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_items: Vec<String>,
    pub provider: ProviderKind,
    pub raw_payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_image_wins_over_url() {
        let request = GenerationRequest::new("Desk lamp")
            .with_image_url("https://cdn.example.com/lamp.jpg")
            .with_image_inline("aGVsbG8=");

        assert_eq!(request.image_source(), Some(ImageSource::Inline("aGVsbG8=")));
    }

    #[test]
    fn test_blank_inline_falls_through_to_url() {
        let request = GenerationRequest::new("Desk lamp")
            .with_image_url("https://cdn.example.com/lamp.jpg")
            .with_image_inline("   ");

        assert_eq!(
            request.image_source(),
            Some(ImageSource::Url("https://cdn.example.com/lamp.jpg"))
        );
    }

    #[test]
    fn test_blank_image_fields_mean_no_image() {
        let request = GenerationRequest::new("Desk lamp")
            .with_image_url("  ")
            .with_image_inline("");
        assert_eq!(request.image_source(), None);

        let request = GenerationRequest::default().with_image_url(" https://cdn.example.com/l.jpg ");
        assert_eq!(
            request.image_source(),
            Some(ImageSource::Url("https://cdn.example.com/l.jpg"))
        );
    }

    #[test]
    fn test_title_is_trimmed_and_blank_is_none() {
        assert_eq!(GenerationRequest::new("  Mug  ").title(), Some("Mug"));
        assert_eq!(GenerationRequest::new("   ").title(), None);
        assert!(!GenerationRequest::new("").has_content());
        assert!(GenerationRequest::default()
            .with_image_inline("aGVsbG8=")
            .has_content());
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("AMAZON".parse::<TargetPlatform>(), Ok(TargetPlatform::Amazon));
        assert_eq!("ebay".parse::<TargetPlatform>(), Ok(TargetPlatform::Ebay));
        assert!("etsy".parse::<TargetPlatform>().is_err());
        assert_eq!(TargetPlatform::from_label("etsy"), TargetPlatform::Amazon);
        assert_eq!(TargetPlatform::from_label("Ebay"), TargetPlatform::Ebay);
    }

    #[test]
    fn test_platform_serde_uses_uppercase() {
        let json = serde_json::to_string(&TargetPlatform::Ebay).unwrap();
        assert_eq!(json, "\"EBAY\"");
        let parsed: TargetPlatform = serde_json::from_str("\"AMAZON\"").unwrap();
        assert_eq!(parsed, TargetPlatform::Amazon);
    }
}
