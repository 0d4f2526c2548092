// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Prompt Builder
//!
//! Instruction text for the generate and translate operations.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Pure, deterministic prompt construction shared by every
//!   provider adapter. No I/O.
//!
//! Both instructions demand a single bare JSON object so the normalizer can
//! parse the reply directly.

use crate::domain::listing::{TargetPlatform, BULLET_POINT_COUNT};

const AMAZON_GUIDANCE: &str = "Follow Amazon listing policy: the title carries the core \
keywords, the bullet points highlight selling points and specifications, avoid exaggerated \
or non-compliant claims, and keep the copy concise and searchable.";

const EBAY_GUIDANCE: &str = "Follow eBay listing policy: titles stay within 80 characters and \
lead with keywords and hard facts; write selling points in the active voice, avoid \
exaggeration, and never include contact details or external links.";

/// Appended to the user message by backends that cannot read images.
pub const IMAGE_NOT_SUPPORTED_NOTE: &str = "A product image was uploaded, but this model \
cannot read images. Write the copy from the title and general product knowledge.";

fn platform_guidance(platform: TargetPlatform) -> &'static str {
    match platform {
        TargetPlatform::Amazon => AMAZON_GUIDANCE,
        TargetPlatform::Ebay => EBAY_GUIDANCE,
    }
}

/// System instruction for bullet point generation.
pub fn build_generation_prompt(platform: TargetPlatform) -> String {
    [
        "You are a cross-border e-commerce copywriter who writes SEO-friendly Amazon and eBay listings.".to_string(),
        platform_guidance(platform).to_string(),
        "The input contains a product title and, optionally, a product image. Respond with strict JSON:".to_string(),
        "{".to_string(),
        "  \"bullet_points\": [\"Point1\", \"Point2\", \"Point3\", \"Point4\", \"Point5\"],".to_string(),
        "  \"language\": \"BCP-47 language code such as en-US or de-DE\"".to_string(),
        "}".to_string(),
        "Requirements:".to_string(),
        format!(
            "- bullet_points must contain exactly {} entries. Make each one detailed, focused on a selling point, and ready to publish.",
            BULLET_POINT_COUNT
        ),
        "- Use the image, when provided, to fill in hard facts such as material, size and use cases. Infer reasonably when facts are missing, but never invent them.".to_string(),
        "- Return only the JSON object text: no Markdown, no commentary, no extra quotes.".to_string(),
    ]
    .join("\n")
}

/// System instruction for translating an array of listing strings.
pub fn build_translation_prompt(target_language: &str) -> String {
    [
        "You are an e-commerce copy translator. Keep the marketing tone and the key facts accurate.".to_string(),
        format!(
            "Translate the input array into {} and respond with JSON:",
            target_language
        ),
        "{".to_string(),
        "  \"translated_array\": [\"...\"]".to_string(),
        "}".to_string(),
        "Requirements:".to_string(),
        "- Keep the array length and order unchanged; translate the text only.".to_string(),
        "- Do not add Markdown or commentary.".to_string(),
        "- Keep proper nouns and brand names; do not change numbers or units.".to_string(),
    ]
    .join("\n")
}

/// User-message line carrying the product title.
pub fn product_title_line(title: Option<&str>) -> String {
    format!("Product title: {}", title.unwrap_or("(not provided)"))
}

/// JSON user payload for translation requests: `{"content_array": [...]}`.
pub fn translation_payload(items: &[String]) -> String {
    serde_json::json!({ "content_array": items }).to_string()
}
