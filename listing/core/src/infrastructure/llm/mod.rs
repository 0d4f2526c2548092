// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each adapter translates a listing operation into one backend's native call
// shape and hands the raw reply text back for normalization.

pub mod openai;
pub mod gemini;
pub mod kimi;
pub mod registry;

mod chat_completions;
mod http;

pub use gemini::GeminiAdapter;
pub use kimi::KimiAdapter;
pub use openai::OpenAIAdapter;
pub use registry::ProviderRegistry;

use base64::Engine;

const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Best-effort MIME type of base64 image data, defaulting to JPEG.
pub(crate) fn sniff_image_mime(image_base64: &str) -> &'static str {
    // 64 base64 chars decode to 48 bytes, enough for every image signature
    let head: Vec<u8> = image_base64
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .take(64)
        .collect();
    let usable = head.len() - head.len() % 4;

    base64::engine::general_purpose::STANDARD
        .decode(&head[..usable])
        .ok()
        .and_then(|bytes| infer::get(&bytes))
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_IMAGE_MIME)
}
