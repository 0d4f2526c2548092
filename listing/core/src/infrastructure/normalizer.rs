// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Schema Normalizer
//!
//! Parses raw backend output and enforces the listing output contract.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Turn backend text into [`GenerationResult`] /
//!   [`TranslationResult`] data or a typed failure, whichever backend answered.
//!
//! Backends drift on key naming, so each field is looked up through a small
//! alias table. The first alias holding a non-null value wins.
//!
//! | Field | Accepted keys |
//! |-------|---------------|
//! | bullet points | `bullet_points`, `bulletPoints` |
//! | language code | `language`, `lang` |
//! | translations | `translated_array`, `translatedArray` |

use crate::domain::listing::{
    GenerationResult, TranslationResult, BULLET_POINT_COUNT, DEFAULT_LANGUAGE_CODE,
};
use crate::domain::llm::{LLMError, ProviderKind};
use serde_json::Value;

pub const BULLET_POINT_KEYS: &[&str] = &["bullet_points", "bulletPoints"];
pub const LANGUAGE_KEYS: &[&str] = &["language", "lang"];
pub const TRANSLATED_ARRAY_KEYS: &[&str] = &["translated_array", "translatedArray"];

/// Validated generation output, not yet tagged with a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGeneration {
    pub bullet_points: Vec<String>,
    pub language_code: String,
    pub raw_payload: Value,
}

impl NormalizedGeneration {
    pub fn into_result(self, provider: ProviderKind) -> GenerationResult {
        GenerationResult {
            bullet_points: self.bullet_points,
            language_code: self.language_code,
            provider,
            raw_payload: self.raw_payload,
        }
    }
}

/// Validated translation output, not yet tagged with a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTranslation {
    pub translated_items: Vec<String>,
    pub raw_payload: Value,
}

impl NormalizedTranslation {
    pub fn into_result(self, provider: ProviderKind) -> TranslationResult {
        TranslationResult {
            translated_items: self.translated_items,
            provider,
            raw_payload: self.raw_payload,
        }
    }
}

fn parse_json(raw_text: &str) -> Result<Value, LLMError> {
    serde_json::from_str(raw_text).map_err(|e| LLMError::Parse(e.to_string()))
}

fn lookup<'a>(payload: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| !value.is_null())
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse and validate a generation reply.
///
/// Entries are coerced to strings, trimmed, and dropped when empty. Anything
/// other than exactly [`BULLET_POINT_COUNT`] remaining entries is a schema
/// failure; the list is never padded or truncated. A missing language tag
/// defaults to [`DEFAULT_LANGUAGE_CODE`].
pub fn normalize_generation(raw_text: &str) -> Result<NormalizedGeneration, LLMError> {
    let payload = parse_json(raw_text)?;

    let bullet_points: Vec<String> = match lookup(&payload, BULLET_POINT_KEYS) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_to_string(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    if bullet_points.len() != BULLET_POINT_COUNT {
        return Err(LLMError::Schema(format!(
            "expected {} bullet points, got {}",
            BULLET_POINT_COUNT,
            bullet_points.len()
        )));
    }

    let language_code = lookup(&payload, LANGUAGE_KEYS)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE_CODE)
        .to_string();

    Ok(NormalizedGeneration {
        bullet_points,
        language_code,
        raw_payload: payload,
    })
}

/// Parse and validate a translation reply.
///
/// Entries are coerced to strings but never dropped, so positions line up
/// with the request. The array length must equal `expected_len`.
pub fn normalize_translation(
    raw_text: &str,
    expected_len: usize,
) -> Result<NormalizedTranslation, LLMError> {
    let payload = parse_json(raw_text)?;

    let items = match lookup(&payload, TRANSLATED_ARRAY_KEYS) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(LLMError::Schema(
                "translated_array is not an array".to_string(),
            ))
        }
        None => return Err(LLMError::Schema("missing translated_array".to_string())),
    };

    if items.len() != expected_len {
        return Err(LLMError::Schema(format!(
            "expected {} translated items, got {}",
            expected_len,
            items.len()
        )));
    }

    let translated_items = items.iter().map(coerce_to_string).collect();

    Ok(NormalizedTranslation {
        translated_items,
        raw_payload: payload,
    })
}
