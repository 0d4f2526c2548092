// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Chat Completions wire types
//
// OpenAI and Moonshot (Kimi) speak the same chat completions dialect, so both
// adapters build their requests from these types.

use super::http;
use crate::domain::llm::LLMError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub response_format: ResponseFormat,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object" }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: String) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text),
        }
    }

    pub fn user(content: MessageContent) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(super) struct ImageUrl {
    pub url: String,
    pub detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// POST a chat completion and return the first choice's content, or an empty
/// string when the backend sent none.
pub(super) async fn complete(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    request: &ChatCompletionRequest<'_>,
) -> Result<String, LLMError> {
    let builder = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key));

    let response: ChatCompletionResponse = http::send_json(builder, request).await?;

    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parts_serialize_in_openai_shape() {
        let message = ChatMessage::user(MessageContent::Parts(vec![
            ContentPart::Text {
                text: "Product title: Mug".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/jpeg;base64,aGVsbG8=".to_string(),
                    detail: "high",
                },
            },
        ]));

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "Product title: Mug" },
                    { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,aGVsbG8=", "detail": "high" } }
                ]
            })
        );
    }

    #[test]
    fn test_plain_text_content_is_a_string() {
        let message = ChatMessage::system("be terse".to_string());
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "role": "system", "content": "be terse" })
        );
    }
}
