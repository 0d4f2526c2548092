// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// HTTP API - listing generation and translation endpoints
//
// Request validation and status codes live here; the core only reports error
// kinds.

use crate::application::listing_service::ListingService;
use crate::domain::listing::{GenerationRequest, TargetPlatform, TranslationRequest};
use crate::domain::llm::{ErrorKind, LLMError, ProviderKind};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub listing_service: Arc<dyn ListingService>,
    pub default_provider: ProviderKind,
}

pub fn app(
    service: Arc<dyn ListingService>,
    default_provider: ProviderKind,
    body_limit_bytes: usize,
) -> Router {
    let state = Arc::new(AppState {
        listing_service: service,
        default_provider,
    });

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/listing/generate", post(generate_listing))
        .route("/api/v1/listing/translate", post(translate_listing))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptContext {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub img_link: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateListingRequest {
    #[serde(default)]
    pub prompt_context: PromptContext,
    #[serde(default)]
    pub target_platform: TargetPlatform,
    #[serde(default)]
    pub model_provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateListingRequest {
    #[serde(default)]
    pub content_array: Vec<String>,
    #[serde(default)]
    pub target_language: String,
    #[serde(default)]
    pub model_provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedListing {
    pub bullet_points: Vec<String>,
    pub language: String,
    pub provider: ProviderKind,
    pub raw: Value,
}

#[derive(Debug, Serialize)]
pub struct TranslatedListing {
    pub translated_array: Vec<String>,
    pub provider: ProviderKind,
    pub raw: Value,
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    code: u16,
    data: T,
}

fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { code: 200, data })
}

#[derive(Debug)]
pub enum ApiError {
    /// Request rejected before reaching the core
    Validation(String),
    Operation(LLMError),
}

impl From<LLMError> for ApiError {
    fn from(err: LLMError) -> Self {
        ApiError::Operation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnsupportedProvider => StatusCode::BAD_REQUEST,
        ErrorKind::Parse | ErrorKind::Schema => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::CredentialMissing => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Transport | ErrorKind::ImageFetch => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, "validation", message),
            ApiError::Operation(err) => (status_for(err.kind()), err.kind().as_str(), err.to_string()),
        };

        (
            status,
            Json(json!({ "code": status.as_u16(), "message": message, "kind": kind })),
        )
            .into_response()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_image_link(link: &str) -> Result<(), ApiError> {
    match url::Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ApiError::Validation(format!(
            "img_link must be an absolute http(s) URL: {}",
            link
        ))),
    }
}

impl TryFrom<GenerateListingRequest> for GenerationRequest {
    type Error = ApiError;

    fn try_from(body: GenerateListingRequest) -> Result<Self, Self::Error> {
        let context = body.prompt_context;
        let request = GenerationRequest {
            product_title: non_blank(context.title),
            image_url: non_blank(context.img_link),
            image_inline: non_blank(context.image_base64),
            target_platform: body.target_platform,
            provider_override: non_blank(body.model_provider),
        };

        if !request.has_content() {
            return Err(ApiError::Validation(
                "prompt_context needs a title or an image".to_string(),
            ));
        }
        if let Some(link) = &request.image_url {
            validate_image_link(link)?;
        }
        Ok(request)
    }
}

impl TryFrom<TranslateListingRequest> for TranslationRequest {
    type Error = ApiError;

    fn try_from(body: TranslateListingRequest) -> Result<Self, Self::Error> {
        let items: Vec<String> = body
            .content_array
            .iter()
            .map(|item| item.trim().to_string())
            .collect();
        if items.is_empty() {
            return Err(ApiError::Validation(
                "content_array must not be empty".to_string(),
            ));
        }

        let target_language = body.target_language.trim();
        if target_language.is_empty() {
            return Err(ApiError::Validation(
                "target_language is required".to_string(),
            ));
        }

        let mut request = TranslationRequest::new(items, target_language);
        request.provider_override = non_blank(body.model_provider);
        Ok(request)
    }
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "provider": state.default_provider }))
}

async fn generate_listing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateListingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let request = GenerationRequest::try_from(body)?;

    let result = state.listing_service.generate(request).await?;

    Ok(ok(GeneratedListing {
        bullet_points: result.bullet_points,
        language: result.language_code,
        provider: result.provider,
        raw: result.raw_payload,
    }))
}

async fn translate_listing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateListingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let request = TranslationRequest::try_from(body)?;

    let result = state.listing_service.translate(request).await?;

    Ok(ok(TranslatedListing {
        translated_array: result.translated_items,
        provider: result.provider,
        raw: result.raw_payload,
    }))
}
