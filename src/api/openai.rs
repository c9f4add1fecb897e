use super::error::ApiError;
use super::extract::JsonBody;
use super::state::ApiState;
use crate::openai::{ChatRequest, ImageRequest};

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// POST /api/openai/chat
pub(super) async fn chat(
    State(state): State<Arc<ApiState>>,
    JsonBody(request): JsonBody<ChatRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .openai
        .chat_completion(&request)
        .await
        .map(Json)
        .map_err(|error| ApiError::from_error(error, "Fehler bei der API-Anfrage"))
}

/// POST /api/openai/image
pub(super) async fn image(
    State(state): State<Arc<ApiState>>,
    JsonBody(request): JsonBody<ImageRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .openai
        .generate_image(&request)
        .await
        .map(Json)
        .map_err(|error| ApiError::from_error(error, "Fehler bei der Bildgenerierung"))
}
