use super::error::ApiError;
use super::extract::JsonBody;
use super::state::ApiState;
use crate::error::Error;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Plain-text body of the article 404; existing clients match on it.
const ARTICLE_NOT_FOUND: &str = "Artikel nicht gefunden";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveArticleRequest {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    content: Option<String>,
    /// Informational only; the title lives in the HTML itself.
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_prompt: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveArticleResponse {
    success: bool,
    filename: String,
    has_image: bool,
}

/// POST /api/save-article
pub(super) async fn save_article(
    State(state): State<Arc<ApiState>>,
    JsonBody(request): JsonBody<SaveArticleRequest>,
) -> Result<Json<SaveArticleResponse>, ApiError> {
    let (Some(filename), Some(content)) = (request.filename, request.content) else {
        return Err(ApiError::bad_request("filename und content sind erforderlich"));
    };

    state
        .articles
        .save(&filename, &content)
        .await
        .map_err(|error| ApiError::from_error(error, "Fehler beim Speichern des Artikels"))?;

    let image_url = request.image_url.filter(|url| !url.is_empty());
    if let Some(url) = &image_url {
        tracing::info!(%filename, image_url = %url, "article embeds image");
    }
    if let Some(prompt) = request.image_prompt.as_deref().filter(|p| !p.is_empty()) {
        tracing::info!(%filename, image_prompt = %prompt, "article image prompt");
    }
    tracing::debug!(
        %filename,
        title = request.title.as_deref().unwrap_or(""),
        date = request.date.as_deref().unwrap_or(""),
        "article metadata"
    );

    Ok(Json(SaveArticleResponse {
        success: true,
        filename,
        has_image: image_url.is_some(),
    }))
}

/// GET /api/article/{filename}
///
/// Answers with the raw HTML. A missing or unreadable article is a plain-text
/// 404, unlike the JSON errors of every other endpoint.
pub(super) async fn get_article(
    State(state): State<Arc<ApiState>>,
    Path(filename): Path<String>,
) -> Response {
    match state.articles.load(&filename).await {
        Ok(content) => Html(content).into_response(),
        Err(Error::InvalidInput(message)) => ApiError::bad_request(message).into_response(),
        Err(error) => {
            tracing::warn!(%filename, %error, "article lookup failed");
            (StatusCode::NOT_FOUND, ARTICLE_NOT_FOUND).into_response()
        }
    }
}
