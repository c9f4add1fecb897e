use super::error::ApiError;
use super::extract::JsonBody;
use super::state::ApiState;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveImageRequest {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveImageResponse {
    success: bool,
    local_path: String,
    filename: String,
}

/// POST /api/save-image
///
/// Downloads `imageUrl` into the image directory and returns its served path.
pub(super) async fn save_image(
    State(state): State<Arc<ApiState>>,
    JsonBody(request): JsonBody<SaveImageRequest>,
) -> Result<Json<SaveImageResponse>, ApiError> {
    let image_url = request.image_url.unwrap_or_default();
    let filename = request.filename.unwrap_or_default();

    let saved = state
        .images
        .save_from_url(&image_url, &filename)
        .await
        .map_err(|error| ApiError::from_error(error, "Fehler beim Speichern des Bildes"))?;

    Ok(Json(SaveImageResponse {
        success: true,
        local_path: saved.local_path,
        filename: saved.filename,
    }))
}
