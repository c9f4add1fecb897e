use super::error::ApiError;
use super::state::ApiState;
use crate::gallery::GalleryEntry;

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// GET /api/gallery
pub(super) async fn list_gallery(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<GalleryEntry>>, ApiError> {
    let entries = state
        .articles
        .list()
        .await
        .map_err(|error| ApiError::from_error(error, "Fehler beim Laden der Galerie"))?;

    Ok(Json(entries))
}
