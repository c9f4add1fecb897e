//! Downloads remote images into the local image directory.
//!
//! The whole response body is buffered in memory before it is written, so the
//! largest image we can store is bounded by available memory.

use crate::error::{Error, Result};
use crate::storage;
use crate::transport::HttpTransport;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// URL prefix under which the image directory is served.
pub const IMAGES_ROUTE: &str = "/images";

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub filename: String,
    /// Path the image is served at, e.g. `/images/cover.png`.
    pub local_path: String,
}

pub struct ImageFetcher {
    images_dir: PathBuf,
    transport: Arc<dyn HttpTransport>,
}

impl ImageFetcher {
    pub fn new(images_dir: impl Into<PathBuf>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            images_dir: images_dir.into(),
            transport,
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Fetch `image_url` and store it as `filename`.
    ///
    /// Anything but HTTP 200 is a failure and leaves the image directory
    /// untouched.
    pub async fn save_from_url(&self, image_url: &str, filename: &str) -> Result<SavedImage> {
        if image_url.trim().is_empty() || filename.trim().is_empty() {
            return Err(Error::InvalidInput(
                "imageUrl und filename sind erforderlich".into(),
            ));
        }

        let target = storage::resolve_in(&self.images_dir, filename)?;
        let url = parse_image_url(image_url)?;

        storage::ensure_dir(&self.images_dir).await?;

        let response = self.transport.get(url.as_str()).await?;
        if response.status != 200 {
            return Err(Error::Upstream {
                status: response.status,
                message: format!("image download from {image_url} failed"),
            });
        }

        storage::write_atomic(&target, &response.body).await?;
        tracing::info!(%filename, bytes = response.body.len(), "image saved");

        Ok(SavedImage {
            filename: filename.to_string(),
            local_path: format!("{IMAGES_ROUTE}/{filename}"),
        })
    }
}

fn parse_image_url(image_url: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(image_url.trim())
        .map_err(|error| Error::InvalidInput(format!("invalid imageUrl: {error}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidInput(format!(
            "unsupported imageUrl scheme '{scheme}'"
        ))),
    }
}
