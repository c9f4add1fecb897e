//! Article persistence: HTML documents stored one file per article.

use crate::error::{Error, Result};
use crate::gallery::{self, GalleryEntry};
use crate::storage;

use std::path::PathBuf;

/// Reads and writes articles inside the gallery directory.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    articles_dir: PathBuf,
    images_dir: PathBuf,
}

impl ArticleStore {
    pub fn new(articles_dir: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            articles_dir: articles_dir.into(),
            images_dir: images_dir.into(),
        }
    }

    /// Write `content` verbatim, creating or replacing the article.
    ///
    /// Both storage directories are ensured first since saved articles
    /// usually reference images under `/images`.
    pub async fn save(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = storage::resolve_in(&self.articles_dir, filename)?;

        storage::ensure_dir(&self.articles_dir).await?;
        storage::ensure_dir(&self.images_dir).await?;
        storage::write_atomic(&path, content.as_bytes()).await?;

        tracing::info!(%filename, bytes = content.len(), "article saved");
        Ok(path)
    }

    /// Raw HTML of a stored article.
    pub async fn load(&self, filename: &str) -> Result<String> {
        let path = storage::resolve_in(&self.articles_dir, filename)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("article '{filename}'")))
            }
            Err(error) => Err(error.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<GalleryEntry>> {
        gallery::list_gallery(&self.articles_dir).await
    }
}
