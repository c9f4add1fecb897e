//! Shared state for the HTTP API.

use crate::articles::ArticleStore;
use crate::config::Config;
use crate::images::ImageFetcher;
use crate::openai::OpenAiProxy;
use crate::transport::HttpTransport;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// State shared across all API handlers.
///
/// Nothing in here is mutable; concurrent requests only share the filesystem.
pub struct ApiState {
    pub started_at: Instant,
    pub articles: ArticleStore,
    pub images: ImageFetcher,
    pub openai: OpenAiProxy,
    pub static_dir: PathBuf,
}

impl ApiState {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            started_at: Instant::now(),
            articles: ArticleStore::new(&config.gallery_dir, &config.images_dir),
            images: ImageFetcher::new(&config.images_dir, transport.clone()),
            openai: OpenAiProxy::new(config, transport),
            static_dir: config.static_dir.clone(),
        }
    }
}
