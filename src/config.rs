//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional `gallery.toml` in
//! the working directory, then `GALLERY_*` environment variables. The AI
//! provider secret comes from `OPENAI_API_KEY`, which `main` may have loaded
//! from `config.env` beforehand.

use crate::error::Result;

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_GALLERY_DIR: &str = "./galery";
pub const DEFAULT_IMAGES_DIR: &str = "./images";
pub const DEFAULT_STATIC_DIR: &str = ".";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

#[derive(Clone, Deserialize)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    /// Directory holding the article HTML files.
    pub gallery_dir: PathBuf,
    /// Directory holding downloaded images, served at `/images`.
    pub images_dir: PathBuf,
    /// Root served for every path not claimed by the API.
    pub static_dir: PathBuf,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
    pub image_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            gallery_dir: PathBuf::from(DEFAULT_GALLERY_DIR),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

// Hand-written so the secret never reaches a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("gallery_dir", &self.gallery_dir)
            .field("images_dir", &self.images_dir)
            .field("static_dir", &self.static_dir)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

impl Config {
    /// Build the configuration from defaults, `gallery.toml` and the process
    /// environment.
    pub fn load() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok();

        let mut config: Config = ::config::Config::builder()
            .set_default("bind", DEFAULT_BIND)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("gallery_dir", DEFAULT_GALLERY_DIR)?
            .set_default("images_dir", DEFAULT_IMAGES_DIR)?
            .set_default("static_dir", DEFAULT_STATIC_DIR)?
            .set_default("openai_base_url", DEFAULT_OPENAI_BASE_URL)?
            .set_default("chat_model", DEFAULT_CHAT_MODEL)?
            .set_default("image_model", DEFAULT_IMAGE_MODEL)?
            .add_source(::config::File::with_name("gallery").required(false))
            .add_source(::config::Environment::with_prefix("GALLERY"))
            .set_override_option("openai_api_key", api_key)?
            .build()?
            .try_deserialize()?;

        config.openai_api_key = normalize_secret(config.openai_api_key);
        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Blank secrets count as absent.
fn normalize_secret(value: Option<String>) -> Option<String> {
    value
        .map(|secret| secret.trim().to_string())
        .filter(|secret| !secret.is_empty())
}
