//! Local article gallery backend.
//!
//! Stores HTML articles in a folder, lists them with derived titles, downloads
//! remote images next to them, and proxies the AI provider's chat and image
//! endpoints so the API key never leaves the server.

pub mod api;
pub mod articles;
pub mod config;
pub mod error;
pub mod gallery;
pub mod images;
pub mod openai;
pub mod storage;
pub mod telemetry;
pub mod transport;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
