//! HTTP API for the article gallery.
//!
//! Serves the static frontend, the downloaded images under `/images`, and a
//! JSON API for listing, saving and fetching articles, downloading images and
//! proxying the AI provider.

mod articles;
mod error;
mod extract;
mod gallery;
mod images;
mod openai;
mod server;
mod state;

pub use server::{build_router, start_http_server};
pub use state::ApiState;
