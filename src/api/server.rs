//! HTTP server setup: router, static file serving, and API routes.

use super::state::ApiState;
use super::{articles, gallery, images, openai};

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Articles may embed images inline, so allow larger bodies than axum's 2 MB.
const MAX_REQUEST_BYTES: usize = 25 * 1024 * 1024;

/// `gallery.<ext>` is read as configuration for each of these formats.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "json", "json5", "yaml", "yml", "ini", "ron"];

/// Build the full application router.
pub fn build_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/gallery", get(gallery::list_gallery))
        .route("/save-article", post(articles::save_article))
        .route("/article/{filename}", get(articles::get_article))
        .route("/save-image", post(images::save_image))
        .route("/openai/chat", post(openai::chat))
        .route("/openai/image", post(openai::image));

    let images_service = ServeDir::new(state.images.images_dir());
    let static_service: Router = Router::new()
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(middleware::from_fn(hide_private_files));

    Router::new()
        .nest("/api", api_routes)
        .nest_service(crate::images::IMAGES_ROUTE, images_service)
        .fallback_service(static_service)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the given address.
///
/// Returns a handle that resolves when the server shuts down. The caller
/// passes a `tokio::sync::watch::Receiver<bool>` for graceful shutdown.
pub async fn start_http_server(
    bind: SocketAddr,
    state: Arc<ApiState>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "HTTP server listening");

    let handle = tokio::spawn(async move {
        let mut shutdown = shutdown_rx;
        if let Err(error) = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|v| *v).await;
            })
            .await
        {
            tracing::error!(%error, "HTTP server stopped with an error");
        }
    });

    Ok(handle)
}

async fn health(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "uptime_seconds": state.started_at.elapsed().as_secs(),
        "ai_proxy_configured": state.openai.is_configured(),
    }))
}

/// 404 for configuration files, env files and dotfiles under the static root.
async fn hide_private_files(request: Request, next: Next) -> Response {
    if is_private_path(request.uri().path()) {
        tracing::warn!(path = %request.uri().path(), "refused to serve private file");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

fn is_private_path(path: &str) -> bool {
    let Ok(decoded) = urlencoding::decode(path) else {
        return true;
    };
    decoded
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .any(|segment| {
            let segment = segment.to_ascii_lowercase();
            segment.starts_with('.')
                || segment.ends_with(".env")
                || segment
                    .strip_prefix("gallery.")
                    .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_and_dotfiles_are_private() {
        for path in [
            "/config.env",
            "/CONFIG.ENV",
            "/config%2Eenv",
            "/gallery.toml",
            "/gallery.yaml",
            "/.env",
            "/.git/config",
            "/nested/production.env",
            "/%ff",
        ] {
            assert!(is_private_path(path), "{path} should be private");
        }
    }

    #[test]
    fn regular_assets_are_public() {
        for path in [
            "/",
            "/index.html",
            "/js/app.js",
            "/galery/hello.html",
            "/gallery.html",
            "/my%20page.html",
        ] {
            assert!(!is_private_path(path), "{path} should be public");
        }
    }
}
