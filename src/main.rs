use article_gallery::api::{ApiState, start_http_server};
use article_gallery::transport::ReqwestTransport;
use article_gallery::{Config, storage, telemetry};

use anyhow::Context as _;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "article-gallery")]
#[command(version, about = "Article gallery backend with image download and AI proxy")]
struct Cli {
    /// Env file loaded into the process environment before configuration is read
    #[arg(long, default_value = "config.env")]
    config_env: PathBuf,

    /// Port to listen on (overrides GALLERY_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit JSON log lines on stdout
    #[arg(long)]
    log_json: bool,

    /// Also write daily-rotated log files into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_file_result = dotenvy::from_path(&cli.config_env);
    let _log_guard = telemetry::init_tracing(cli.log_json, cli.log_dir.as_deref());

    match env_file_result {
        Ok(()) => tracing::info!(path = %cli.config_env.display(), "loaded env file"),
        Err(error) => tracing::debug!(path = %cli.config_env.display(), %error, "no env file loaded"),
    }

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    tracing::debug!(?config, "configuration resolved");

    storage::ensure_dir(&config.gallery_dir)
        .await
        .with_context(|| format!("failed to create {}", config.gallery_dir.display()))?;
    storage::ensure_dir(&config.images_dir)
        .await
        .with_context(|| format!("failed to create {}", config.images_dir.display()))?;
    tracing::info!(path = %absolute(&config.gallery_dir).display(), "gallery directory");
    tracing::info!(path = %absolute(&config.images_dir).display(), "images directory");

    let transport = Arc::new(ReqwestTransport::new().context("failed to build HTTP client")?);
    let state = Arc::new(ApiState::new(&config, transport));
    if !state.openai.is_configured() {
        tracing::warn!("OPENAI_API_KEY is not set, AI proxy endpoints will answer with errors");
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let server = start_http_server(config.socket_addr(), state, shutdown_rx).await?;
    tracing::info!("server running at http://localhost:{}", config.port);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("shutting down");
    shutdown_tx.send(true).ok();
    server.await.context("server task panicked")?;

    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
