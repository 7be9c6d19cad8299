mod config;
mod errors;
mod models;
mod ranking;
mod routes;
mod state;
mod storage;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ranking::stopwords::StopWords;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{ensure_upload_dir, DiskArchive, NullArchive, ResumeArchive};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Ranker API v{}", env!("CARGO_PKG_VERSION"));

    // Stopwords are loaded once and shared read-only
    let stopwords = Arc::new(StopWords::english());
    info!("Loaded {} stopwords", stopwords.len());

    // Upload directory is created even when persistence is off
    ensure_upload_dir(&config.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;
    let archive: Arc<dyn ResumeArchive> = if config.persist_uploads {
        let disk = DiskArchive::new(config.upload_dir.clone());
        info!("Persisting uploads to {}", disk.dir().display());
        Arc::new(disk)
    } else {
        info!("Upload persistence disabled");
        Arc::new(NullArchive)
    };
    info!("Extraction failure policy: {}", config.failure_policy);

    let state = AppState {
        config: config.clone(),
        stopwords,
        archive,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
