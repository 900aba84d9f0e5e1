mod auth;
mod config;
mod errors;
mod models;
mod render;
mod resume;
mod routes;
mod session;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::render::PdfRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::cms::CmsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeCraft API v{}", env!("CARGO_PKG_VERSION"));

    // One client serves both resume CRUD and the auth endpoints
    let cms = Arc::new(CmsClient::new(
        &config.cms_api_url,
        Duration::from_secs(config.cms_timeout_secs),
    )?);
    info!("CMS client initialized ({})", config.cms_api_url);

    let pdf = PdfRenderer::new(config.pdf_engine.clone());
    info!("PDF engine: {}", pdf.engine());

    let cors = cors_layer(&config.frontend_url)?;

    let state = AppState {
        store: cms.clone(),
        auth: cms,
        config: config.clone(),
        pdf,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Session cookies travel cross-origin, so only the frontend origin is allowed.
fn cors_layer(frontend_url: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
        .with_context(|| format!("FRONTEND_URL '{frontend_url}' is not a valid origin"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]))
}
