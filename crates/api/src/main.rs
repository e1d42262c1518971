// Waypoint API server
// Decision: In-memory engine; all state is lost on restart

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use waypoint_api::{app, ApiConfig, AppState};
use waypoint_engine::{InMemoryDefinitionStore, InstanceEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // Local .env is optional
    dotenvy::dotenv().ok();

    // RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("waypoint_api=debug,waypoint_engine=debug,tower_http=debug")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("waypoint-api starting...");

    let config = ApiConfig::from_env();
    tracing::info!(
        validation = %config.store.validation,
        max_id_attempts = config.engine.max_id_attempts,
        "Engine configured"
    );

    let store = InMemoryDefinitionStore::from_config(&config.store);
    let engine = InstanceEngine::builder(store)
        .config(config.engine.clone())
        .build();

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    let state = AppState::new(Arc::new(engine)).with_prefix(config.api_prefix.clone());
    let app = app(state);

    let cors_origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
        )
    } else {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    };

    let app = app.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
