// Health endpoint (not prefixed)

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub validation: String,
    pub definitions: usize,
    pub instances: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine = &state.engine;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        validation: engine.definitions().validation().to_string(),
        definitions: engine.definitions().definition_count(),
        instances: engine.instance_count(),
    })
}

pub fn routes(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
