use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    listed_coins: usize,
    alert_rules: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        listed_coins: state.coins.len(),
        alert_rules: state.alerts.len(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
