pub mod alerts;
pub mod analysis;
pub mod coins;
pub mod health;
pub mod sessions;

use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/coins", coins::router())
        .nest("/api/analysis", analysis::router())
        .nest("/api/alerts", alerts::router())
        .nest("/api/sessions", sessions::router())
}
