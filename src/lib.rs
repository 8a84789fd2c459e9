//! Augur - technical signal aggregation, wave detection, price forecasting
//! and price-move alerts for crypto assets.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::Router;
use config::Config;
use services::{AlertInbox, AlertStore, Analyzer, CoinDirectory, SessionStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<Analyzer>,
    pub alerts: Arc<AlertStore>,
    pub inbox: Arc<AlertInbox>,
    pub sessions: Arc<SessionStore>,
    pub coins: Arc<CoinDirectory>,
}

/// Build the HTTP application.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
