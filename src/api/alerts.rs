//! Alert rule endpoints.
//!
//! - GET    /api/alerts/:owner         - List the owner's rules
//! - POST   /api/alerts/:owner         - Register a rule
//! - PUT    /api/alerts/:owner/:id     - Replace a rule's parameters
//! - DELETE /api/alerts/:owner/:id     - Remove a rule
//! - GET    /api/alerts/:owner/inbox   - Recent notifications, newest first

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::types::{AlertRule, AlertWindow, Notification};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub coin: String,
    pub threshold_percent: f64,
    pub window: AlertWindow,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:owner", get(list_alerts).post(create_alert))
        .route("/:owner/inbox", get(inbox))
        .route("/:owner/:id", axum::routing::put(update_alert).delete(delete_alert))
}

/// Resolve the coin and validate the threshold of a request.
fn validate(state: &AppState, request: &AlertRequest) -> Result<(String, f64)> {
    let coin = state
        .coins
        .resolve(&request.coin)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown coin {}", request.coin)))?;

    let threshold = request.threshold_percent.abs();
    if !threshold.is_finite() || threshold == 0.0 {
        return Err(AppError::BadRequest(
            "thresholdPercent must be a non-zero number".to_string(),
        ));
    }
    Ok((coin, threshold))
}

async fn list_alerts(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Json<ApiResponse<Vec<AlertRule>>> {
    Json(ApiResponse::new(state.alerts.list(&owner)))
}

async fn create_alert(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Json(request): Json<AlertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AlertRule>>)> {
    let (coin, threshold) = validate(&state, &request)?;
    let rule = AlertRule::new(owner, coin, threshold, request.window);
    info!("Registered alert {} for {}", rule.describe(), rule.owner_id);
    state.alerts.add(rule.clone());

    Ok((StatusCode::CREATED, Json(ApiResponse::new(rule))))
}

async fn update_alert(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, Uuid)>,
    Json(request): Json<AlertRequest>,
) -> Result<Json<ApiResponse<AlertRule>>> {
    let (coin, threshold) = validate(&state, &request)?;
    let mut rule = state
        .alerts
        .get(&owner, id)
        .ok_or_else(|| AppError::NotFound(format!("Alert rule {}", id)))?;

    rule.coin = coin;
    rule.threshold_percent = threshold;
    rule.window = request.window;
    if !state.alerts.update(rule.clone()) {
        return Err(AppError::NotFound(format!("Alert rule {}", id)));
    }

    Ok(Json(ApiResponse::new(rule)))
}

async fn delete_alert(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<AlertRule>>> {
    let removed = state
        .alerts
        .remove(&owner, id)
        .ok_or_else(|| AppError::NotFound(format!("Alert rule {}", id)))?;
    Ok(Json(ApiResponse::new(removed)))
}

async fn inbox(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Json<ApiResponse<Vec<Notification>>> {
    Json(ApiResponse::new(state.inbox.recent(&owner)))
}
