//! Session flow endpoints.
//!
//! - GET  /api/sessions/:owner - Current session
//! - POST /api/sessions/:owner - Apply an action and return the new session

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::ApiResponse;
use crate::error::Result;
use crate::types::{SessionAction, UserSession};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:owner", get(get_session).post(apply_action))
}

async fn get_session(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Json<ApiResponse<UserSession>> {
    Json(ApiResponse::new(state.sessions.get(&owner)))
}

async fn apply_action(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Json(action): Json<SessionAction>,
) -> Result<Json<ApiResponse<UserSession>>> {
    let session = state
        .sessions
        .apply(&owner, action, &state.alerts, &state.coins)?;
    Ok(Json(ApiResponse::new(session)))
}
