//! Analysis endpoint.
//!
//! - GET /api/analysis/:coin?days=N - Signal report and N-day forecast

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::config::MAX_FORECAST_DAYS;
use crate::error::{AppError, Result};
use crate::types::Analysis;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// Forecast horizon in days.
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub coin: String,
    pub symbol: Option<String>,
    pub analysis: Analysis,
    /// Human-readable report.
    pub text: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:coin", get(get_analysis))
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(coin): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<ApiResponse<AnalysisResponse>>> {
    let id = state
        .coins
        .resolve(&coin)
        .ok_or_else(|| AppError::NotFound(format!("Unknown coin {}", coin)))?;
    let days = query.days.unwrap_or(state.config.default_forecast_days);
    if !(1..=MAX_FORECAST_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {}",
            MAX_FORECAST_DAYS
        )));
    }

    let analysis = state.analyzer.analyze_coin(&id, days).await?;
    let symbol = state.coins.symbol_for(&id);
    let text = analysis.render(symbol.as_deref().unwrap_or(&id));

    Ok(Json(ApiResponse::new(AnalysisResponse {
        coin: id,
        symbol,
        analysis,
        text,
    })))
}
