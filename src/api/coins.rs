//! Coin directory endpoints.
//!
//! - GET /api/coins            - All listed coins and their first letters
//! - GET /api/coins?letter=B   - Coins whose ticker starts with B

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::types::CoinInfo;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CoinsQuery {
    pub letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CoinListing {
    pub letters: Vec<char>,
    pub coins: Vec<CoinInfo>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_coins))
}

async fn list_coins(
    State(state): State<AppState>,
    Query(query): Query<CoinsQuery>,
) -> Json<ApiResponse<CoinListing>> {
    let letter = query.letter.as_deref().and_then(|l| l.trim().chars().next());

    Json(ApiResponse::new(CoinListing {
        letters: state.coins.letters(),
        coins: state.coins.list(letter),
    }))
}
