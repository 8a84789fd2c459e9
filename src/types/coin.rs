use serde::{Deserialize, Serialize};

/// A listed coin: exchange ticker plus CoinGecko id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    /// Upper-case ticker (e.g. "BTC").
    pub symbol: String,
    /// CoinGecko id (e.g. "bitcoin").
    pub id: String,
}
