//! External data collaborators: market series, sentiment and market mood.

pub mod coingecko;
pub mod fear_greed;
pub mod sentiment;

pub use coingecko::CoinGeckoClient;
pub use fear_greed::FearGreedClient;
pub use sentiment::NeutralSentiment;

use crate::error::FetchError;
use crate::types::PriceSeries;
use async_trait::async_trait;

/// Provides recent price/volume history for a coin.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetch roughly `span_days` of history for `coin` (a CoinGecko id).
    async fn fetch_series(&self, coin: &str, span_days: u32) -> Result<PriceSeries, FetchError>;
}

/// News sentiment score for a coin, in -1.0..=1.0.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn sentiment(&self, coin: &str) -> Result<f64, FetchError>;
}

/// Market-wide mood index, in 0..=100.
#[async_trait]
pub trait MarketMoodProvider: Send + Sync {
    async fn mood_index(&self) -> Result<u8, FetchError>;
}
