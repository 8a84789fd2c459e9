use super::SeriesProvider;
use crate::config::MAX_HISTORY_DAYS;
use crate::error::FetchError;
use crate::types::{CoinInfo, PricePoint, PriceSeries};
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
const COINGECKO_PRO_API_URL: &str = "https://pro-api.coingecko.com/api/v3";
const TOP_COINS_LIMIT: usize = 100;
const CHART_CACHE_TTL_MS: i64 = 60_000;

/// `/coins/{id}/market_chart` payload. Each entry is `[timestamp_ms, value]`.
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<[f64; 2]>,
    total_volumes: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoMarket {
    id: String,
    symbol: String,
}

struct CachedChart {
    series: PriceSeries,
    fetched_at: i64,
}

/// CoinGecko REST client.
pub struct CoinGeckoClient {
    client: Client,
    api_key: Option<String>,
    /// Cache key format: "{coin}:{days}"
    chart_cache: DashMap<String, CachedChart>,
}

impl CoinGeckoClient {
    /// Create a new CoinGecko client.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Augur/0.1 (Crypto Signal Engine)")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            chart_cache: DashMap::new(),
        }
    }

    fn base_url(&self) -> &str {
        if self.api_key.is_some() {
            COINGECKO_PRO_API_URL
        } else {
            COINGECKO_API_URL
        }
    }

    fn with_key(&self, mut url: String) -> String {
        if let Some(ref key) = self.api_key {
            url.push_str(&format!("&x_cg_pro_api_key={}", key));
        }
        url
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("CoinGecko API returned {}: {}", status, snippet);
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Price/volume history joined on timestamp. Samples lacking a volume
    /// entry are dropped.
    fn join_chart(chart: MarketChart) -> PriceSeries {
        let volumes: HashMap<i64, f64> = chart
            .total_volumes
            .iter()
            .map(|[ts, volume]| (*ts as i64, *volume))
            .collect();

        let points = chart
            .prices
            .iter()
            .filter_map(|[ts, price]| {
                let timestamp = *ts as i64;
                volumes
                    .get(&timestamp)
                    .map(|volume| PricePoint::new(timestamp, *price, *volume))
            })
            .collect();

        PriceSeries::new(points)
    }

    /// Fetch the top coins by market cap.
    pub async fn top_coins(&self) -> Result<Vec<CoinInfo>, FetchError> {
        let url = self.with_key(format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1",
            self.base_url(),
            TOP_COINS_LIMIT
        ));

        let markets: Vec<CoinGeckoMarket> = self.get(&url).await?;
        info!("Loaded {} coins from CoinGecko", markets.len());

        Ok(markets
            .into_iter()
            .map(|m| CoinInfo {
                symbol: m.symbol.to_uppercase(),
                id: m.id,
            })
            .collect())
    }
}

#[async_trait]
impl SeriesProvider for CoinGeckoClient {
    async fn fetch_series(&self, coin: &str, span_days: u32) -> Result<PriceSeries, FetchError> {
        let days = span_days.clamp(1, MAX_HISTORY_DAYS);
        let cache_key = format!("{}:{}", coin, days);
        let now = chrono::Utc::now().timestamp_millis();

        if let Some(cached) = self.chart_cache.get(&cache_key) {
            if now - cached.fetched_at < CHART_CACHE_TTL_MS {
                return Ok(cached.series.clone());
            }
        }

        let url = self.with_key(format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}",
            self.base_url(),
            coin,
            days
        ));
        let chart: MarketChart = self.get(&url).await?;
        let series = Self::join_chart(chart);
        debug!("Fetched {} samples for {} ({}d)", series.len(), coin, days);

        self.chart_cache.insert(
            cache_key,
            CachedChart {
                series: series.clone(),
                fetched_at: now,
            },
        );

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_depends_on_key() {
        let free = CoinGeckoClient::new(None, Duration::from_secs(1));
        assert_eq!(free.base_url(), COINGECKO_API_URL);
        assert_eq!(free.with_key("x?a=1".to_string()), "x?a=1");

        let pro = CoinGeckoClient::new(Some("k".to_string()), Duration::from_secs(1));
        assert_eq!(pro.base_url(), COINGECKO_PRO_API_URL);
        assert_eq!(pro.with_key("x?a=1".to_string()), "x?a=1&x_cg_pro_api_key=k");
    }

    #[test]
    fn test_join_chart_on_timestamp() {
        let chart: MarketChart = serde_json::from_str(
            r#"{
                "prices": [[1000, 10.5], [2000, 11.0], [3000, 12.0]],
                "market_caps": [[1000, 1.0]],
                "total_volumes": [[1000, 500.0], [3000, 700.0]]
            }"#,
        )
        .unwrap();

        let series = CoinGeckoClient::join_chart(chart);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0], PricePoint::new(1000, 10.5, 500.0));
        assert_eq!(series.points()[1], PricePoint::new(3000, 12.0, 700.0));
    }

    #[test]
    fn test_market_symbols_upper_cased() {
        let markets: Vec<CoinGeckoMarket> =
            serde_json::from_str(r#"[{"id":"bitcoin","symbol":"btc","current_price":1.0}]"#)
                .unwrap();
        assert_eq!(markets[0].symbol.to_uppercase(), "BTC");
        assert_eq!(markets[0].id, "bitcoin");
    }
}
