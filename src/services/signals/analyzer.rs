//! Analysis service: fetches inputs for a coin and caches results.

use super::analyze;
use crate::error::AnalysisError;
use crate::sources::{MarketMoodProvider, SentimentProvider, SeriesProvider};
use crate::types::Analysis;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache entry for a computed analysis.
struct CachedAnalysis {
    analysis: Analysis,
    computed_at: i64,
}

/// Runs analyses against live collaborators.
pub struct Analyzer {
    series: Arc<dyn SeriesProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    mood: Arc<dyn MarketMoodProvider>,
    /// Days of history requested per analysis.
    history_days: u32,
    /// Cache key format: "{coin}:{horizon_days}"
    cache: DashMap<String, CachedAnalysis>,
    /// Cache TTL in milliseconds.
    cache_ttl_ms: i64,
}

impl Analyzer {
    pub fn new(
        series: Arc<dyn SeriesProvider>,
        sentiment: Arc<dyn SentimentProvider>,
        mood: Arc<dyn MarketMoodProvider>,
        history_days: u32,
        cache_ttl: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            series,
            sentiment,
            mood,
            history_days,
            cache: DashMap::new(),
            cache_ttl_ms: cache_ttl.as_millis() as i64,
        })
    }

    /// Analyse `coin` with a forecast `horizon_days` ahead.
    ///
    /// A series fetch failure ends the request. Sentiment and mood failures
    /// are logged and leave those votes out.
    pub async fn analyze_coin(
        &self,
        coin: &str,
        horizon_days: u32,
    ) -> Result<Analysis, AnalysisError> {
        let coin = coin.to_lowercase();
        let cache_key = format!("{}:{}", coin, horizon_days);
        let now = chrono::Utc::now().timestamp_millis();

        if let Some(cached) = self.cache.get(&cache_key) {
            if now - cached.computed_at < self.cache_ttl_ms {
                return Ok(cached.analysis.clone());
            }
        }

        let (series, sentiment, mood) = tokio::join!(
            self.series.fetch_series(&coin, self.history_days),
            self.sentiment.sentiment(&coin),
            self.mood.mood_index(),
        );
        let series = series?;

        let sentiment = sentiment
            .map_err(|e| warn!("Sentiment unavailable for {}: {}", coin, e))
            .ok();
        let mood = mood
            .map_err(|e| warn!("Fear & greed index unavailable: {}", e))
            .ok();

        debug!(
            "Analysing {} with {} samples, horizon {}d",
            coin,
            series.len(),
            horizon_days
        );
        let analysis = analyze(&series, horizon_days, sentiment, mood)?;

        self.cache.insert(
            cache_key,
            CachedAnalysis {
                analysis: analysis.clone(),
                computed_at: now,
            },
        );

        Ok(analysis)
    }

    /// Drop expired cache entries.
    pub fn evict_expired(&self) {
        let now = chrono::Utc::now().timestamp_millis();
        self.cache
            .retain(|_, cached| now - cached.computed_at < self.cache_ttl_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::types::{PriceSeries, VoteSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSeries {
        calls: AtomicUsize,
        len: usize,
    }

    #[async_trait]
    impl SeriesProvider for FakeSeries {
        async fn fetch_series(&self, _coin: &str, _days: u32) -> Result<PriceSeries, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let prices: Vec<f64> = (0..self.len)
                .map(|i| 50.0 + 5.0 * ((i as f64) * 0.4).sin())
                .collect();
            Ok(PriceSeries::from_prices(0, 3_600_000, &prices))
        }
    }

    struct FailingSentiment;

    #[async_trait]
    impl SentimentProvider for FailingSentiment {
        async fn sentiment(&self, _coin: &str) -> Result<f64, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    struct FixedMood(u8);

    #[async_trait]
    impl MarketMoodProvider for FixedMood {
        async fn mood_index(&self) -> Result<u8, FetchError> {
            Ok(self.0)
        }
    }

    fn analyzer(len: usize, ttl: Duration) -> (Arc<FakeSeries>, Arc<Analyzer>) {
        let series = Arc::new(FakeSeries {
            calls: AtomicUsize::new(0),
            len,
        });
        let analyzer = Analyzer::new(
            series.clone(),
            Arc::new(FailingSentiment),
            Arc::new(FixedMood(80)),
            365,
            ttl,
        );
        (series, analyzer)
    }

    #[tokio::test]
    async fn test_failed_sentiment_is_skipped() {
        let (_, analyzer) = analyzer(150, Duration::from_secs(60));
        let analysis = analyzer.analyze_coin("bitcoin", 1).await.unwrap();
        let sources: Vec<VoteSource> = analysis.report.votes.iter().map(|v| v.source).collect();
        assert!(!sources.contains(&VoteSource::Sentiment));
        assert!(sources.contains(&VoteSource::MarketMood));
    }

    #[tokio::test]
    async fn test_results_are_cached_per_horizon() {
        let (series, analyzer) = analyzer(150, Duration::from_secs(60));
        analyzer.analyze_coin("BITCOIN", 1).await.unwrap();
        analyzer.analyze_coin("bitcoin", 1).await.unwrap();
        assert_eq!(series.calls.load(Ordering::SeqCst), 1);

        analyzer.analyze_coin("bitcoin", 7).await.unwrap();
        assert_eq!(series.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let (series, analyzer) = analyzer(150, Duration::ZERO);
        analyzer.analyze_coin("bitcoin", 1).await.unwrap();
        analyzer.analyze_coin("bitcoin", 1).await.unwrap();
        assert_eq!(series.calls.load(Ordering::SeqCst), 2);
        analyzer.evict_expired();
        assert!(analyzer.cache.is_empty());
    }

    #[tokio::test]
    async fn test_short_history_is_an_error() {
        let (_, analyzer) = analyzer(50, Duration::from_secs(60));
        let err = analyzer.analyze_coin("bitcoin", 1).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientHistory { len: 50, .. }));
    }
}
