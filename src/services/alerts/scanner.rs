//! Periodic evaluation of alert rules against fresh market data.

use super::{AlertStore, NotificationSink};
use crate::config::{AlertConfig, MAX_HISTORY_DAYS};
use crate::services::coins::CoinDirectory;
use crate::error::FetchError;
use crate::sources::SeriesProvider;
use crate::types::{
    AlertEvent, AlertFirePolicy, AlertRule, MoveDirection, PriceSeries, QuietReason,
    RuleEvaluation, RuleState,
};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Evaluates every registered rule once per tick.
pub struct AlertScanner {
    store: Arc<AlertStore>,
    provider: Arc<dyn SeriesProvider>,
    sink: Arc<dyn NotificationSink>,
    coins: Arc<CoinDirectory>,
    /// Minimum days fetched per coin; longer windows fetch more.
    fetch_days: u32,
    policy: AlertFirePolicy,
}

impl AlertScanner {
    pub fn new(
        store: Arc<AlertStore>,
        provider: Arc<dyn SeriesProvider>,
        sink: Arc<dyn NotificationSink>,
        coins: Arc<CoinDirectory>,
        config: &AlertConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            provider,
            sink,
            coins,
            fetch_days: config.fetch_days,
            policy: config.fire_policy,
        })
    }

    /// Evaluate one rule against a series at time `now` (Unix ms).
    ///
    /// The baseline is the last sample at or before `now - window`; without
    /// one the rule stays quiet.
    pub fn evaluate(rule: &AlertRule, series: &PriceSeries, now: i64) -> RuleState {
        let cutoff = now - rule.window.duration_ms();
        let (Some(baseline), Some(latest)) = (series.at_or_before(cutoff), series.last()) else {
            return RuleState::Quiet {
                reason: QuietReason::NoBaseline,
            };
        };

        let change = (latest.price - baseline.price) / baseline.price * 100.0;
        if change.abs() < rule.threshold_percent {
            return RuleState::Quiet {
                reason: QuietReason::BelowThreshold,
            };
        }

        RuleState::Fired {
            event: AlertEvent {
                rule_id: rule.id,
                owner_id: rule.owner_id.clone(),
                coin: rule.coin.clone(),
                observed_percentage_change: change,
                window: rule.window,
                direction: if change > 0.0 {
                    MoveDirection::Up
                } else {
                    MoveDirection::Down
                },
                baseline_price: baseline.price,
                latest_price: latest.price,
                timestamp: now,
            },
        }
    }

    /// Evaluate every rule in the store at time `now`.
    ///
    /// Each distinct coin is fetched once, concurrently, over enough days to
    /// cover the longest window watching it. A failed fetch only quiets the
    /// rules watching that coin.
    pub async fn scan(&self, now: i64) -> Vec<RuleEvaluation> {
        let rules = self.store.snapshot();
        if rules.is_empty() {
            return Vec::new();
        }

        let mut spans: Vec<(&str, u32)> = Vec::new();
        for rule in &rules {
            let days = rule.window.fetch_days();
            match spans.iter().position(|(coin, _)| *coin == rule.coin) {
                Some(i) => spans[i].1 = spans[i].1.max(days),
                None => spans.push((rule.coin.as_str(), days)),
            }
        }
        let spans: Vec<(&str, u32)> = spans
            .into_iter()
            .map(|(coin, days)| (coin, days.max(self.fetch_days).min(MAX_HISTORY_DAYS)))
            .collect();
        let coins: Vec<&str> = spans.iter().map(|(coin, _)| *coin).collect();

        let fetched = join_all(
            spans
                .iter()
                .map(|(coin, days)| self.provider.fetch_series(coin, *days)),
        )
        .await;
        let series: HashMap<&str, Result<PriceSeries, FetchError>> =
            coins.iter().copied().zip(fetched).collect();

        let failures: Vec<(&str, &FetchError)> = series
            .iter()
            .filter_map(|(coin, result)| result.as_ref().err().map(|e| (*coin, e)))
            .collect();
        if !failures.is_empty() && failures.len() == coins.len() {
            warn!(
                "Alert scan: market data unavailable for all {} coins, no events this cycle",
                coins.len()
            );
        } else {
            for (coin, err) in &failures {
                warn!("Alert scan: failed to fetch {}: {}", coin, err);
            }
        }

        rules
            .iter()
            .map(|rule| {
                let state = match series.get(rule.coin.as_str()) {
                    Some(Ok(series)) => Self::evaluate(rule, series, now),
                    _ => RuleState::Quiet {
                        reason: QuietReason::DataUnavailable,
                    },
                };
                RuleEvaluation {
                    rule_id: rule.id,
                    owner_id: rule.owner_id.clone(),
                    state,
                }
            })
            .collect()
    }

    /// One full tick: scan, notify owners, then apply the fire policy.
    pub async fn run_cycle(&self, now: i64) -> Vec<AlertEvent> {
        let evaluations = self.scan(now).await;
        let events: Vec<AlertEvent> = evaluations
            .into_iter()
            .filter_map(|evaluation| match evaluation.state {
                RuleState::Fired { event } => Some(event),
                RuleState::Quiet { .. } => None,
            })
            .collect();

        for event in &events {
            let label = self.coins.label_for(&event.coin);
            self.sink.notify(&event.owner_id, &event.message(&label)).await;
            if self.policy == AlertFirePolicy::RetireOnFire {
                self.store.remove(&event.owner_id, event.rule_id);
            }
        }

        debug!(
            "Alert scan complete: {} rules, {} fired",
            self.store.len(),
            events.len()
        );
        events
    }

    /// Run `run_cycle` every `interval` in a background task.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        info!(
            "Starting alert scanner (every {}s, policy {:?})",
            interval.as_secs(),
            self.policy
        );
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let now = chrono::Utc::now().timestamp_millis();
                let events = self.run_cycle(now).await;
                if !events.is_empty() {
                    info!("Alert scan fired {} alerts", events.len());
                }
            }
        })
    }
}
