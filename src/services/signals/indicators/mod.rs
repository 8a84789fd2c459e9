//! Technical indicator implementations.
//!
//! Market data carries a single price per sample, so high, low and close are
//! all that price. Indicators that normally need a candle range (CCI,
//! stochastic, ATR, ADX) degrade accordingly.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use cci::Cci;
pub use ema::Ema;
pub use macd::Macd;
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::Stochastic;
pub use volume::{VolumeMean, VolumeReading};

use crate::types::{IndicatorSnapshot, PricePoint, PriceSeries};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Latest reading produced by the indicator.
    type Output;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of samples required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the latest reading.
    /// Returns None if there is not enough data.
    fn calculate(&self, series: &[PricePoint]) -> Option<Self::Output>;
}

/// Periods of the short and long moving averages.
pub const SHORT_MA_PERIOD: usize = 20;
pub const LONG_MA_PERIOD: usize = 50;

impl IndicatorSnapshot {
    /// Compute every indicator's latest value for a series.
    ///
    /// External inputs (sentiment, market mood) are left empty for the caller.
    pub fn compute(series: &PriceSeries) -> Self {
        let points = series.points();
        let volume = VolumeMean::default().calculate(points);

        Self {
            price: series.last().map(|p| p.price),
            sma_short: Sma::new(SHORT_MA_PERIOD).calculate(points),
            sma_long: Sma::new(LONG_MA_PERIOD).calculate(points),
            ema_short: Ema::new(SHORT_MA_PERIOD).calculate(points),
            ema_long: Ema::new(LONG_MA_PERIOD).calculate(points),
            rsi: Rsi::default().calculate(points),
            macd: Macd::default().calculate(points),
            bollinger: BollingerBands::default().calculate(points),
            cci: Cci::default().calculate(points),
            stochastic: Stochastic::default().calculate(points),
            atr: Atr::default().calculate(points),
            obv: Obv.calculate(points),
            adx: Adx::default().calculate(points),
            volume: volume.map(|v| v.current),
            volume_mean: volume.map(|v| v.mean),
            sentiment: None,
            market_mood: None,
        }
    }
}

/// Prices of a slice of samples.
pub(crate) fn closes(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.price).collect()
}

/// Exponential moving average over the whole input, seeded with the first
/// value (no bias adjustment). Output has the same length as the input.
pub(crate) fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let alpha = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut ema = first;
    result.push(ema);
    for value in &values[1..] {
        ema = alpha * value + (1.0 - alpha) * ema;
        result.push(ema);
    }
    result
}

/// Wilder's smoothing: SMA seed, then `(prev * (n - 1) + x) / n`.
pub(crate) fn wilders_smooth(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    let mut smoothed = values[..period].iter().sum::<f64>() / period as f64;
    result.push(smoothed);

    for value in &values[period..] {
        smoothed = (smoothed * (period - 1) as f64 + value) / period as f64;
        result.push(smoothed);
    }

    result
}

/// Mean of the trailing `period` values.
pub(crate) fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(values[values.len() - period..].iter().sum::<f64>() / period as f64)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_series_seed_and_length() {
        let ema = ema_series(&[10.0, 10.0, 10.0], 2);
        assert_eq!(ema, vec![10.0, 10.0, 10.0]);
        assert!(ema_series(&[], 5).is_empty());
    }

    #[test]
    fn test_ema_series_tracks_input() {
        let ema = ema_series(&[0.0, 3.0], 2);
        // alpha = 2/3
        assert!((ema[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wilders_smooth() {
        let smoothed = wilders_smooth(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(smoothed, vec![1.5, 2.25, 3.125]);
        assert!(wilders_smooth(&[1.0], 2).is_empty());
    }

    #[test]
    fn test_trailing_mean() {
        assert_eq!(trailing_mean(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
        assert_eq!(trailing_mean(&[1.0], 2), None);
    }

    #[test]
    fn test_snapshot_full_history() {
        let series = PriceSeries::new(test_support::zigzag(120));
        let snap = IndicatorSnapshot::compute(&series);

        assert!(snap.price.is_some());
        assert!(snap.sma_short.is_some());
        assert!(snap.sma_long.is_some());
        assert!(snap.ema_short.is_some());
        assert!(snap.ema_long.is_some());
        assert!(snap.rsi.is_some());
        assert!(snap.macd.is_some());
        assert!(snap.bollinger.is_some());
        assert!(snap.cci.is_some());
        assert!(snap.stochastic.is_some());
        assert!(snap.atr.is_some());
        assert!(snap.obv.is_some());
        assert!(snap.adx.is_some());
        assert_eq!(snap.volume, Some(1_000.0));
        assert_eq!(snap.volume_mean, Some(1_000.0));
        assert!(snap.sentiment.is_none());
        assert!(snap.market_mood.is_none());
    }

    #[test]
    fn test_snapshot_short_history_skips_long_indicators() {
        let series = PriceSeries::new(test_support::uptrend(30));
        let snap = IndicatorSnapshot::compute(&series);

        assert!(snap.sma_short.is_some());
        assert!(snap.sma_long.is_none());
        assert!(snap.ema_long.is_none());
        assert!(snap.macd.is_none());
    }
}
