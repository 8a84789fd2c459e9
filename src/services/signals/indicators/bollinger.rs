//! Bollinger Bands indicator.

use super::{closes, Indicator};
use crate::types::{BandReading, PricePoint};

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// Price below the lower band reads as oversold, above the upper band as
/// overbought.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    /// Population standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BandReading;

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<BandReading> {
        if self.period == 0 || series.len() < self.period {
            return None;
        }

        let prices = closes(&series[series.len() - self.period..]);
        let middle = prices.iter().sum::<f64>() / self.period as f64;
        let std_dev = Self::std_dev(&prices, middle);

        Some(BandReading {
            upper: middle + self.std_dev_multiplier * std_dev,
            middle,
            lower: middle - self.std_dev_multiplier * std_dev,
        })
    }
}
