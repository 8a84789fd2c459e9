//! Relative Strength Index (RSI) indicator.

use super::{closes, Indicator};
use crate::types::PricePoint;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn name(&self) -> &str {
        "RSI (14)"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        if self.period == 0 || series.len() < self.min_periods() {
            return None;
        }

        let prices = closes(series);
        let (gains, losses): (Vec<f64>, Vec<f64>) = prices
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let period = self.period as f64;
        let mut avg_gain = gains[..self.period].iter().sum::<f64>() / period;
        let mut avg_loss = losses[..self.period].iter().sum::<f64>() / period;

        for (gain, loss) in gains.iter().zip(losses.iter()).skip(self.period) {
            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
        }

        if avg_loss == 0.0 {
            return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}
