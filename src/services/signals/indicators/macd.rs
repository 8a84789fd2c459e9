//! MACD (Moving Average Convergence Divergence) indicator.

use super::{closes, ema_series, Indicator};
use crate::types::{MacdReading, PricePoint};

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
///
/// Buy signal: MACD above signal line
/// Sell signal: MACD below signal line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdReading;

    fn name(&self) -> &str {
        "MACD"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<MacdReading> {
        if self.slow_period == 0 || self.signal_period == 0 || series.len() < self.min_periods() {
            return None;
        }

        let prices = closes(series);
        let fast_ema = ema_series(&prices, self.fast_period);
        let slow_ema = ema_series(&prices, self.slow_period);

        // The MACD line starts once the slow EMA has a full window behind it
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .skip(self.slow_period - 1)
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal_period);

        Some(MacdReading {
            macd: *macd_line.last()?,
            signal: *signal_line.last()?,
        })
    }
}
