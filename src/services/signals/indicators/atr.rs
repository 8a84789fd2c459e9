//! Average True Range (ATR) indicator.

use super::{closes, wilders_smooth, Indicator};
use crate::types::PricePoint;

/// ATR (Average True Range) indicator.
///
/// With one price per sample the true range reduces to the absolute change
/// between consecutive prices, smoothed with Wilder's method. Informational:
/// reported alongside the votes but never casts one.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn name(&self) -> &str {
        "ATR (14)"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        if series.len() < self.min_periods() {
            return None;
        }

        let true_ranges: Vec<f64> = closes(series).windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        wilders_smooth(&true_ranges, self.period).last().copied()
    }
}
