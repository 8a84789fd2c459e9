//! Exponential Moving Average (EMA) indicator.

use super::{closes, ema_series, Indicator};
use crate::types::PricePoint;

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. The reading is only
/// reported once `period` samples are available.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn name(&self) -> &str {
        match self.period {
            20 => "EMA (20)",
            50 => "EMA (50)",
            _ => "EMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        if self.period == 0 || series.len() < self.period {
            return None;
        }
        ema_series(&closes(series), self.period).last().copied()
    }
}
