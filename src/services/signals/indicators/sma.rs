//! Simple Moving Average (SMA) indicator.

use super::{closes, trailing_mean, Indicator};
use crate::types::PricePoint;

/// SMA (Simple Moving Average) indicator.
///
/// Arithmetic mean of the last `period` prices. Compared against a longer
/// SMA to detect crossovers.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn name(&self) -> &str {
        match self.period {
            20 => "SMA (20)",
            50 => "SMA (50)",
            _ => "SMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        trailing_mean(&closes(series), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::{series_from, uptrend};

    #[test]
    fn test_sma_name() {
        assert_eq!(Sma::new(20).name(), "SMA (20)");
        assert_eq!(Sma::new(50).name(), "SMA (50)");
        assert_eq!(Sma::new(7).name(), "SMA");
    }

    #[test]
    fn test_sma_insufficient_data() {
        assert!(Sma::new(20).calculate(&uptrend(19)).is_none());
    }

    #[test]
    fn test_sma_value() {
        let series = series_from(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(Sma::new(3).calculate(&series), Some(4.0));
    }

    #[test]
    fn test_short_sma_above_long_in_uptrend() {
        let series = uptrend(60);
        let short = Sma::new(20).calculate(&series).unwrap();
        let long = Sma::new(50).calculate(&series).unwrap();
        assert!(short > long);
    }
}
