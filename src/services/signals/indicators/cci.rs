//! Commodity Channel Index (CCI) indicator.

use super::{closes, Indicator};
use crate::types::PricePoint;

/// CCI (Commodity Channel Index) indicator.
///
/// CCI = (TP - SMA(TP)) / (0.015 * Mean Deviation), where the typical price
/// TP is simply the sample price.
///
/// Signals:
/// - Below -100: Oversold (bullish)
/// - Above +100: Overbought (bearish)
pub struct Cci {
    period: usize,
}

impl Default for Cci {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Indicator for Cci {
    type Output = f64;

    fn name(&self) -> &str {
        "CCI (20)"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        if self.period == 0 || series.len() < self.period {
            return None;
        }

        let typical = closes(&series[series.len() - self.period..]);
        let sma = typical.iter().sum::<f64>() / self.period as f64;
        let mean_dev = typical.iter().map(|v| (v - sma).abs()).sum::<f64>() / self.period as f64;

        let current = *typical.last()?;
        if mean_dev == 0.0 {
            return Some(0.0);
        }
        Some((current - sma) / (0.015 * mean_dev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::{series_from, uptrend};

    #[test]
    fn test_cci_insufficient_data() {
        assert!(Cci::default().calculate(&uptrend(19)).is_none());
    }

    #[test]
    fn test_cci_flat_is_zero() {
        assert_eq!(Cci::default().calculate(&series_from(&[3.0; 20])), Some(0.0));
    }

    #[test]
    fn test_cci_extremes() {
        let mut prices = vec![100.0; 19];
        prices.push(130.0);
        assert!(Cci::default().calculate(&series_from(&prices)).unwrap() > 100.0);

        let mut prices = vec![100.0; 19];
        prices.push(70.0);
        assert!(Cci::default().calculate(&series_from(&prices)).unwrap() < -100.0);
    }
}
