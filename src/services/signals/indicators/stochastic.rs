//! Stochastic Oscillator indicator.

use super::{closes, Indicator};
use crate::types::{PricePoint, StochasticReading};

/// Stochastic Oscillator.
///
/// Compares the latest price to the price range over a period:
/// %K = (Price - Lowest) / (Highest - Lowest) * 100
/// %D = SMA(3) of %K
///
/// Signals:
/// - Below 20: Oversold (bullish)
/// - Above 80: Overbought (bearish)
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

impl Indicator for Stochastic {
    type Output = StochasticReading;

    fn name(&self) -> &str {
        "Stochastic"
    }

    fn min_periods(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<StochasticReading> {
        if self.k_period == 0 || self.d_period == 0 || series.len() < self.min_periods() {
            return None;
        }

        let prices = closes(series);
        let k_values: Vec<f64> = prices
            .windows(self.k_period)
            .map(|window| {
                let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
                let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let current = window[window.len() - 1];
                if highest > lowest {
                    (current - lowest) / (highest - lowest) * 100.0
                } else {
                    50.0
                }
            })
            .collect();

        let k = *k_values.last()?;
        let d = k_values.iter().rev().take(self.d_period).sum::<f64>() / self.d_period as f64;

        Some(StochasticReading { k, d })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::{downtrend, series_from, uptrend};

    #[test]
    fn test_stochastic_min_periods() {
        assert_eq!(Stochastic::default().min_periods(), 16);
        assert!(Stochastic::default().calculate(&uptrend(15)).is_none());
    }

    #[test]
    fn test_stochastic_extremes() {
        let up = Stochastic::default().calculate(&uptrend(30)).unwrap();
        assert_eq!(up.k, 100.0);
        assert_eq!(up.d, 100.0);

        let down = Stochastic::default().calculate(&downtrend(30)).unwrap();
        assert_eq!(down.k, 0.0);
    }

    #[test]
    fn test_stochastic_flat_is_midpoint() {
        let flat = Stochastic::default().calculate(&series_from(&[7.0; 20])).unwrap();
        assert_eq!(flat.k, 50.0);
    }
}
