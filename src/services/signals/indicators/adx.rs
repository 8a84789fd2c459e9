//! Average Directional Index (ADX) indicator.

use super::{closes, wilders_smooth, Indicator};
use crate::types::PricePoint;

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-40: Trending
/// - Above 40: Strong trend
///
/// Directional movement is taken from consecutive prices, so an up move is
/// the rise since the previous sample and a down move the fall.
pub struct Adx {
    period: usize,
}

impl Default for Adx {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Adx {
    fn directional_index(plus_dm: f64, minus_dm: f64, atr: f64) -> f64 {
        if atr == 0.0 {
            return 0.0;
        }
        let plus_di = plus_dm / atr * 100.0;
        let minus_di = minus_dm / atr * 100.0;
        let di_sum = plus_di + minus_di;
        if di_sum > 0.0 {
            (plus_di - minus_di).abs() / di_sum * 100.0
        } else {
            0.0
        }
    }
}

impl Indicator for Adx {
    type Output = f64;

    fn name(&self) -> &str {
        "ADX (14)"
    }

    fn min_periods(&self) -> usize {
        self.period * 2 + 1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        if self.period == 0 || series.len() < self.min_periods() {
            return None;
        }

        let prices = closes(series);
        let mut plus_dm = Vec::with_capacity(prices.len() - 1);
        let mut minus_dm = Vec::with_capacity(prices.len() - 1);
        let mut tr = Vec::with_capacity(prices.len() - 1);

        for w in prices.windows(2) {
            let up_move = w[1] - w[0];
            let down_move = w[0] - w[1];

            plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
            minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
            tr.push(up_move.abs());
        }

        let smoothed_plus_dm = wilders_smooth(&plus_dm, self.period);
        let smoothed_minus_dm = wilders_smooth(&minus_dm, self.period);
        let smoothed_tr = wilders_smooth(&tr, self.period);

        let dx_values: Vec<f64> = smoothed_tr
            .iter()
            .zip(smoothed_plus_dm.iter().zip(smoothed_minus_dm.iter()))
            .map(|(&atr, (&plus, &minus))| Self::directional_index(plus, minus, atr))
            .collect();

        wilders_smooth(&dx_values, self.period).last().copied()
    }
}
