//! On-Balance Volume (OBV) indicator.

use super::Indicator;
use crate::types::PricePoint;

/// OBV (On-Balance Volume) indicator.
///
/// Cumulative volume indicator:
/// - If price > previous price: OBV += volume
/// - If price < previous price: OBV -= volume
///
/// Informational only.
pub struct Obv;

impl Indicator for Obv {
    type Output = f64;

    fn name(&self) -> &str {
        "OBV"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        if series.is_empty() {
            return None;
        }

        let obv = series.windows(2).fold(0.0, |obv, w| {
            if w[1].price > w[0].price {
                obv + w[1].volume
            } else if w[1].price < w[0].price {
                obv - w[1].volume
            } else {
                obv
            }
        });
        Some(obv)
    }
}
