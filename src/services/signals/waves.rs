//! Elliott-style wave pattern detection over local price extrema.

use super::indicators::trailing_mean;
use crate::types::{Extremum, ExtremumKind, PriceSeries, WaveAnalysis, WavePattern};
use tracing::debug;

/// Finds local extrema and matches the nine-point alternating wave structure.
pub struct ExtremaWaveDetector {
    /// Neighbours required on each side of an extremum.
    order: usize,
    /// Samples in the rolling volume mean.
    volume_period: usize,
}

impl Default for ExtremaWaveDetector {
    fn default() -> Self {
        Self {
            order: 5,
            volume_period: 20,
        }
    }
}

impl ExtremaWaveDetector {
    pub fn new(order: usize, volume_period: usize) -> Self {
        Self {
            order,
            volume_period,
        }
    }

    /// Local extrema in series order.
    ///
    /// A sample in a flat region satisfies both conditions and is recorded
    /// once as a minimum.
    pub fn find_extrema(&self, series: &PriceSeries) -> Vec<Extremum> {
        let prices = series.prices();
        if self.order == 0 || prices.len() < 2 * self.order + 1 {
            return Vec::new();
        }

        (self.order..prices.len() - self.order)
            .filter_map(|i| {
                let price = prices[i];
                let neighbourhood = &prices[i - self.order..=i + self.order];
                let kind = if neighbourhood.iter().all(|&p| price <= p) {
                    ExtremumKind::Min
                } else if neighbourhood.iter().all(|&p| price >= p) {
                    ExtremumKind::Max
                } else {
                    return None;
                };
                Some(Extremum {
                    position: i,
                    price,
                    kind,
                })
            })
            .collect()
    }

    pub fn detect(&self, series: &PriceSeries) -> WaveAnalysis {
        let extrema = self.find_extrema(series);
        if extrema.len() < WavePattern::LEN {
            return WaveAnalysis::InsufficientData;
        }

        let Some(pattern) = extrema
            .windows(WavePattern::LEN)
            .rev()
            .find_map(WavePattern::from_window)
        else {
            return WaveAnalysis::PatternNotFound;
        };

        if !pattern.is_impulse() {
            return WaveAnalysis::Corrective { pattern };
        }

        let volumes = series.volumes();
        let (start, end) = pattern.span();
        let span = &volumes[start..=end];
        let window_mean = span.iter().sum::<f64>() / span.len() as f64;

        match trailing_mean(&volumes, self.volume_period) {
            Some(rolling_mean) if window_mean > rolling_mean => {
                debug!(
                    "Impulse volume {:.2} above rolling mean {:.2}",
                    window_mean, rolling_mean
                );
                WaveAnalysis::ImpulseCompleting { pattern }
            }
            _ => WaveAnalysis::ImpulseContinuing { pattern },
        }
    }
}
