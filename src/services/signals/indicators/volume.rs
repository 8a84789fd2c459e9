//! Volume versus its rolling mean.

use super::{trailing_mean, Indicator};
use crate::types::PricePoint;

/// Latest volume and its trailing mean (which includes the latest sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeReading {
    pub current: f64,
    pub mean: f64,
}

/// Rolling volume mean over `period` samples.
pub struct VolumeMean {
    period: usize,
}

impl Default for VolumeMean {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl VolumeMean {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for VolumeMean {
    type Output = VolumeReading;

    fn name(&self) -> &str {
        "Volume (20)"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<VolumeReading> {
        let volumes: Vec<f64> = series.iter().map(|p| p.volume).collect();
        Some(VolumeReading {
            mean: trailing_mean(&volumes, self.period)?,
            current: *volumes.last()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_volumes(volumes: &[f64]) -> Vec<PricePoint> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| PricePoint::new(i as i64, 1.0, v))
            .collect()
    }

    #[test]
    fn test_volume_mean_insufficient() {
        assert!(VolumeMean::default().calculate(&with_volumes(&[1.0; 19])).is_none());
    }

    #[test]
    fn test_volume_mean_includes_latest() {
        let mut volumes = vec![10.0; 19];
        volumes.push(30.0);
        let reading = VolumeMean::default().calculate(&with_volumes(&volumes)).unwrap();
        assert_eq!(reading.current, 30.0);
        assert_eq!(reading.mean, 11.0);
    }

    #[test]
    fn test_volume_mean_custom_period() {
        let reading = VolumeMean::new(2).calculate(&with_volumes(&[1.0, 2.0, 4.0])).unwrap();
        assert_eq!(reading.mean, 3.0);
    }
}
