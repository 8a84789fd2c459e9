use serde::{Deserialize, Serialize};

/// Minimum number of samples needed for a full analysis run.
pub const MIN_ANALYSIS_SAMPLES: usize = 100;

/// A single price/volume observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Price in quote currency (USD).
    pub price: f64,
    /// Traded volume in quote currency.
    pub volume: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: f64, volume: f64) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }
}

/// Price samples ordered by strictly increasing timestamp.
///
/// Construction normalizes raw input: samples are sorted, duplicate timestamps
/// keep the last value seen, non-finite or non-positive prices are dropped and
/// negative volume is clamped to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.price.is_finite() && p.price > 0.0);
        for p in points.iter_mut() {
            if !p.volume.is_finite() || p.volume < 0.0 {
                p.volume = 0.0;
            }
        }

        // Stable sort keeps arrival order among equal timestamps so the
        // dedup below can keep the most recent sample.
        points.sort_by_key(|p| p.timestamp);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    /// Build a series from prices alone, spaced `step_ms` apart with unit volume.
    pub fn from_prices(start: i64, step_ms: i64, prices: &[f64]) -> Self {
        Self::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint::new(start + i as i64 * step_ms, price, 1.0))
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.volume).collect()
    }

    /// Latest sample whose timestamp is at or before `cutoff`.
    pub fn at_or_before(&self, cutoff: i64) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.timestamp <= cutoff);
        idx.checked_sub(1).map(|i| &self.points[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_normalizes() {
        let json = r#"[
            {"timestamp": 2, "price": 20.0, "volume": 1.0},
            {"timestamp": 1, "price": -5.0, "volume": 1.0},
            {"timestamp": 1, "price": 10.0, "volume": -3.0}
        ]"#;
        let series: PriceSeries = serde_json::from_str(json).unwrap();

        assert_eq!(
            series.points(),
            &[PricePoint::new(1, 10.0, 0.0), PricePoint::new(2, 20.0, 1.0)]
        );
        assert!(serde_json::to_string(&series).unwrap().starts_with('['));
    }

    #[test]
    fn test_series_sorts_and_dedups() {
        let series = PriceSeries::new(vec![
            PricePoint::new(3, 30.0, 1.0),
            PricePoint::new(1, 10.0, 1.0),
            PricePoint::new(2, 20.0, 1.0),
            PricePoint::new(2, 21.0, 2.0),
        ]);

        let ts: Vec<i64> = series.points().iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![1, 2, 3]);
        assert_eq!(series.points()[1].price, 21.0);
    }

    #[test]
    fn test_series_drops_invalid_prices() {
        let series = PriceSeries::new(vec![
            PricePoint::new(1, 0.0, 1.0),
            PricePoint::new(2, f64::NAN, 1.0),
            PricePoint::new(3, -5.0, 1.0),
            PricePoint::new(4, 5.0, -3.0),
        ]);

        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].volume, 0.0);
    }

    #[test]
    fn test_at_or_before() {
        let series = PriceSeries::from_prices(1_000, 1_000, &[1.0, 2.0, 3.0]);

        assert_eq!(series.at_or_before(999), None);
        assert_eq!(series.at_or_before(1_000).map(|p| p.price), Some(1.0));
        assert_eq!(series.at_or_before(2_500).map(|p| p.price), Some(2.0));
        assert_eq!(series.at_or_before(10_000).map(|p| p.price), Some(3.0));
    }

    #[test]
    fn test_series_serializes_as_array() {
        let series = PriceSeries::from_prices(0, 1, &[1.5]);
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"timestamp":0,"price":1.5,"volume":1.0}]"#);
    }
}
