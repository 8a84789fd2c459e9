//! Signal analysis service module.
//!
//! Computes indicator readings, classifies them into weighted votes, detects
//! Elliott-style wave structure and turns the combined evidence into a price
//! forecast.

pub mod aggregator;
pub mod analyzer;
pub mod classifier;
pub mod forecast;
pub mod indicators;
pub mod waves;

pub use aggregator::aggregate;
pub use analyzer::Analyzer;
pub use classifier::classify;
pub use forecast::forecast;
pub use waves::ExtremaWaveDetector;

use crate::error::AnalysisError;
use crate::types::{Analysis, IndicatorSnapshot, PriceSeries, MIN_ANALYSIS_SAMPLES};

/// Run the full analysis over one series.
///
/// `sentiment` and `market_mood` are the external readings, if they could be
/// obtained; a missing one simply casts no vote. The result depends only on
/// the arguments, so identical inputs give identical output.
pub fn analyze(
    series: &PriceSeries,
    horizon_days: u32,
    sentiment: Option<f64>,
    market_mood: Option<u8>,
) -> Result<Analysis, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::InsufficientData);
    }
    if horizon_days == 0 {
        return Err(AnalysisError::InvalidInput(
            "forecast horizon must be at least one day".to_string(),
        ));
    }
    if series.len() < MIN_ANALYSIS_SAMPLES {
        return Err(AnalysisError::InsufficientHistory {
            len: series.len(),
            required: MIN_ANALYSIS_SAMPLES,
        });
    }

    let mut indicators = IndicatorSnapshot::compute(series);
    indicators.sentiment = sentiment;
    indicators.market_mood = market_mood;

    let votes = classify(&indicators);
    let wave = ExtremaWaveDetector::default().detect(series);
    let report = aggregate(votes, &wave);
    let forecast = forecast(series, &report, horizon_days)?;

    Ok(Analysis {
        indicators,
        wave,
        report,
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{VoteDirection, VoteSource};

    fn zigzag_series(count: usize) -> PriceSeries {
        let prices: Vec<f64> = (0..count)
            .map(|i| 100.0 + 10.0 * ((i as f64) * 0.3).sin() + i as f64 * 0.05)
            .collect();
        PriceSeries::from_prices(1_700_000_000_000, 3_600_000, &prices)
    }

    #[test]
    fn test_empty_series() {
        let err = analyze(&PriceSeries::default(), 1, None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData));
    }

    #[test]
    fn test_short_series() {
        let err = analyze(&zigzag_series(99), 1, None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientHistory { len: 99, .. }));
    }

    #[test]
    fn test_zero_horizon() {
        let err = analyze(&zigzag_series(150), 0, None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_external_inputs_vote() {
        let analysis = analyze(&zigzag_series(150), 1, Some(0.5), Some(20)).unwrap();
        let sentiment = analysis
            .report
            .votes
            .iter()
            .find(|v| v.source == VoteSource::Sentiment)
            .unwrap();
        assert_eq!(sentiment.direction, VoteDirection::Bullish);
        assert_eq!(sentiment.weight, 2);
        assert!(analysis
            .report
            .votes
            .iter()
            .any(|v| v.source == VoteSource::MarketMood));
    }

    #[test]
    fn test_missing_external_inputs_cast_no_vote() {
        let analysis = analyze(&zigzag_series(150), 1, None, None).unwrap();
        assert!(!analysis
            .report
            .votes
            .iter()
            .any(|v| matches!(v.source, VoteSource::Sentiment | VoteSource::MarketMood)));
        assert!(analysis
            .report
            .votes
            .iter()
            .any(|v| v.source == VoteSource::WavePattern));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let series = zigzag_series(200);
        let first = analyze(&series, 7, Some(0.0), Some(55)).unwrap();
        let second = analyze(&series, 7, Some(0.0), Some(55)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_forecast_agrees_with_report() {
        let series = zigzag_series(200);
        let analysis = analyze(&series, 5, None, None).unwrap();
        let report = &analysis.report;
        let change = analysis.forecast.expected_percentage_change;

        assert!((report.bullish_probability + report.bearish_probability - 100.0).abs() < 0.1);
        if report.bullish_probability > report.bearish_probability {
            assert!(change >= 0.0);
        } else if report.bearish_probability > report.bullish_probability {
            assert!(change <= 0.0);
        }
    }
}
