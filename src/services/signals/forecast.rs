//! Log-return price forecast biased by the signal report.

use crate::error::AnalysisError;
use crate::types::{ForecastResult, PriceSeries, SignalReport, MIN_ANALYSIS_SAMPLES};
use statrs::statistics::Statistics;

/// Forecast the price `horizon_days` ahead.
///
/// The mean log-return is shifted by the report's sentiment factor times the
/// return standard deviation. When the result points against the dominant
/// probability it is mirrored so the forecast never contradicts the report.
pub fn forecast(
    series: &PriceSeries,
    report: &SignalReport,
    horizon_days: u32,
) -> Result<ForecastResult, AnalysisError> {
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

    let prices = series.prices();
    let last_price = *prices.last().ok_or(AnalysisError::InsufficientData)?;
    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();

    let mean = returns.iter().mean();
    let std_dev = returns.iter().std_dev();
    let adjusted_return = mean + report.sentiment_factor() * std_dev;
    let horizon = horizon_days as f64;

    let mut forecasted_price = last_price * (adjusted_return * horizon).exp();
    if report.bearish_probability > report.bullish_probability && forecasted_price > last_price {
        forecasted_price = last_price * (-adjusted_return.abs() * horizon).exp();
    } else if report.bullish_probability > report.bearish_probability
        && forecasted_price < last_price
    {
        forecasted_price = last_price * (adjusted_return.abs() * horizon).exp();
    }

    if !forecasted_price.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "forecast over {} days is out of range",
            horizon_days
        )));
    }

    Ok(ForecastResult {
        last_price,
        forecast_horizon_days: horizon_days,
        forecasted_price,
        expected_percentage_change: (forecasted_price - last_price) / last_price * 100.0,
    })
}
