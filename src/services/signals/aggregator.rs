//! Combine votes into bullish/bearish probabilities.

use crate::types::{IndicatorVote, SignalReport, VoteDirection, WaveAnalysis};

/// Merge classifier votes with the wave result into a report.
///
/// Votes are ordered by source so the rendered report reads moving averages
/// first and market mood last, whatever order they arrived in.
pub fn aggregate(mut votes: Vec<IndicatorVote>, wave: &WaveAnalysis) -> SignalReport {
    votes.push(wave.to_vote());
    votes.sort_by_key(|v| v.source);

    let weight_for = |direction: VoteDirection| -> u32 {
        votes
            .iter()
            .filter(|v| v.direction == direction)
            .map(|v| v.weight)
            .sum()
    };
    let bullish_weight = weight_for(VoteDirection::Bullish);
    let bearish_weight = weight_for(VoteDirection::Bearish);

    let (bullish_probability, bearish_probability) = match bullish_weight + bearish_weight {
        0 => (50.0, 50.0),
        total => (
            bullish_weight as f64 / total as f64 * 100.0,
            bearish_weight as f64 / total as f64 * 100.0,
        ),
    };

    SignalReport {
        votes,
        bullish_weight,
        bearish_weight,
        bullish_probability,
        bearish_probability,
    }
}
