//! Threshold rules turning indicator readings into weighted votes.

use crate::types::{IndicatorSnapshot, IndicatorVote, VoteSource};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const CCI_OVERSOLD: f64 = -100.0;
pub const CCI_OVERBOUGHT: f64 = 100.0;
pub const STOCH_OVERSOLD: f64 = 20.0;
pub const STOCH_OVERBOUGHT: f64 = 80.0;
pub const ADX_STRONG_TREND: f64 = 25.0;
pub const SENTIMENT_BAND: f64 = 0.05;
pub const MOOD_FEAR: u8 = 40;
pub const MOOD_GREED: u8 = 60;

const INDICATOR_WEIGHT: u32 = 1;
const SENTIMENT_WEIGHT: u32 = 2;

/// Produce one vote per available reading, in report order.
///
/// Readings that are missing from the snapshot cast no vote. Values sitting
/// exactly on a threshold are neutral, except for the forced splits (moving
/// averages, ADX and volume) which always pick a side.
pub fn classify(snapshot: &IndicatorSnapshot) -> Vec<IndicatorVote> {
    let mut votes = Vec::new();

    if let (Some(short), Some(long)) = (snapshot.sma_short, snapshot.sma_long) {
        votes.push(crossover(VoteSource::SmaCrossover, "SMA", short, long));
    }
    if let (Some(short), Some(long)) = (snapshot.ema_short, snapshot.ema_long) {
        votes.push(crossover(VoteSource::EmaCrossover, "EMA", short, long));
    }

    if let Some(rsi) = snapshot.rsi {
        votes.push(oscillator(
            VoteSource::Rsi,
            rsi,
            RSI_OVERSOLD,
            RSI_OVERBOUGHT,
            "RSI",
        ));
    }

    if let Some(macd) = snapshot.macd {
        let vote = if macd.macd > macd.signal {
            IndicatorVote::bullish(
                VoteSource::Macd,
                INDICATOR_WEIGHT,
                "MACD above signal line (bullish signal).",
            )
        } else if macd.macd < macd.signal {
            IndicatorVote::bearish(
                VoteSource::Macd,
                INDICATOR_WEIGHT,
                "MACD below signal line (bearish signal).",
            )
        } else {
            IndicatorVote::neutral(VoteSource::Macd, "MACD on its signal line.")
        };
        votes.push(vote);
    }

    if let (Some(price), Some(bands)) = (snapshot.price, snapshot.bollinger) {
        let vote = if price < bands.lower {
            IndicatorVote::bullish(
                VoteSource::BollingerBands,
                INDICATOR_WEIGHT,
                "Price below lower Bollinger Band (bullish signal).",
            )
        } else if price > bands.upper {
            IndicatorVote::bearish(
                VoteSource::BollingerBands,
                INDICATOR_WEIGHT,
                "Price above upper Bollinger Band (bearish signal).",
            )
        } else {
            IndicatorVote::neutral(VoteSource::BollingerBands, "Price inside Bollinger Bands.")
        };
        votes.push(vote);
    }

    if let Some(cci) = snapshot.cci {
        votes.push(oscillator(
            VoteSource::Cci,
            cci,
            CCI_OVERSOLD,
            CCI_OVERBOUGHT,
            "CCI",
        ));
    }

    if let Some(stoch) = snapshot.stochastic {
        votes.push(oscillator(
            VoteSource::Stochastic,
            stoch.k,
            STOCH_OVERSOLD,
            STOCH_OVERBOUGHT,
            "Stochastic",
        ));
    }

    if let Some(adx) = snapshot.adx {
        let vote = if adx > ADX_STRONG_TREND {
            IndicatorVote::bullish(
                VoteSource::Adx,
                INDICATOR_WEIGHT,
                format!("ADX {:.1} indicates a strong trend.", adx),
            )
        } else {
            IndicatorVote::bearish(
                VoteSource::Adx,
                INDICATOR_WEIGHT,
                format!("ADX {:.1} indicates a weak trend.", adx),
            )
        };
        votes.push(vote);
    }

    if let (Some(current), Some(mean)) = (snapshot.volume, snapshot.volume_mean) {
        let vote = if current > mean {
            IndicatorVote::bullish(
                VoteSource::Volume,
                INDICATOR_WEIGHT,
                "Trading volume above average (trend confirmation).",
            )
        } else {
            IndicatorVote::bearish(
                VoteSource::Volume,
                INDICATOR_WEIGHT,
                "Trading volume below average (possible trend weakness).",
            )
        };
        votes.push(vote);
    }

    if let Some(score) = snapshot.sentiment {
        let vote = if score > SENTIMENT_BAND {
            IndicatorVote::bullish(
                VoteSource::Sentiment,
                SENTIMENT_WEIGHT,
                format!("News sentiment: positive ({:.2}).", score),
            )
        } else if score < -SENTIMENT_BAND {
            IndicatorVote::bearish(
                VoteSource::Sentiment,
                SENTIMENT_WEIGHT,
                format!("News sentiment: negative ({:.2}).", score),
            )
        } else {
            IndicatorVote::neutral(
                VoteSource::Sentiment,
                format!("News sentiment: neutral ({:.2}).", score),
            )
        };
        votes.push(vote);
    }

    if let Some(index) = snapshot.market_mood {
        let vote = if index < MOOD_FEAR {
            IndicatorVote::bullish(
                VoteSource::MarketMood,
                INDICATOR_WEIGHT,
                format!("Fear & greed index {}: market in fear (buying opportunity).", index),
            )
        } else if index > MOOD_GREED {
            IndicatorVote::bearish(
                VoteSource::MarketMood,
                INDICATOR_WEIGHT,
                format!("Fear & greed index {}: market in greed (selling opportunity).", index),
            )
        } else {
            IndicatorVote::neutral(
                VoteSource::MarketMood,
                format!("Fear & greed index {}: market balanced.", index),
            )
        };
        votes.push(vote);
    }

    votes
}

/// Forced split: short above long is bullish, anything else bearish.
fn crossover(source: VoteSource, label: &str, short: f64, long: f64) -> IndicatorVote {
    if short > long {
        IndicatorVote::bullish(
            source,
            INDICATOR_WEIGHT,
            format!("Short-term {label} above long-term {label} (bullish signal)."),
        )
    } else {
        IndicatorVote::bearish(
            source,
            INDICATOR_WEIGHT,
            format!("Short-term {label} below long-term {label} (bearish signal)."),
        )
    }
}

/// Overbought/oversold band; the band edges themselves are neutral.
fn oscillator(
    source: VoteSource,
    value: f64,
    oversold: f64,
    overbought: f64,
    label: &str,
) -> IndicatorVote {
    if value < oversold {
        IndicatorVote::bullish(
            source,
            INDICATOR_WEIGHT,
            format!("{label} indicates oversold conditions (bullish signal)."),
        )
    } else if value > overbought {
        IndicatorVote::bearish(
            source,
            INDICATOR_WEIGHT,
            format!("{label} indicates overbought conditions (bearish signal)."),
        )
    } else {
        IndicatorVote::neutral(source, format!("{label} is in its normal range."))
    }
}
