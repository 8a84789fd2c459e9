use serde::{Deserialize, Serialize};

/// Direction a single piece of evidence points in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl VoteDirection {
    /// Marker used at the start of rendered vote lines.
    pub fn marker(&self) -> &'static str {
        match self {
            VoteDirection::Bullish => "📈",
            VoteDirection::Bearish => "📉",
            VoteDirection::Neutral => "⚪️",
        }
    }
}

/// Evidence source behind a vote.
///
/// Variant order is the display order of the signal report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteSource {
    SmaCrossover,
    EmaCrossover,
    Rsi,
    Macd,
    BollingerBands,
    Cci,
    Stochastic,
    Adx,
    WavePattern,
    Volume,
    Sentiment,
    MarketMood,
}

impl VoteSource {
    pub fn name(&self) -> &'static str {
        match self {
            VoteSource::SmaCrossover => "SMA (20/50)",
            VoteSource::EmaCrossover => "EMA (20/50)",
            VoteSource::Rsi => "RSI (14)",
            VoteSource::Macd => "MACD",
            VoteSource::BollingerBands => "Bollinger Bands",
            VoteSource::Cci => "CCI (20)",
            VoteSource::Stochastic => "Stochastic",
            VoteSource::Adx => "ADX (14)",
            VoteSource::WavePattern => "Elliott Wave",
            VoteSource::Volume => "Volume",
            VoteSource::Sentiment => "News Sentiment",
            VoteSource::MarketMood => "Fear & Greed",
        }
    }
}

/// A weighted directional vote produced by one evidence source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorVote {
    pub source: VoteSource,
    pub direction: VoteDirection,
    /// Weight counted towards `direction`; neutral votes carry zero.
    pub weight: u32,
    pub description: String,
}

impl IndicatorVote {
    pub fn new(
        source: VoteSource,
        direction: VoteDirection,
        weight: u32,
        description: impl Into<String>,
    ) -> Self {
        let weight = if direction == VoteDirection::Neutral {
            0
        } else {
            weight
        };
        Self {
            source,
            direction,
            weight,
            description: description.into(),
        }
    }

    pub fn bullish(source: VoteSource, weight: u32, description: impl Into<String>) -> Self {
        Self::new(source, VoteDirection::Bullish, weight, description)
    }

    pub fn bearish(source: VoteSource, weight: u32, description: impl Into<String>) -> Self {
        Self::new(source, VoteDirection::Bearish, weight, description)
    }

    pub fn neutral(source: VoteSource, description: impl Into<String>) -> Self {
        Self::new(source, VoteDirection::Neutral, 0, description)
    }

    /// Rendered line for the report, prefixed with the direction marker.
    pub fn line(&self) -> String {
        format!("{} {}", self.direction.marker(), self.description)
    }
}

/// Moving average convergence/divergence reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
}

/// Bollinger band levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandReading {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Stochastic oscillator %K and %D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StochasticReading {
    pub k: f64,
    pub d: f64,
}

/// Latest indicator values for one series, plus external inputs.
///
/// Every field is optional: an indicator without enough history, or an
/// external feed that failed, is simply absent and casts no vote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub price: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdReading>,
    pub bollinger: Option<BandReading>,
    pub cci: Option<f64>,
    pub stochastic: Option<StochasticReading>,
    pub atr: Option<f64>,
    pub obv: Option<f64>,
    pub adx: Option<f64>,
    pub volume: Option<f64>,
    pub volume_mean: Option<f64>,
    /// News sentiment score in -1.0..=1.0.
    pub sentiment: Option<f64>,
    /// Fear & greed index in 0..=100.
    pub market_mood: Option<u8>,
}

/// Kind of local extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremumKind {
    Min,
    Max,
}

/// Local price extremum at a series position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extremum {
    pub position: usize,
    pub price: f64,
    pub kind: ExtremumKind,
}

/// Nine alternating extrema: min, max, min, max, min, max, min, max, min.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WavePattern {
    pub extrema: Vec<Extremum>,
}

impl WavePattern {
    pub const LEN: usize = 9;

    /// Canonical kind sequence a matching window must have.
    pub const SHAPE: [ExtremumKind; 9] = [
        ExtremumKind::Min,
        ExtremumKind::Max,
        ExtremumKind::Min,
        ExtremumKind::Max,
        ExtremumKind::Min,
        ExtremumKind::Max,
        ExtremumKind::Min,
        ExtremumKind::Max,
        ExtremumKind::Min,
    ];

    /// Wraps a window of extrema if its kinds match [`Self::SHAPE`].
    pub fn from_window(window: &[Extremum]) -> Option<Self> {
        let matches = window.len() == Self::LEN
            && window.iter().zip(Self::SHAPE.iter()).all(|(e, k)| e.kind == *k);
        matches.then(|| Self {
            extrema: window.to_vec(),
        })
    }

    fn leg(&self, from: usize) -> f64 {
        self.extrema[from + 1].price - self.extrema[from].price
    }

    pub fn wave1(&self) -> f64 {
        self.leg(0)
    }

    pub fn wave3(&self) -> f64 {
        self.leg(2)
    }

    pub fn wave5(&self) -> f64 {
        self.leg(4)
    }

    /// Wave 3 longer than wave 1, and wave 5 shorter than wave 3.
    pub fn is_impulse(&self) -> bool {
        self.wave3().abs() > self.wave1().abs() && self.wave5().abs() < self.wave3().abs()
    }

    /// Inclusive series positions spanned by the pattern.
    pub fn span(&self) -> (usize, usize) {
        (self.extrema[0].position, self.extrema[Self::LEN - 1].position)
    }
}

/// Outcome of the Elliott wave heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaveAnalysis {
    /// Fewer than nine extrema in the series.
    InsufficientData,
    /// No nine-extrema window alternates correctly.
    PatternNotFound,
    /// Alternation found, but wave lengths fail the impulse rule.
    Corrective { pattern: WavePattern },
    /// Impulse on above-average volume: correction expected.
    ImpulseCompleting { pattern: WavePattern },
    /// Impulse on ordinary volume: trend continues.
    ImpulseContinuing { pattern: WavePattern },
}

impl WaveAnalysis {
    pub const WEIGHT: u32 = 2;

    pub fn direction(&self) -> VoteDirection {
        match self {
            WaveAnalysis::ImpulseContinuing { .. } => VoteDirection::Bullish,
            WaveAnalysis::ImpulseCompleting { .. } => VoteDirection::Bearish,
            _ => VoteDirection::Neutral,
        }
    }

    pub fn pattern(&self) -> Option<&WavePattern> {
        match self {
            WaveAnalysis::Corrective { pattern }
            | WaveAnalysis::ImpulseCompleting { pattern }
            | WaveAnalysis::ImpulseContinuing { pattern } => Some(pattern),
            _ => None,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            WaveAnalysis::InsufficientData => "not enough extrema to analyse Elliott waves",
            WaveAnalysis::PatternNotFound => "could not identify Elliott waves",
            WaveAnalysis::Corrective { .. } => "corrective wave, possible trend reversal",
            WaveAnalysis::ImpulseCompleting { .. } => {
                "impulse wave completing, correction likely (bearish signal)"
            }
            WaveAnalysis::ImpulseContinuing { .. } => "impulse wave continuing (bullish signal)",
        }
    }

    /// The wave result expressed as a report vote.
    pub fn to_vote(&self) -> IndicatorVote {
        IndicatorVote::new(
            VoteSource::WavePattern,
            self.direction(),
            Self::WEIGHT,
            format!("Elliott wave analysis: {}.", self.summary()),
        )
    }
}

/// Aggregated directional evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    /// Votes in display order.
    pub votes: Vec<IndicatorVote>,
    pub bullish_weight: u32,
    pub bearish_weight: u32,
    /// Percentage in 0..=100.
    pub bullish_probability: f64,
    /// Percentage in 0..=100.
    pub bearish_probability: f64,
}

impl SignalReport {
    pub fn total_weight(&self) -> u32 {
        self.bullish_weight + self.bearish_weight
    }

    /// Net vote balance in -1.0..=1.0, zero when nothing voted.
    pub fn sentiment_factor(&self) -> f64 {
        match self.total_weight() {
            0 => 0.0,
            total => (self.bullish_weight as f64 - self.bearish_weight as f64) / total as f64,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.votes.iter().map(IndicatorVote::line).collect()
    }
}

/// Point forecast of future price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub last_price: f64,
    pub forecast_horizon_days: u32,
    pub forecasted_price: f64,
    pub expected_percentage_change: f64,
}

/// Full analysis output for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub indicators: IndicatorSnapshot,
    pub wave: WaveAnalysis,
    pub report: SignalReport,
    pub forecast: ForecastResult,
}

impl Analysis {
    /// Human-readable summary: vote lines, probabilities, price and forecast.
    pub fn render(&self, coin_label: &str) -> String {
        let mut text = self.report.lines().join("\n");
        text.push_str(&format!(
            "\n\n📈 Probability of price increase: {:.1}%\n📉 Probability of price decrease: {:.1}%",
            self.report.bullish_probability, self.report.bearish_probability
        ));
        text.push_str(&format!(
            "\n\n💰 Current {} price: ${:.4}",
            coin_label.to_uppercase(),
            self.forecast.last_price
        ));
        text.push_str(&format!(
            "\n💱 Forecast price in {} days: ${:.4} ({:+.2}%)",
            self.forecast.forecast_horizon_days,
            self.forecast.forecasted_price,
            self.forecast.expected_percentage_change
        ));
        text
    }
}
