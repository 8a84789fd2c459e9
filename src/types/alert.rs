use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Look-back window of a price-move alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertWindow {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "24h")]
    OneDay,
}

impl AlertWindow {
    pub const ALL: [AlertWindow; 4] = [
        AlertWindow::OneHour,
        AlertWindow::FourHours,
        AlertWindow::TwelveHours,
        AlertWindow::OneDay,
    ];

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1h" => Some(Self::OneHour),
            "4h" => Some(Self::FourHours),
            "12h" => Some(Self::TwelveHours),
            "24h" | "1d" => Some(Self::OneDay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::TwelveHours => "12h",
            Self::OneDay => "24h",
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneHour => "1 hour",
            Self::FourHours => "4 hours",
            Self::TwelveHours => "12 hours",
            Self::OneDay => "1 day",
        }
    }

    pub fn duration_ms(&self) -> i64 {
        match self {
            Self::OneHour => 3_600_000,
            Self::FourHours => 14_400_000,
            Self::TwelveHours => 43_200_000,
            Self::OneDay => 86_400_000,
        }
    }

    /// Whole days of history needed to find a baseline one window back,
    /// with a day of margin for sampling gaps at the far edge.
    pub fn fetch_days(&self) -> u32 {
        const DAY_MS: i64 = 86_400_000;
        ((self.duration_ms() + DAY_MS - 1) / DAY_MS) as u32 + 1
    }
}

/// A user-registered price-move threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: Uuid,
    pub owner_id: String,
    /// CoinGecko coin id (e.g. "bitcoin").
    pub coin: String,
    /// Absolute move, in percent, that triggers the alert.
    pub threshold_percent: f64,
    pub window: AlertWindow,
    /// Unix timestamp (milliseconds) when the rule was registered.
    pub created_at: i64,
}

impl AlertRule {
    pub fn new(
        owner_id: impl Into<String>,
        coin: impl Into<String>,
        threshold_percent: f64,
        window: AlertWindow,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            coin: coin.into(),
            threshold_percent,
            window,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// One-line summary, e.g. "BITCOIN: 5% move over 1 hour".
    pub fn describe(&self) -> String {
        format!(
            "{}: {}% move over {}",
            self.coin.to_uppercase(),
            self.threshold_percent,
            self.window.label()
        )
    }
}

/// Direction of an observed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn verb(&self) -> &'static str {
        match self {
            MoveDirection::Up => "rose",
            MoveDirection::Down => "fell",
        }
    }
}

/// Raised when a rule's threshold is crossed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub rule_id: Uuid,
    pub owner_id: String,
    pub coin: String,
    pub observed_percentage_change: f64,
    pub window: AlertWindow,
    pub direction: MoveDirection,
    pub baseline_price: f64,
    pub latest_price: f64,
    /// Evaluation time (Unix milliseconds).
    pub timestamp: i64,
}

impl AlertEvent {
    /// Notification text sent to the owner, naming the coin as `label`
    /// (usually its ticker).
    pub fn message(&self, label: &str) -> String {
        format!(
            "🚨 Price of {} {} by {:.2}% over the last {}!",
            label,
            self.direction.verb(),
            self.observed_percentage_change.abs(),
            self.window.label()
        )
    }
}

/// Why a rule stayed quiet this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuietReason {
    BelowThreshold,
    /// No sample old enough to cover the window.
    NoBaseline,
    /// Series fetch failed.
    DataUnavailable,
}

/// Terminal state of a rule after one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RuleState {
    Quiet { reason: QuietReason },
    Fired { event: AlertEvent },
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub rule_id: Uuid,
    pub owner_id: String,
    pub state: RuleState,
}

impl RuleEvaluation {
    pub fn event(&self) -> Option<&AlertEvent> {
        match &self.state {
            RuleState::Fired { event } => Some(event),
            RuleState::Quiet { .. } => None,
        }
    }
}

/// What happens to a rule after it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertFirePolicy {
    /// Rule stays registered and may fire again next cycle.
    #[default]
    KeepArmed,
    /// Rule is removed once its notification is sent.
    RetireOnFire,
}

impl AlertFirePolicy {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keep" | "keep_armed" | "armed" => Some(Self::KeepArmed),
            "retire" | "retire_on_fire" | "once" => Some(Self::RetireOnFire),
            _ => None,
        }
    }
}

/// A notification delivered to an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub owner_id: String,
    pub message: String,
    /// Timestamp in milliseconds
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_from_str() {
        assert_eq!(AlertWindow::from_str("1h"), Some(AlertWindow::OneHour));
        assert_eq!(AlertWindow::from_str("12H"), Some(AlertWindow::TwelveHours));
        assert_eq!(AlertWindow::from_str("1d"), Some(AlertWindow::OneDay));
        assert_eq!(AlertWindow::from_str("2h"), None);
    }

    #[test]
    fn test_window_serialization() {
        let json = serde_json::to_string(&AlertWindow::FourHours).unwrap();
        assert_eq!(json, "\"4h\"");
        let parsed: AlertWindow = serde_json::from_str("\"24h\"").unwrap();
        assert_eq!(parsed, AlertWindow::OneDay);
    }

    #[test]
    fn test_window_durations() {
        assert_eq!(AlertWindow::OneHour.duration_ms(), 3_600_000);
        assert_eq!(AlertWindow::OneDay.duration_ms(), 24 * AlertWindow::OneHour.duration_ms());
    }

    #[test]
    fn test_window_fetch_days_reach_past_window() {
        assert_eq!(AlertWindow::OneHour.fetch_days(), 2);
        assert_eq!(AlertWindow::TwelveHours.fetch_days(), 2);
        assert_eq!(AlertWindow::OneDay.fetch_days(), 2);
    }

    #[test]
    fn test_event_message() {
        let event = AlertEvent {
            rule_id: Uuid::new_v4(),
            owner_id: "42".to_string(),
            coin: "btc".to_string(),
            observed_percentage_change: -6.0,
            window: AlertWindow::OneHour,
            direction: MoveDirection::Down,
            baseline_price: 100.0,
            latest_price: 94.0,
            timestamp: 0,
        };
        assert_eq!(
            event.message("BTC"),
            "🚨 Price of BTC fell by 6.00% over the last 1 hour!"
        );
    }

    #[test]
    fn test_fire_policy_from_str() {
        assert_eq!(AlertFirePolicy::from_str("keep"), Some(AlertFirePolicy::KeepArmed));
        assert_eq!(AlertFirePolicy::from_str("RETIRE"), Some(AlertFirePolicy::RetireOnFire));
        assert_eq!(AlertFirePolicy::from_str("sometimes"), None);
        assert_eq!(AlertFirePolicy::default(), AlertFirePolicy::KeepArmed);
    }
}
