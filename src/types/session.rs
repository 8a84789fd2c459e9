use super::AlertWindow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coin selected for new sessions.
pub const DEFAULT_COIN: &str = "bitcoin";

/// Forecast horizons offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForecastPeriod {
    #[default]
    OneDay,
    ThreeDays,
    FiveDays,
    OneWeek,
    OneMonth,
    OneYear,
}

impl ForecastPeriod {
    pub const ALL: [ForecastPeriod; 6] = [
        ForecastPeriod::OneDay,
        ForecastPeriod::ThreeDays,
        ForecastPeriod::FiveDays,
        ForecastPeriod::OneWeek,
        ForecastPeriod::OneMonth,
        ForecastPeriod::OneYear,
    ];

    pub fn days(&self) -> u32 {
        match self {
            Self::OneDay => 1,
            Self::ThreeDays => 3,
            Self::FiveDays => 5,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::OneYear => 365,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.days() == days)
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneDay => "1 day",
            Self::ThreeDays => "3 days",
            Self::FiveDays => "5 days",
            Self::OneWeek => "1 week",
            Self::OneMonth => "1 month",
            Self::OneYear => "1 year",
        }
    }
}

/// Step within the alert configuration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStep {
    SelectingCoin,
    EnteringThreshold,
    SelectingWindow,
}

/// Partially configured alert rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDraft {
    pub coin: Option<String>,
    pub threshold_percent: Option<f64>,
    pub window: Option<AlertWindow>,
    /// Rule being edited, if this draft replaces an existing one.
    pub editing: Option<Uuid>,
}

/// Fully configured draft awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedDraft {
    pub coin: String,
    pub threshold_percent: f64,
    pub window: AlertWindow,
    pub editing: Option<Uuid>,
}

/// Where a user currently is in the conversational flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    SelectingCoin,
    SelectingPeriod,
    ConfiguringSignal { step: SignalStep, draft: SignalDraft },
    Confirming { draft: ConfirmedDraft },
}

/// Input from the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    Start,
    ChooseCoin,
    SelectCoin { coin: String },
    ChoosePeriod,
    SelectPeriod { days: u32 },
    AddSignal,
    EditSignal { rule_id: Uuid },
    SelectSignalCoin { coin: String },
    /// Free-text percentage as typed by the user.
    EnterThreshold { text: String },
    SelectWindow { window: AlertWindow },
    Confirm { accept: bool },
    Cancel,
}

/// Per-user session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub owner_id: String,
    pub selected_coin: String,
    pub forecast_period: ForecastPeriod,
    pub state: SessionState,
    /// Unix timestamp (milliseconds) of the last transition.
    pub updated_at: i64,
}

impl UserSession {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            selected_coin: DEFAULT_COIN.to_string(),
            forecast_period: ForecastPeriod::default(),
            state: SessionState::Idle,
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_period_days() {
        let days: Vec<u32> = ForecastPeriod::ALL.iter().map(|p| p.days()).collect();
        assert_eq!(days, vec![1, 3, 5, 7, 30, 365]);
        assert_eq!(ForecastPeriod::from_days(7), Some(ForecastPeriod::OneWeek));
        assert_eq!(ForecastPeriod::from_days(2), None);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = UserSession::new("7");
        assert_eq!(session.selected_coin, "bitcoin");
        assert_eq!(session.forecast_period, ForecastPeriod::OneDay);
        assert_eq!(session.state, SessionState::Idle);
    }

    #[test]
    fn test_action_deserialization() {
        let action: SessionAction =
            serde_json::from_str(r#"{"action":"enter_threshold","text":"10"}"#).unwrap();
        assert_eq!(
            action,
            SessionAction::EnterThreshold {
                text: "10".to_string()
            }
        );

        let action: SessionAction =
            serde_json::from_str(r#"{"action":"select_window","window":"4h"}"#).unwrap();
        assert_eq!(
            action,
            SessionAction::SelectWindow {
                window: AlertWindow::FourHours
            }
        );
    }
}
