//! Per-user conversational session flow.
//!
//! The flow is front-end agnostic: a chat bot or a web client sends
//! [`SessionAction`]s and renders whatever state comes back.

use super::alerts::AlertStore;
use super::coins::CoinDirectory;
use crate::error::SessionError;
use crate::types::{
    AlertRule, ConfirmedDraft, ForecastPeriod, SessionAction, SessionState, SignalDraft,
    SignalStep, UserSession,
};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// In-memory session records keyed by owner id.
pub struct SessionStore {
    sessions: DashMap<String, UserSession>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: DashMap::new(),
        })
    }

    /// Current session for an owner, or a fresh one if none exists yet.
    pub fn get(&self, owner_id: &str) -> UserSession {
        self.sessions
            .get(owner_id)
            .map(|s| s.clone())
            .unwrap_or_else(|| UserSession::new(owner_id))
    }

    /// Apply one action. On error the stored session is left untouched.
    pub fn apply(
        &self,
        owner_id: &str,
        action: SessionAction,
        alerts: &AlertStore,
        coins: &CoinDirectory,
    ) -> Result<UserSession, SessionError> {
        let current = self.get(owner_id);
        let mut next = current.clone();
        transition(&mut next, action, alerts, coins)?;
        next.updated_at = chrono::Utc::now().timestamp_millis();

        debug!(
            "Session {}: {} -> {}",
            owner_id,
            state_name(&current.state),
            state_name(&next.state)
        );
        self.sessions.insert(owner_id.to_string(), next.clone());
        Ok(next)
    }
}

fn transition(
    session: &mut UserSession,
    action: SessionAction,
    alerts: &AlertStore,
    coins: &CoinDirectory,
) -> Result<(), SessionError> {
    let state = std::mem::take(&mut session.state);

    let next = match (state, action) {
        (_, SessionAction::Start) => {
            *session = UserSession::new(session.owner_id.clone());
            SessionState::Idle
        }
        (_, SessionAction::Cancel) => SessionState::Idle,

        (SessionState::Idle, SessionAction::ChooseCoin) => SessionState::SelectingCoin,
        (SessionState::SelectingCoin, SessionAction::SelectCoin { coin }) => {
            session.selected_coin = resolve_coin(coins, &coin)?;
            SessionState::Idle
        }

        (SessionState::Idle, SessionAction::ChoosePeriod) => SessionState::SelectingPeriod,
        (SessionState::SelectingPeriod, SessionAction::SelectPeriod { days }) => {
            session.forecast_period = ForecastPeriod::from_days(days).ok_or_else(|| {
                SessionError::InvalidInput(format!("unsupported forecast period: {} days", days))
            })?;
            SessionState::Idle
        }

        (SessionState::Idle, SessionAction::AddSignal) => SessionState::ConfiguringSignal {
            step: SignalStep::SelectingCoin,
            draft: SignalDraft::default(),
        },
        (SessionState::Idle, SessionAction::EditSignal { rule_id }) => {
            let rule = alerts
                .get(&session.owner_id, rule_id)
                .ok_or(SessionError::RuleNotFound(rule_id))?;
            SessionState::ConfiguringSignal {
                step: SignalStep::SelectingCoin,
                draft: SignalDraft {
                    coin: Some(rule.coin),
                    threshold_percent: Some(rule.threshold_percent),
                    window: Some(rule.window),
                    editing: Some(rule.id),
                },
            }
        }

        (
            SessionState::ConfiguringSignal {
                step: SignalStep::SelectingCoin,
                mut draft,
            },
            SessionAction::SelectSignalCoin { coin },
        ) => {
            draft.coin = Some(resolve_coin(coins, &coin)?);
            SessionState::ConfiguringSignal {
                step: SignalStep::EnteringThreshold,
                draft,
            }
        }
        (
            SessionState::ConfiguringSignal {
                step: SignalStep::EnteringThreshold,
                mut draft,
            },
            SessionAction::EnterThreshold { text },
        ) => {
            draft.threshold_percent = Some(parse_threshold(&text)?);
            SessionState::ConfiguringSignal {
                step: SignalStep::SelectingWindow,
                draft,
            }
        }
        (
            SessionState::ConfiguringSignal {
                step: SignalStep::SelectingWindow,
                draft:
                    SignalDraft {
                        coin: Some(coin),
                        threshold_percent: Some(threshold_percent),
                        editing,
                        ..
                    },
            },
            SessionAction::SelectWindow { window },
        ) => SessionState::Confirming {
            draft: ConfirmedDraft {
                coin,
                threshold_percent,
                window,
                editing,
            },
        },

        (SessionState::Confirming { draft }, SessionAction::Confirm { accept }) => {
            if accept {
                save_rule(&session.owner_id, draft, alerts)?;
            }
            SessionState::Idle
        }

        (state, action) => {
            return Err(SessionError::InvalidTransition {
                action: action_name(&action).to_string(),
                state: state_name(&state).to_string(),
            });
        }
    };

    session.state = next;
    Ok(())
}

fn resolve_coin(coins: &CoinDirectory, input: &str) -> Result<String, SessionError> {
    coins
        .resolve(input)
        .ok_or_else(|| SessionError::InvalidInput(format!("unknown coin: {}", input.trim())))
}

/// Parse a user-typed percentage such as "10", "-2.5" or "7%". The sign is
/// dropped; zero and non-numbers are rejected.
pub fn parse_threshold(text: &str) -> Result<f64, SessionError> {
    let cleaned = text.trim().trim_end_matches('%').trim().replace(',', ".");
    let value: f64 = cleaned.parse().map_err(|_| {
        SessionError::InvalidInput(format!("'{}' is not a valid percentage", text.trim()))
    })?;

    let value = value.abs();
    if !value.is_finite() || value == 0.0 {
        return Err(SessionError::InvalidInput(format!(
            "'{}' is not a valid percentage",
            text.trim()
        )));
    }
    Ok(value)
}

fn save_rule(
    owner_id: &str,
    draft: ConfirmedDraft,
    alerts: &AlertStore,
) -> Result<(), SessionError> {
    match draft.editing {
        Some(rule_id) => {
            let mut rule = alerts
                .get(owner_id, rule_id)
                .ok_or(SessionError::RuleNotFound(rule_id))?;
            rule.coin = draft.coin;
            rule.threshold_percent = draft.threshold_percent;
            rule.window = draft.window;
            if !alerts.update(rule) {
                return Err(SessionError::RuleNotFound(rule_id));
            }
        }
        None => alerts.add(AlertRule::new(
            owner_id,
            draft.coin,
            draft.threshold_percent,
            draft.window,
        )),
    }
    Ok(())
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::SelectingCoin => "selecting_coin",
        SessionState::SelectingPeriod => "selecting_period",
        SessionState::ConfiguringSignal { step, .. } => match step {
            SignalStep::SelectingCoin => "configuring_signal:selecting_coin",
            SignalStep::EnteringThreshold => "configuring_signal:entering_threshold",
            SignalStep::SelectingWindow => "configuring_signal:selecting_window",
        },
        SessionState::Confirming { .. } => "confirming",
    }
}

fn action_name(action: &SessionAction) -> &'static str {
    match action {
        SessionAction::Start => "start",
        SessionAction::ChooseCoin => "choose_coin",
        SessionAction::SelectCoin { .. } => "select_coin",
        SessionAction::ChoosePeriod => "choose_period",
        SessionAction::SelectPeriod { .. } => "select_period",
        SessionAction::AddSignal => "add_signal",
        SessionAction::EditSignal { .. } => "edit_signal",
        SessionAction::SelectSignalCoin { .. } => "select_signal_coin",
        SessionAction::EnterThreshold { .. } => "enter_threshold",
        SessionAction::SelectWindow { .. } => "select_window",
        SessionAction::Confirm { .. } => "confirm",
        SessionAction::Cancel => "cancel",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertWindow, CoinInfo};

    struct Fixture {
        sessions: Arc<SessionStore>,
        alerts: Arc<AlertStore>,
        coins: Arc<CoinDirectory>,
    }

    impl Fixture {
        fn new() -> Self {
            let coins = CoinDirectory::new();
            coins.load(vec![
                CoinInfo {
                    symbol: "BTC".to_string(),
                    id: "bitcoin".to_string(),
                },
                CoinInfo {
                    symbol: "ETH".to_string(),
                    id: "ethereum".to_string(),
                },
            ]);
            Self {
                sessions: SessionStore::new(),
                alerts: AlertStore::new(),
                coins,
            }
        }

        fn apply(&self, action: SessionAction) -> Result<UserSession, SessionError> {
            self.sessions.apply("7", action, &self.alerts, &self.coins)
        }
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("10"), Ok(10.0));
        assert_eq!(parse_threshold(" -2.5 "), Ok(2.5));
        assert_eq!(parse_threshold("7%"), Ok(7.0));
        assert_eq!(parse_threshold("1,5"), Ok(1.5));
        assert!(parse_threshold("ten").is_err());
        assert!(parse_threshold("0").is_err());
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("inf").is_err());
    }

    #[test]
    fn test_select_coin_and_period() {
        let f = Fixture::new();
        f.apply(SessionAction::ChooseCoin).unwrap();
        let session = f
            .apply(SessionAction::SelectCoin {
                coin: "eth".to_string(),
            })
            .unwrap();
        assert_eq!(session.selected_coin, "ethereum");
        assert_eq!(session.state, SessionState::Idle);

        f.apply(SessionAction::ChoosePeriod).unwrap();
        let session = f.apply(SessionAction::SelectPeriod { days: 30 }).unwrap();
        assert_eq!(session.forecast_period, ForecastPeriod::OneMonth);
    }

    #[test]
    fn test_invalid_period_keeps_state() {
        let f = Fixture::new();
        f.apply(SessionAction::ChoosePeriod).unwrap();
        let err = f.apply(SessionAction::SelectPeriod { days: 2 }).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert_eq!(f.sessions.get("7").state, SessionState::SelectingPeriod);
    }

    #[test]
    fn test_add_signal_flow() {
        let f = Fixture::new();
        f.apply(SessionAction::AddSignal).unwrap();
        f.apply(SessionAction::SelectSignalCoin {
            coin: "BTC".to_string(),
        })
        .unwrap();

        let err = f
            .apply(SessionAction::EnterThreshold {
                text: "lots".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));

        f.apply(SessionAction::EnterThreshold {
            text: "-5".to_string(),
        })
        .unwrap();
        let session = f
            .apply(SessionAction::SelectWindow {
                window: AlertWindow::FourHours,
            })
            .unwrap();
        assert_eq!(
            session.state,
            SessionState::Confirming {
                draft: ConfirmedDraft {
                    coin: "bitcoin".to_string(),
                    threshold_percent: 5.0,
                    window: AlertWindow::FourHours,
                    editing: None,
                }
            }
        );

        let session = f.apply(SessionAction::Confirm { accept: true }).unwrap();
        assert_eq!(session.state, SessionState::Idle);
        let rules = f.alerts.list("7");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].threshold_percent, 5.0);
        assert_eq!(rules[0].window, AlertWindow::FourHours);
    }

    #[test]
    fn test_declined_confirmation_saves_nothing() {
        let f = Fixture::new();
        f.apply(SessionAction::AddSignal).unwrap();
        f.apply(SessionAction::SelectSignalCoin {
            coin: "bitcoin".to_string(),
        })
        .unwrap();
        f.apply(SessionAction::EnterThreshold {
            text: "3".to_string(),
        })
        .unwrap();
        f.apply(SessionAction::SelectWindow {
            window: AlertWindow::OneHour,
        })
        .unwrap();
        f.apply(SessionAction::Confirm { accept: false }).unwrap();
        assert!(f.alerts.is_empty());
    }

    #[test]
    fn test_edit_signal_updates_in_place() {
        let f = Fixture::new();
        let rule = AlertRule::new("7", "bitcoin", 5.0, AlertWindow::OneHour);
        f.alerts.add(rule.clone());

        let session = f
            .apply(SessionAction::EditSignal { rule_id: rule.id })
            .unwrap();
        let SessionState::ConfiguringSignal { draft, .. } = session.state else {
            panic!("expected configuring state");
        };
        assert_eq!(draft.coin.as_deref(), Some("bitcoin"));
        assert_eq!(draft.editing, Some(rule.id));

        f.apply(SessionAction::SelectSignalCoin {
            coin: "ETH".to_string(),
        })
        .unwrap();
        f.apply(SessionAction::EnterThreshold {
            text: "12".to_string(),
        })
        .unwrap();
        f.apply(SessionAction::SelectWindow {
            window: AlertWindow::OneDay,
        })
        .unwrap();
        f.apply(SessionAction::Confirm { accept: true }).unwrap();

        let rules = f.alerts.list("7");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, rule.id);
        assert_eq!(rules[0].coin, "ethereum");
        assert_eq!(rules[0].threshold_percent, 12.0);
        assert_eq!(rules[0].window, AlertWindow::OneDay);
    }

    #[test]
    fn test_edit_unknown_rule() {
        let f = Fixture::new();
        let missing = uuid::Uuid::new_v4();
        assert_eq!(
            f.apply(SessionAction::EditSignal { rule_id: missing }),
            Err(SessionError::RuleNotFound(missing))
        );
    }

    #[test]
    fn test_invalid_transition() {
        let f = Fixture::new();
        let err = f.apply(SessionAction::Confirm { accept: true }).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                action: "confirm".to_string(),
                state: "idle".to_string(),
            }
        );
    }

    #[test]
    fn test_cancel_and_start() {
        let f = Fixture::new();
        f.apply(SessionAction::ChooseCoin).unwrap();
        f.apply(SessionAction::SelectCoin {
            coin: "eth".to_string(),
        })
        .unwrap();
        f.apply(SessionAction::AddSignal).unwrap();

        let session = f.apply(SessionAction::Cancel).unwrap();
        assert_eq!(session.state, SessionState::Idle);
        assert_eq!(session.selected_coin, "ethereum");

        let session = f.apply(SessionAction::Start).unwrap();
        assert_eq!(session.selected_coin, "bitcoin");
        assert_eq!(session.forecast_period, ForecastPeriod::OneDay);
    }
}
