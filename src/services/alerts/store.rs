//! In-memory registry of alert rules.

use crate::types::AlertRule;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Alert rules grouped by owner, in insertion order.
pub struct AlertStore {
    rules: DashMap<String, Vec<AlertRule>>,
}

impl AlertStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rules: DashMap::new(),
        })
    }

    pub fn add(&self, rule: AlertRule) {
        self.rules
            .entry(rule.owner_id.clone())
            .or_default()
            .push(rule);
    }

    /// Replace a rule in place, keeping its position. Returns false if the
    /// owner has no rule with that id.
    pub fn update(&self, rule: AlertRule) -> bool {
        let Some(mut rules) = self.rules.get_mut(&rule.owner_id) else {
            return false;
        };
        match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => {
                *existing = rule;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, owner_id: &str, rule_id: Uuid) -> Option<AlertRule> {
        let removed = {
            let mut rules = self.rules.get_mut(owner_id)?;
            let idx = rules.iter().position(|r| r.id == rule_id)?;
            rules.remove(idx)
        };
        self.rules.remove_if(owner_id, |_, rules| rules.is_empty());
        Some(removed)
    }

    pub fn get(&self, owner_id: &str, rule_id: Uuid) -> Option<AlertRule> {
        self.rules
            .get(owner_id)?
            .iter()
            .find(|r| r.id == rule_id)
            .cloned()
    }

    pub fn list(&self, owner_id: &str) -> Vec<AlertRule> {
        self.rules
            .get(owner_id)
            .map(|rules| rules.clone())
            .unwrap_or_default()
    }

    /// Owned copy of every rule: owners sorted, each owner's rules in
    /// insertion order.
    pub fn snapshot(&self) -> Vec<AlertRule> {
        let mut owners: Vec<(String, Vec<AlertRule>)> = self
            .rules
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        owners.sort_by(|a, b| a.0.cmp(&b.0));
        owners.into_iter().flat_map(|(_, rules)| rules).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlertWindow;

    #[test]
    fn test_add_and_list() {
        let store = AlertStore::new();
        let rule = AlertRule::new("1", "bitcoin", 5.0, AlertWindow::OneHour);
        store.add(rule.clone());

        assert_eq!(store.list("1"), vec![rule.clone()]);
        assert_eq!(store.get("1", rule.id), Some(rule));
        assert!(store.list("2").is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_in_place() {
        let store = AlertStore::new();
        let first = AlertRule::new("1", "bitcoin", 5.0, AlertWindow::OneHour);
        let second = AlertRule::new("1", "ethereum", 3.0, AlertWindow::FourHours);
        store.add(first.clone());
        store.add(second.clone());

        let mut edited = first.clone();
        edited.threshold_percent = 10.0;
        assert!(store.update(edited));

        let rules = store.list("1");
        assert_eq!(rules[0].id, first.id);
        assert_eq!(rules[0].threshold_percent, 10.0);
        assert_eq!(rules[1].id, second.id);

        let stranger = AlertRule::new("1", "bitcoin", 1.0, AlertWindow::OneHour);
        assert!(!store.update(stranger));
    }

    #[test]
    fn test_remove() {
        let store = AlertStore::new();
        let rule = AlertRule::new("1", "bitcoin", 5.0, AlertWindow::OneHour);
        store.add(rule.clone());

        assert!(store.remove("2", rule.id).is_none());
        assert_eq!(store.remove("1", rule.id), Some(rule.clone()));
        assert!(store.remove("1", rule.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_order() {
        let store = AlertStore::new();
        let b1 = AlertRule::new("bob", "bitcoin", 1.0, AlertWindow::OneHour);
        let a1 = AlertRule::new("alice", "solana", 1.0, AlertWindow::OneHour);
        let b2 = AlertRule::new("bob", "ethereum", 1.0, AlertWindow::OneHour);
        let a2 = AlertRule::new("alice", "bitcoin", 1.0, AlertWindow::OneHour);
        for rule in [&b1, &a1, &b2, &a2] {
            store.add(rule.clone());
        }

        let ids: Vec<Uuid> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a1.id, a2.id, b1.id, b2.id]);
    }
}
