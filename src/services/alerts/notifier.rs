//! Notification delivery for fired alerts.

use crate::types::Notification;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::info;

/// Receives one message per fired alert.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, owner_id: &str, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, owner_id: &str, message: &str) {
        info!(owner = owner_id, "{}", message);
    }
}

/// Per-owner feed of the most recent notifications.
pub struct AlertInbox {
    feeds: DashMap<String, VecDeque<Notification>>,
    capacity: usize,
}

impl AlertInbox {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            feeds: DashMap::new(),
            capacity: capacity.max(1),
        })
    }

    pub fn push(&self, notification: Notification) {
        let mut feed = self
            .feeds
            .entry(notification.owner_id.clone())
            .or_default();
        feed.push_back(notification);
        while feed.len() > self.capacity {
            feed.pop_front();
        }
    }

    /// Notifications for an owner, newest first.
    pub fn recent(&self, owner_id: &str) -> Vec<Notification> {
        self.feeds
            .get(owner_id)
            .map(|feed| feed.iter().rev().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSink for AlertInbox {
    async fn notify(&self, owner_id: &str, message: &str) {
        info!(owner = owner_id, "Alert: {}", message);
        self.push(Notification {
            owner_id: owner_id.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
    }
}
