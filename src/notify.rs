//! Toast notifications raised by store operations

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default time a toast stays visible
pub const DEFAULT_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
}

/// A single toast message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
    /// Stays until dismissed
    pub permanent: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            duration_ms: DEFAULT_DURATION_MS,
            permanent: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let duration = Duration::milliseconds(self.duration_ms.min(i64::MAX as u64) as i64);
        !self.permanent && now - self.created_at >= duration
    }
}

/// Active toasts, oldest first
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification and return its id
    pub fn push(&mut self, notification: Notification) -> Uuid {
        match notification.kind {
            ToastKind::Error => log::warn!("{}", notification.message),
            _ => log::info!("{}", notification.message),
        }
        let id = notification.id;
        self.items.push(notification);
        id
    }

    pub fn toast(&mut self, message: impl Into<String>, kind: ToastKind) -> Uuid {
        self.push(Notification::new(message, kind))
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.toast(message, ToastKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.toast(message, ToastKind::Error)
    }

    pub fn info(&mut self, message: impl Into<String>) -> Uuid {
        self.toast(message, ToastKind::Info)
    }

    /// Remove a toast; false if it was already gone
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Remove toasts whose duration has elapsed
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        before - self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_defaults() {
        let mut notifications = Notifications::new();
        let id = notifications.info("hello");

        let toast = notifications.last().unwrap();
        assert_eq!(toast.id, id);
        assert_eq!(toast.kind, ToastKind::Info);
        assert_eq!(toast.duration_ms, DEFAULT_DURATION_MS);
        assert!(!toast.permanent);
    }

    #[test]
    fn test_dismiss() {
        let mut notifications = Notifications::new();
        let id = notifications.success("saved");

        assert!(notifications.dismiss(id));
        assert!(!notifications.dismiss(id));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_expire_keeps_permanent_and_fresh() {
        let mut notifications = Notifications::new();
        let short = Notification::new("short", ToastKind::Info).with_duration(1000);
        let now = short.created_at;
        notifications.push(short);
        notifications.push(Notification::new("sticky", ToastKind::Error).permanent());
        notifications.push(Notification::new("long", ToastKind::Info).with_duration(60_000));

        let removed = notifications.expire(now + Duration::seconds(2));

        assert_eq!(removed, 1);
        let left: Vec<_> = notifications.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(left, vec!["sticky", "long"]);
    }
}
