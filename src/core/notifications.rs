//! Transient, auto-expiring user notifications

use std::time::{Duration, Instant};

/// How long a notification stays visible unless dismissed
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

/// Notification category, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A queued notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

/// Notifications in enqueue order
#[derive(Debug, Default)]
pub struct NotificationQueue {
    entries: Vec<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification that expires [`NOTIFICATION_TTL`] after `now`
    pub fn enqueue(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        let message = message.into();
        tracing::debug!("Notification {} ({:?}): {}", id, kind, message);
        self.entries.push(Notification {
            id,
            kind,
            message,
            expires_at: now + NOTIFICATION_TTL,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.enqueue(NotificationKind::Success, message, now)
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.enqueue(NotificationKind::Info, message, now)
    }

    #[allow(dead_code)]
    pub fn error(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.enqueue(NotificationKind::Error, message, now)
    }

    /// Remove a notification; unknown ids are ignored
    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|n| n.id != id);
    }

    /// Drop every notification whose deadline has passed
    pub fn expire(&mut self, now: Instant) {
        self.entries.retain(|n| n.expires_at > now);
    }

    /// Earliest pending deadline, used to schedule the next repaint
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|n| n.expires_at).min()
    }

    /// Oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_assigns_unique_ids_in_order() {
        let mut queue = NotificationQueue::new();
        let now = Instant::now();
        let a = queue.success("created", now);
        let b = queue.info("cancelled", now);
        let c = queue.error("oops", now);

        assert!(a < b && b < c);
        let messages: Vec<_> = queue.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["created", "cancelled", "oops"]);
    }

    #[test]
    fn test_expires_after_ttl() {
        let mut queue = NotificationQueue::new();
        let start = Instant::now();
        queue.success("saved", start);

        queue.expire(start + Duration::from_millis(4999));
        assert_eq!(queue.iter().count(), 1);

        queue.expire(start + NOTIFICATION_TTL + Duration::from_millis(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_expire_keeps_younger_entries() {
        let mut queue = NotificationQueue::new();
        let start = Instant::now();
        queue.info("old", start);
        let young = queue.info("young", start + Duration::from_secs(3));

        queue.expire(start + Duration::from_secs(6));
        let ids: Vec<_> = queue.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![young]);
    }

    #[test]
    fn test_dismiss_is_immediate_and_idempotent() {
        let mut queue = NotificationQueue::new();
        let now = Instant::now();
        let id = queue.success("deleted", now);
        let other = queue.info("other", now);

        queue.dismiss(id);
        queue.dismiss(id);
        queue.dismiss(9999);

        let ids: Vec<_> = queue.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![other]);
    }

    #[test]
    fn test_ids_not_reused_after_dismiss() {
        let mut queue = NotificationQueue::new();
        let now = Instant::now();
        let first = queue.info("a", now);
        queue.dismiss(first);
        let second = queue.info("b", now);
        assert_ne!(first, second);
    }

    #[test]
    fn test_next_deadline() {
        let mut queue = NotificationQueue::new();
        assert_eq!(queue.next_deadline(), None);

        let start = Instant::now();
        queue.info("a", start + Duration::from_secs(1));
        queue.info("b", start);
        assert_eq!(queue.next_deadline(), Some(start + NOTIFICATION_TTL));
    }
}
