//! Single-slot notification sink with a real-time expiry.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub posted_at: Instant,
    pub expires_at: Instant,
}

/// Holds the latest notification until its TTL runs out.
///
/// Posting replaces both the text and the pending expiry of the previous
/// notification.
#[derive(Clone, Debug)]
pub struct NotificationSink {
    ttl: Duration,
    current: Option<Notification>,
}

impl NotificationSink {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn post(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some(Notification {
            text: text.into(),
            posted_at: now,
            expires_at: now + self.ttl,
        });
    }

    /// Text of the live notification, if it has not expired by `now`.
    pub fn current(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| n.text.as_str())
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|n| n.expires_at)
    }

    /// Drop the notification if it has expired. Returns whether it was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|n| now >= n.expires_at);
        if expired {
            self.current = None;
        }
        expired
    }
}
