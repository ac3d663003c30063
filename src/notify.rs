//! Transient user-facing notifications

use serde::Serialize;
use std::collections::VecDeque;

/// Tone of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Operation completed
    Success,
    /// Operation failed
    Error,
}

/// One message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Tone
    pub kind: NotificationKind,
    /// Text shown to the user
    pub message: String,
}

/// Queue of notifications waiting to be shown
///
/// Every notification is also logged.
#[derive(Debug, Default)]
pub struct Notifications {
    pending: VecDeque<Notification>,
}

impl Notifications {
    /// Queue a success message
    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%message, "notify");
        self.pending.push_back(Notification {
            kind: NotificationKind::Success,
            message,
        });
    }

    /// Queue an error message
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "notify");
        self.pending.push_back(Notification {
            kind: NotificationKind::Error,
            message,
        });
    }

    /// Pending notifications, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.kind {
            NotificationKind::Success => '✓',
            NotificationKind::Error => '✗',
        };
        write!(f, "{marker} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue_in_order() {
        let mut notes = Notifications::default();
        notes.success("one");
        notes.error("two");

        assert_eq!(notes.pending().count(), 2);
        let drained = notes.drain();
        assert_eq!(drained[0].kind, NotificationKind::Success);
        assert_eq!(drained[1].to_string(), "✗ two");
        assert!(notes.drain().is_empty());
    }
}
