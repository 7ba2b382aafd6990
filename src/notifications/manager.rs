// SPDX-License-Identifier: MPL-2.0
//! Notification log kept by the session.
//!
//! Entries are kept in arrival order. Warnings and errors are also written to
//! the log as they arrive.

use super::notification::{Notification, Severity};

/// Every notification pushed during a session, oldest first.
#[derive(Debug, Default)]
pub struct Manager {
    entries: Vec<Notification>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a notification.
    pub fn push(&mut self, notification: Notification) {
        match notification.severity() {
            Severity::Warning => log::warn!(
                "{} {:?}",
                notification.message_key(),
                notification.message_args()
            ),
            Severity::Error => log::error!(
                "{} {:?}",
                notification.message_key(),
                notification.message_args()
            ),
            Severity::Success | Severity::Info => {}
        }
        self.entries.push(notification);
    }

    pub fn all_oldest_first(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Most recent notification, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    /// Returns whether any notification uses `message_key`.
    #[must_use]
    pub fn contains_key(&self, message_key: &str) -> bool {
        self.entries.iter().any(|n| n.message_key() == message_key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
