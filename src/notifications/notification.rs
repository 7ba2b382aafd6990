// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Notification` struct and `Severity` enum
//! the gallery session pushes whenever an operation needs user feedback.

use std::fmt;

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// How much attention a notification deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Success,
    Info,
    /// Something needs attention but nothing was lost.
    Warning,
    /// A mutation failed.
    Error,
}

impl Severity {
    /// Short lowercase label, used by text front-ends.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// An interpolation argument.
///
/// Only counts are numbers. Names, ids and filenames stay text even when they
/// happen to look numeric (`007`, `12e45678`).
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Count(usize),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(text) => f.write_str(text),
            ArgValue::Count(count) => write!(f, "{count}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(text: &str) -> Self {
        ArgValue::Text(text.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(text: String) -> Self {
        ArgValue::Text(text)
    }
}

impl From<&String> for ArgValue {
    fn from(text: &String) -> Self {
        ArgValue::Text(text.clone())
    }
}

impl From<usize> for ArgValue {
    fn from(count: usize) -> Self {
        ArgValue::Count(count)
    }
}

/// Feedback for the user: an i18n key plus its arguments.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    /// Resolved at render time.
    message_key: String,
    message_args: Vec<(String, ArgValue)>,
}

impl Notification {
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
        }
    }

    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Adds an argument for message interpolation.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    #[must_use]
    pub fn message_args(&self) -> &[(String, ArgValue)] {
        &self.message_args
    }

    /// Looks up one interpolation argument by name.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&ArgValue> {
        self.message_args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}
