//! Notifications: transient, dismissible messages with a severity.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Default auto-hide delay.
pub const DEFAULT_AUTO_HIDE: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        };
        write!(f, "{s}")
    }
}

/// A message shown to the user until closed or until it auto-hides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub auto_hide_ms: u64,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>, auto_hide: Duration) -> Self {
        Self {
            severity,
            message: message.into(),
            shown_at: Utc::now(),
            auto_hide_ms: u64::try_from(auto_hide.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn success(message: impl Into<String>, auto_hide: Duration) -> Self {
        Self::new(Severity::Success, message, auto_hide)
    }

    pub fn warning(message: impl Into<String>, auto_hide: Duration) -> Self {
        Self::new(Severity::Warning, message, auto_hide)
    }

    pub fn error(message: impl Into<String>, auto_hide: Duration) -> Self {
        Self::new(Severity::Error, message, auto_hide)
    }

    /// When the notification hides itself.
    pub fn hides_at(&self) -> DateTime<Utc> {
        let ttl = i64::try_from(self.auto_hide_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);
        self.shown_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        now < self.hides_at()
    }

    pub fn is_open(&self) -> bool {
        self.is_open_at(Utc::now())
    }

    /// Milliseconds left before auto-hide, for the page script.
    pub fn remaining_ms_at(&self, now: DateTime<Utc>) -> u64 {
        (self.hides_at() - now)
            .num_milliseconds()
            .try_into()
            .unwrap_or(0)
    }
}
