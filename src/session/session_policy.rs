use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Session coordination settings.
///
/// Serializable so hosts can keep it next to their other settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Delay between two preview config checks.
    pub poll_interval_ms: u64,
    /// Total time a preview session waits for its config.
    pub poll_timeout_ms: u64,
    /// Session ids starting with this prefix are preview sessions.
    pub preview_prefix: String,
    /// Store namespace holding per-session documents and staged datasets.
    pub sessions_prefix: String,
    /// Store namespace holding user-owned dataset files.
    pub users_prefix: String,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            poll_timeout_ms: 15_000,
            preview_prefix: "preview_".to_owned(),
            sessions_prefix: "sessions".to_owned(),
            users_prefix: "users".to_owned(),
        }
    }
}

impl SessionPolicy {
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = duration_to_ms(interval);
        self
    }

    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout_ms = duration_to_ms(timeout);
        self
    }

    #[must_use]
    pub fn with_preview_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.preview_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_sessions_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sessions_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_users_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.users_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Number of checks that fit in the timeout window.
    #[must_use]
    pub fn max_poll_attempts(&self) -> u64 {
        if self.poll_interval_ms == 0 {
            return 0;
        }
        self.poll_timeout_ms / self.poll_interval_ms
    }

    pub fn validate(&self) -> SessionResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(SessionError::InvalidPolicy(
                "poll interval must be > 0".to_owned(),
            ));
        }
        if self.poll_timeout_ms < self.poll_interval_ms {
            return Err(SessionError::InvalidPolicy(
                "poll timeout must be >= poll interval".to_owned(),
            ));
        }
        if self.preview_prefix.is_empty() {
            return Err(SessionError::InvalidPolicy(
                "preview prefix must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
