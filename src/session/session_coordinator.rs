use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace};

use crate::error::{SessionError, SessionResult, StoreError};

use super::{
    CancellationToken, ConfigStore, PollClock, SessionAddress, SessionMode, SessionPolicy,
    SessionRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionOutcome {
    Rendered,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    ResolvingMode,
    FullSessionReady,
    AwaitingPreviewConfig { attempts: u64 },
    ConfigLoaded,
    Terminal(SessionOutcome),
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolvingMode => f.write_str("resolving mode"),
            Self::FullSessionReady => f.write_str("full session ready"),
            Self::AwaitingPreviewConfig { attempts } => {
                write!(f, "awaiting preview config ({attempts} checks)")
            }
            Self::ConfigLoaded => f.write_str("config loaded"),
            Self::Terminal(SessionOutcome::Rendered) => f.write_str("rendered"),
            Self::Terminal(SessionOutcome::Failed) => f.write_str("failed"),
        }
    }
}

/// Outcome of a successful `resolve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSession {
    pub record: SessionRecord,
    /// Number of `exists` checks made while waiting for a preview config.
    pub poll_attempts: u64,
    pub waited: Duration,
}

/// Drives one session from `ResolvingMode` to a terminal state.
///
/// A coordinator is single-use: starting a new visualization means creating
/// a new coordinator.
#[derive(Debug, Clone)]
pub struct SessionCoordinator {
    address: SessionAddress,
    policy: SessionPolicy,
    mode: Option<SessionMode>,
    state: SessionState,
    history: Vec<SessionState>,
    poll_attempts: u64,
}

impl SessionCoordinator {
    #[must_use]
    pub fn new(address: SessionAddress, policy: SessionPolicy) -> Self {
        Self {
            address,
            policy,
            mode: None,
            state: SessionState::ResolvingMode,
            history: vec![SessionState::ResolvingMode],
            poll_attempts: 0,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.address.session_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state entered so far, in order. Poll attempts collapse into
    /// one `AwaitingPreviewConfig` entry carrying the final count.
    #[must_use]
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    #[must_use]
    pub fn mode(&self) -> Option<SessionMode> {
        self.mode
    }

    #[must_use]
    pub fn poll_attempts(&self) -> u64 {
        self.poll_attempts
    }

    /// Resolves the session's mode and obtains its stored record.
    ///
    /// Full sessions check the store once and fail with
    /// `ConfigurationMissing` without retrying. Preview sessions poll
    /// `exists` every `poll_interval` until it reports true or
    /// `poll_timeout` has elapsed, then read exactly once. Cancellation is
    /// observed between polls.
    pub fn resolve<S, C>(
        &mut self,
        store: &S,
        clock: &mut C,
        cancel: &CancellationToken,
    ) -> SessionResult<ResolvedSession>
    where
        S: ConfigStore + ?Sized,
        C: PollClock + ?Sized,
    {
        if self.state != SessionState::ResolvingMode {
            return Err(self.invalid_transition("resolving mode"));
        }
        let result = self.resolve_inner(store, clock, cancel);
        if let Err(err) = &result {
            self.mark_failed(err);
        }
        result
    }

    fn resolve_inner<S, C>(
        &mut self,
        store: &S,
        clock: &mut C,
        cancel: &CancellationToken,
    ) -> SessionResult<ResolvedSession>
    where
        S: ConfigStore + ?Sized,
        C: PollClock + ?Sized,
    {
        self.policy.validate()?;
        let mode = SessionMode::resolve(&self.address.session_id, self.address.mode, &self.policy);
        self.mode = Some(mode);
        debug!(session_id = %self.address.session_id, %mode, "session mode resolved");

        let (poll_attempts, waited) = match mode {
            SessionMode::Full => {
                self.enter(SessionState::FullSessionReady);
                if !store.exists(&self.address.session_id)? {
                    return Err(self.missing());
                }
                (0, Duration::ZERO)
            }
            SessionMode::Preview => self.await_preview_config(store, clock, cancel)?,
        };

        let document = store
            .read(&self.address.session_id)
            .map_err(|err| match err {
                StoreError::NotFound { .. } => self.missing(),
                other => other.into(),
            })?;
        let record = SessionRecord::from_document(&self.address.session_id, mode, document);
        if mode == SessionMode::Preview && record.config.is_none() {
            return Err(self.missing());
        }
        if let Some(expected) = self.address.email.as_deref() {
            if expected != record.email {
                debug!(
                    session_id = %self.address.session_id,
                    expected,
                    stored = %record.email,
                    "session address email differs from stored owner"
                );
            }
        }

        self.enter(SessionState::ConfigLoaded);
        info!(
            session_id = %self.address.session_id,
            %mode,
            poll_attempts,
            has_config = record.config.is_some(),
            "session configuration loaded"
        );
        Ok(ResolvedSession {
            record,
            poll_attempts,
            waited,
        })
    }

    fn await_preview_config<S, C>(
        &mut self,
        store: &S,
        clock: &mut C,
        cancel: &CancellationToken,
    ) -> SessionResult<(u64, Duration)>
    where
        S: ConfigStore + ?Sized,
        C: PollClock + ?Sized,
    {
        let interval = self.policy.poll_interval();
        let timeout = self.policy.poll_timeout();
        let started = clock.elapsed();
        self.enter(SessionState::AwaitingPreviewConfig { attempts: 0 });

        loop {
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled {
                    session_id: self.address.session_id.clone(),
                });
            }
            let waited = clock.elapsed().saturating_sub(started);
            if waited >= timeout {
                return Err(SessionError::ConfigurationTimeout {
                    session_id: self.address.session_id.clone(),
                    waited,
                });
            }

            self.poll_attempts += 1;
            self.set_poll_attempts(self.poll_attempts);
            trace!(
                session_id = %self.address.session_id,
                attempt = self.poll_attempts,
                waited_ms = waited.as_millis() as u64,
                "checking for preview configuration"
            );
            if store.exists(&self.address.session_id)? {
                return Ok((self.poll_attempts, waited));
            }
            clock.sleep(interval);
        }
    }

    /// Records that the resolved configuration reached the rendering surface.
    pub fn mark_rendered(&mut self) -> SessionResult<()> {
        if self.state != SessionState::ConfigLoaded {
            return Err(self.invalid_transition("config loaded"));
        }
        self.enter(SessionState::Terminal(SessionOutcome::Rendered));
        debug!(session_id = %self.address.session_id, "session rendered");
        Ok(())
    }

    /// Moves to `Terminal(Failed)` and logs the failure. No-op once terminal.
    pub fn mark_failed(&mut self, err: &SessionError) {
        if self.state.is_terminal() {
            return;
        }
        error!(
            session_id = %self.address.session_id,
            state = %self.state,
            error = %err,
            "session render failed"
        );
        self.enter(SessionState::Terminal(SessionOutcome::Failed));
    }

    fn enter(&mut self, state: SessionState) {
        self.state = state;
        self.history.push(state);
    }

    fn set_poll_attempts(&mut self, attempts: u64) {
        let state = SessionState::AwaitingPreviewConfig { attempts };
        self.state = state;
        if let Some(last) = self.history.last_mut() {
            *last = state;
        }
    }

    fn missing(&self) -> SessionError {
        SessionError::ConfigurationMissing {
            session_id: self.address.session_id.clone(),
        }
    }

    fn invalid_transition(&self, expected: &str) -> SessionError {
        SessionError::InvalidTransition {
            session_id: self.address.session_id.clone(),
            state: self.state.to_string(),
            expected: expected.to_owned(),
        }
    }
}
