use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::{ChartConfig, ChartDraft, ChartFamily, build_chart_spec};
use crate::core::Dataset;
use crate::error::{ChartError, ChartResult, SessionError, SessionResult};
use crate::render::Renderer;

use super::{
    CancellationToken, ConfigStore, DatasetProvider, PollClock, SessionAddress, SessionCoordinator,
    SessionMode, SessionPolicy, SessionRecord, SessionState,
};

/// Confirmation of a saved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedVisualization {
    pub session_id: String,
    pub saved_at: DateTime<Utc>,
}

/// A session whose record and dataset have been resolved.
#[derive(Debug, Clone)]
pub struct OpenedSession {
    coordinator: SessionCoordinator,
    record: SessionRecord,
    dataset: Dataset,
    poll_attempts: u64,
}

impl OpenedSession {
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.coordinator.state()
    }

    #[must_use]
    pub fn coordinator(&self) -> &SessionCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn poll_attempts(&self) -> u64 {
        self.poll_attempts
    }

    /// Starts interactive assembly against this session's dataset.
    pub fn draft(&self, family: ChartFamily) -> SessionResult<ChartDraft> {
        self.require_full("interactive assembly")?;
        Ok(ChartDraft::for_dataset(&self.dataset, family))
    }

    fn require_full(&self, action: &str) -> SessionResult<()> {
        if self.record.mode == SessionMode::Full {
            return Ok(());
        }
        Err(SessionError::InvalidTransition {
            session_id: self.record.session_id.clone(),
            state: format!("a {} session", self.record.mode),
            expected: format!("a full session for {action}"),
        })
    }
}

/// Orchestrates session resolution, dataset loading, chart building and
/// hand-off to the rendering surface.
#[derive(Debug)]
pub struct PresentationShell<S, D, C> {
    store: S,
    datasets: D,
    clock: C,
    policy: SessionPolicy,
}

impl<S, D, C> PresentationShell<S, D, C>
where
    S: ConfigStore,
    D: DatasetProvider,
    C: PollClock,
{
    #[must_use]
    pub fn new(store: S, datasets: D, clock: C, policy: SessionPolicy) -> Self {
        Self {
            store,
            datasets,
            clock,
            policy,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Resolves `address`, loads its dataset and, when the session carries a
    /// configuration, renders it.
    ///
    /// A full session without a configuration opens in `ConfigLoaded` and
    /// waits for interactive assembly.
    pub fn open_session<R>(
        &mut self,
        address: &SessionAddress,
        cancel: &CancellationToken,
        renderer: &mut R,
    ) -> SessionResult<OpenedSession>
    where
        R: Renderer + ?Sized,
    {
        let mut coordinator = SessionCoordinator::new(address.clone(), self.policy.clone());
        let resolved = coordinator.resolve(&self.store, &mut self.clock, cancel)?;

        let dataset = match self.load_dataset(&resolved.record) {
            Ok(dataset) => dataset,
            Err(err) => {
                coordinator.mark_failed(&err);
                return Err(err);
            }
        };

        if let Some(config) = &resolved.record.config {
            if let Err(err) = render_config(&dataset, config, renderer) {
                let err = SessionError::from(err);
                coordinator.mark_failed(&err);
                return Err(err);
            }
            coordinator.mark_rendered()?;
        }

        info!(
            session_id = %address.session_id,
            state = %coordinator.state(),
            rows = dataset.row_count(),
            "session opened"
        );
        Ok(OpenedSession {
            coordinator,
            record: resolved.record,
            dataset,
            poll_attempts: resolved.poll_attempts,
        })
    }

    /// Renders the current draft of an interactive session.
    ///
    /// Failures are local to this chart and leave the session untouched.
    pub fn render_draft<R>(
        &self,
        session: &OpenedSession,
        draft: &ChartDraft,
        renderer: &mut R,
    ) -> ChartResult<()>
    where
        R: Renderer + ?Sized,
    {
        let result = draft
            .finish()
            .and_then(|config| render_config(&session.dataset, &config, renderer));
        if let Err(err) = &result {
            warn!(
                session_id = %session.record.session_id,
                error = %err,
                "draft preview rejected"
            );
        }
        result
    }

    /// Validates `config` against the session dataset and writes it back to
    /// the config store under the session id. Full sessions only.
    pub fn save_configuration(
        &mut self,
        session: &mut OpenedSession,
        config: ChartConfig,
    ) -> SessionResult<SavedVisualization> {
        session.require_full("saving")?;
        if let Err(err) = config.validate(&session.dataset.schema()) {
            warn!(
                session_id = %session.record.session_id,
                error = %err,
                "refusing to save invalid configuration"
            );
            return Err(err.into());
        }

        let mut record = session.record.clone();
        record.config = Some(config);
        if let Err(err) = self.store.write(&record.session_id, &record.to_document()) {
            let err = SessionError::from(err);
            warn!(session_id = %record.session_id, error = %err, "saving configuration failed");
            return Err(err);
        }
        session.record = record;

        let saved = SavedVisualization {
            session_id: session.record.session_id.clone(),
            saved_at: Utc::now(),
        };
        info!(session_id = %saved.session_id, saved_at = %saved.saved_at, "configuration saved");
        Ok(saved)
    }

    fn load_dataset(&self, record: &SessionRecord) -> SessionResult<Dataset> {
        let location = record.dataset_source().locate(&self.policy)?;
        Ok(self.datasets.load(&location)?)
    }
}

fn render_config<R>(dataset: &Dataset, config: &ChartConfig, renderer: &mut R) -> Result<(), ChartError>
where
    R: Renderer + ?Sized,
{
    let specification = build_chart_spec(dataset, config)?;
    renderer.render(specification)
}
