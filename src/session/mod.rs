mod config_store;
mod dataset_provider;
mod poll_clock;
mod presentation_shell;
mod session_coordinator;
mod session_policy;
mod session_record;

pub use config_store::{ConfigStore, FsConfigStore, InMemoryConfigStore};
pub use dataset_provider::{DatasetProvider, InMemoryDatasetProvider};
pub use poll_clock::{CancellationToken, PollClock, SystemClock};
pub use presentation_shell::{OpenedSession, PresentationShell, SavedVisualization};
pub use session_coordinator::{ResolvedSession, SessionCoordinator, SessionOutcome, SessionState};
pub use session_policy::SessionPolicy;
pub use session_record::{
    DatasetFormat, DatasetLocation, DatasetSource, SessionAddress, SessionDocument, SessionMode,
    SessionRecord,
};
