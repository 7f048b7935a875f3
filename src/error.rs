use std::time::Duration;

use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type DatasetResult<T> = Result<T, DatasetError>;
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures raised while validating a configuration or building a chart
/// specification. Local to one chart render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid chart configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("column `{column}` does not exist in the dataset")]
    ColumnNotFound { column: String },

    #[error("chart family `{family}` needs at least one series")]
    EmptySeriesSet { family: String },

    #[error("column `{column}` has no numeric values to aggregate")]
    InvalidAggregationTarget { column: String },

    #[error("unknown color theme `{name}` (expected Blue-Grey, Yellow-Green or Red-Orange)")]
    UnknownColorTheme { name: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Shape violations of a `SeriesSpec` or `ChartConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("series column `{column}` is not part of the dataset")]
    UnknownColumn { column: String },

    #[error("color `{value}` is not a #RRGGBB hex string")]
    InvalidColor { value: String },

    #[error("series `{column}` uses role `{role}` where a value series is required")]
    RoleMismatch { column: String, role: String },

    #[error("series `{column}` sets an axis side, which `{family}` charts do not support")]
    AxisSideNotSupported { column: String, family: String },

    #[error("series `{column}` is drawn as `{kind}`, which `{family}` charts do not support")]
    VisualKindNotSupported {
        column: String,
        kind: String,
        family: String,
    },

    #[error("`{family}` charts need an x-axis column")]
    MissingXAxis { family: String },

    #[error("`{family}` charts need their `{group}` options")]
    MissingOptions { family: String, group: String },

    #[error("`{family}` charts must not carry `{group}` options")]
    ConflictingOptions { family: String, group: String },

    #[error("pie labels and values must use different columns (both are `{column}`)")]
    SameLabelsAndValues { column: String },

    #[error("hole fraction must be 0 (pie) or 0.4 (donut), got {value}")]
    InvalidHoleFraction { value: String },

    #[error("top-N must be greater than zero")]
    ZeroTopN,

    #[error("series index {index} is out of range for {len} series")]
    SeriesIndexOutOfRange { index: usize, len: usize },
}

/// Failures of the config store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no document stored under `{key}`")]
    NotFound { key: String },

    #[error("config store unavailable: {0}")]
    Transport(String),

    #[error("stored document is malformed: {0}")]
    InvalidDocument(String),
}

/// Failures of the dataset provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("unsupported file format for `{file_name}` (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat { file_name: String },

    #[error("dataset `{path}` not found")]
    NotFound { path: String },

    #[error("dataset provider unavailable: {0}")]
    Transport(String),
}

/// Session-level failures. Each one terminates the session render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no chart configuration exists for session `{session_id}`")]
    ConfigurationMissing { session_id: String },

    #[error("chart configuration for session `{session_id}` did not arrive within {waited:?}")]
    ConfigurationTimeout {
        session_id: String,
        waited: Duration,
    },

    #[error("session `{session_id}` was cancelled while waiting for its configuration")]
    Cancelled { session_id: String },

    #[error("no session id provided")]
    MissingSessionId,

    #[error("invalid session policy: {0}")]
    InvalidPolicy(String),

    #[error("session `{session_id}` is {state}, expected {expected}")]
    InvalidTransition {
        session_id: String,
        state: String,
        expected: String,
    },

    #[error("collaborator unavailable: {0}")]
    Transport(String),

    #[error("stored session document is malformed: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl SessionError {
    /// The single message shown to the user when a session render fails.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationMissing { .. } => {
                "No saved chart configuration was found for this session. Save a visualization first, then reopen it.".to_owned()
            }
            Self::ConfigurationTimeout { waited, .. } => format!(
                "The chart configuration did not arrive within {} seconds. Try opening the preview again.",
                waited.as_secs()
            ),
            Self::Cancelled { .. } => "The preview was closed before it finished loading.".to_owned(),
            Self::MissingSessionId => "No session ID provided.".to_owned(),
            Self::InvalidPolicy(_) | Self::InvalidTransition { .. } => {
                format!("Internal session error: {self}")
            }
            Self::Transport(_) | Self::Dataset(DatasetError::Transport(_)) => {
                "The storage service is unavailable right now. Please retry shortly.".to_owned()
            }
            Self::InvalidDocument(_) => {
                "The saved chart configuration could not be read.".to_owned()
            }
            Self::Dataset(err) => format!("The dataset could not be loaded: {err}"),
            Self::Chart(err) => format!("The chart could not be drawn: {err}"),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => Self::ConfigurationMissing { session_id: key },
            StoreError::Transport(msg) => Self::Transport(msg),
            StoreError::InvalidDocument(msg) => Self::InvalidDocument(msg),
        }
    }
}
