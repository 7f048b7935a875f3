use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::ChartConfig;
use crate::error::{DatasetError, DatasetResult, SessionError, SessionResult};

use super::SessionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    Full,
    Preview,
}

impl SessionMode {
    /// Explicitly requested mode wins; otherwise the id's naming decides.
    #[must_use]
    pub fn resolve(session_id: &str, requested: Option<Self>, policy: &SessionPolicy) -> Self {
        requested.unwrap_or_else(|| Self::classify(session_id, policy))
    }

    #[must_use]
    pub fn classify(session_id: &str, policy: &SessionPolicy) -> Self {
        if !policy.preview_prefix.is_empty() && session_id.starts_with(&policy.preview_prefix) {
            Self::Preview
        } else {
            Self::Full
        }
    }

    fn parse_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preview" => Some(Self::Preview),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Preview => "preview",
        })
    }
}

/// How the invoking environment addresses a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAddress {
    pub session_id: String,
    #[serde(default)]
    pub mode: Option<SessionMode>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionAddress {
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            mode: None,
            email: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Reads `session_id`, `mode` and `email` from request parameters.
    ///
    /// Unknown `mode` values are ignored so the id's naming decides.
    pub fn from_query_pairs<'a, I>(pairs: I) -> SessionResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut session_id = None;
        let mut mode = None;
        let mut email = None;
        for (key, value) in pairs {
            match key {
                "session_id" if !value.trim().is_empty() => session_id = Some(value.trim().to_owned()),
                "mode" => mode = SessionMode::parse_param(value),
                "email" if !value.trim().is_empty() => email = Some(value.trim().to_owned()),
                _ => {}
            }
        }
        let session_id = session_id.ok_or(SessionError::MissingSessionId)?;
        Ok(Self {
            session_id,
            mode,
            email,
        })
    }
}

/// Stored per-session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    pub email: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_compat_config"
    )]
    pub visualization_config: Option<ChartConfig>,
}

impl SessionDocument {
    #[must_use]
    pub fn new(email: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            file_name: file_name.into(),
            sheet_name: None,
            visualization_config: None,
        }
    }

    #[must_use]
    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = Some(sheet_name.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.visualization_config = Some(config);
        self
    }
}

fn deserialize_compat_config<'de, D>(deserializer: D) -> Result<Option<ChartConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => ChartConfig::from_json_compat_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// A stored document bound to the session that retrieved it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub session_id: String,
    pub mode: SessionMode,
    pub email: String,
    pub file_name: String,
    pub sheet_name: Option<String>,
    pub config: Option<ChartConfig>,
}

impl SessionRecord {
    #[must_use]
    pub fn from_document(session_id: &str, mode: SessionMode, document: SessionDocument) -> Self {
        Self {
            session_id: session_id.to_owned(),
            mode,
            email: document.email,
            file_name: document.file_name,
            sheet_name: document.sheet_name,
            config: document.visualization_config,
        }
    }

    /// Where this session's dataset comes from.
    #[must_use]
    pub fn dataset_source(&self) -> DatasetSource {
        match self.mode {
            SessionMode::Full => DatasetSource::UserFile {
                email: self.email.clone(),
                file_name: self.file_name.clone(),
                sheet_name: self.sheet_name.clone(),
            },
            SessionMode::Preview => DatasetSource::PreviewStaged {
                session_id: self.session_id.clone(),
            },
        }
    }

    #[must_use]
    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            email: self.email.clone(),
            file_name: self.file_name.clone(),
            sheet_name: self.sheet_name.clone(),
            visualization_config: self.config.clone(),
        }
    }
}

/// Recognized dataset file families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFormat {
    DelimitedText,
    Spreadsheet,
}

impl DatasetFormat {
    pub fn from_file_name(file_name: &str) -> DatasetResult<Self> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::DelimitedText)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(Self::Spreadsheet)
        } else {
            Err(DatasetError::UnsupportedFormat {
                file_name: file_name.to_owned(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetSource {
    UserFile {
        email: String,
        file_name: String,
        sheet_name: Option<String>,
    },
    /// Dataset staged next to a preview session's config, read once.
    PreviewStaged { session_id: String },
}

/// Resolved provider lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetLocation {
    pub path: String,
    pub format: DatasetFormat,
    pub sheet_name: Option<String>,
}

impl DatasetSource {
    pub fn locate(&self, policy: &SessionPolicy) -> DatasetResult<DatasetLocation> {
        match self {
            Self::UserFile {
                email,
                file_name,
                sheet_name,
            } => {
                let format = DatasetFormat::from_file_name(file_name)?;
                Ok(DatasetLocation {
                    path: format!("{}/{email}/data/{file_name}", policy.users_prefix),
                    format,
                    sheet_name: match format {
                        DatasetFormat::Spreadsheet => sheet_name.clone(),
                        DatasetFormat::DelimitedText => None,
                    },
                })
            }
            Self::PreviewStaged { session_id } => Ok(DatasetLocation {
                path: format!("{}/{session_id}/data.csv", policy.sessions_prefix),
                format: DatasetFormat::DelimitedText,
                sheet_name: None,
            }),
        }
    }
}
