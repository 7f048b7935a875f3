use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

use super::{SessionDocument, SessionPolicy};

/// Capability set the session coordinator needs from the document store.
///
/// `read` on a missing document fails with `StoreError::NotFound`; every
/// other failure is a `Transport` or `InvalidDocument` error.
pub trait ConfigStore {
    fn exists(&self, session_id: &str) -> StoreResult<bool>;
    fn read(&self, session_id: &str) -> StoreResult<SessionDocument>;
    fn write(&mut self, session_id: &str, document: &SessionDocument) -> StoreResult<()>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &mut T {
    fn exists(&self, session_id: &str) -> StoreResult<bool> {
        (**self).exists(session_id)
    }

    fn read(&self, session_id: &str) -> StoreResult<SessionDocument> {
        (**self).read(session_id)
    }

    fn write(&mut self, session_id: &str, document: &SessionDocument) -> StoreResult<()> {
        (**self).write(session_id, document)
    }
}

/// Process-local store, keyed by session id in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    documents: IndexMap<String, SessionDocument>,
}

impl InMemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, session_id: impl Into<String>, document: SessionDocument) -> Self {
        self.documents.insert(session_id.into(), document);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn exists(&self, session_id: &str) -> StoreResult<bool> {
        Ok(self.documents.contains_key(session_id))
    }

    fn read(&self, session_id: &str) -> StoreResult<SessionDocument> {
        self.documents
            .get(session_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: session_id.to_owned(),
            })
    }

    fn write(&mut self, session_id: &str, document: &SessionDocument) -> StoreResult<()> {
        self.documents
            .insert(session_id.to_owned(), document.clone());
        Ok(())
    }
}

/// Directory-backed store: `{root}/{sessions_prefix}/{session_id}/config.json`.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    sessions_dir: PathBuf,
}

impl FsConfigStore {
    #[must_use]
    pub fn new(root: impl AsRef<Path>, policy: &SessionPolicy) -> Self {
        Self {
            sessions_dir: root.as_ref().join(&policy.sessions_prefix),
        }
    }

    fn document_path(&self, session_id: &str) -> StoreResult<PathBuf> {
        let invalid = session_id.is_empty()
            || session_id == "."
            || session_id == ".."
            || session_id.contains(['/', '\\']);
        if invalid {
            return Err(StoreError::InvalidDocument(format!(
                "session id `{session_id}` cannot be used as a path segment"
            )));
        }
        Ok(self.sessions_dir.join(session_id).join("config.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn exists(&self, session_id: &str) -> StoreResult<bool> {
        let path = self.document_path(session_id)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config existence check failed");
                Err(StoreError::Transport(err.to_string()))
            }
        }
    }

    fn read(&self, session_id: &str) -> StoreResult<SessionDocument> {
        let path = self.document_path(session_id)?;
        let raw = fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                key: session_id.to_owned(),
            },
            _ => StoreError::Transport(err.to_string()),
        })?;
        serde_json::from_str(&raw).map_err(|e| StoreError::InvalidDocument(e.to_string()))
    }

    fn write(&mut self, session_id: &str, document: &SessionDocument) -> StoreResult<()> {
        let path = self.document_path(session_id)?;
        let payload = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Transport(e.to_string()))?;
        }
        // Pollers must never observe a half-written document.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(|e| StoreError::Transport(e.to_string()))?;
        fs::rename(&staging, &path).map_err(|e| StoreError::Transport(e.to_string()))?;
        debug!(session_id, path = %path.display(), "session document written");
        Ok(())
    }
}
