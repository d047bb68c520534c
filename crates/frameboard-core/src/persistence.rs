//! Persistence manager: full-snapshot saves to the backend and the local
//! cache, and a load that degrades backend → cache → empty.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{FrameResult, FrameboardError};
use crate::frame::FrameDocument;
use crate::store::{FrameStore, LocalCache};

/// Where a loaded layout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Backend,
    Cache,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub document: FrameDocument,
    pub source: LoadSource,
}

/// Which halves of a save went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub cached: bool,
    pub stored: bool,
}

#[derive(Clone)]
pub struct PersistenceManager {
    backend: Arc<dyn FrameStore>,
    cache: Arc<dyn LocalCache>,
}

impl PersistenceManager {
    pub fn new(backend: Arc<dyn FrameStore>, cache: Arc<dyn LocalCache>) -> Self {
        Self { backend, cache }
    }

    /// Write the snapshot to the local cache. Failures are logged and reported as `false`.
    pub fn write_cache(&self, doc: &FrameDocument) -> bool {
        let result = serde_json::to_string(doc)
            .map_err(FrameboardError::from)
            .and_then(|raw| self.cache.write(&raw));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to cache frame layout");
                false
            }
        }
    }

    /// Write the snapshot to the backend store. Failures are logged and reported as `false`.
    pub async fn write_backend(&self, doc: &FrameDocument) -> bool {
        match self.backend.store(doc).await {
            Ok(()) => {
                debug!(frames = doc.frames.len(), "frame layout saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to save frame layout");
                false
            }
        }
    }

    /// Cache first, then backend. Neither failure stops the other.
    pub async fn save(&self, doc: &FrameDocument) -> SaveReport {
        let cached = self.write_cache(doc);
        let stored = self.write_backend(doc).await;
        SaveReport { cached, stored }
    }

    /// Backend, else the local cache, else an empty layout. Never fails.
    pub async fn load(&self) -> LoadOutcome {
        match self.backend.fetch().await {
            Ok(document) => {
                info!(frames = document.frames.len(), "frame layout loaded from backend");
                return LoadOutcome {
                    document,
                    source: LoadSource::Backend,
                };
            }
            Err(e) => warn!(error = %e, "backend load failed; trying local cache"),
        }
        match self.read_cache() {
            Ok(Some(document)) => {
                info!(frames = document.frames.len(), "frame layout loaded from local cache");
                LoadOutcome {
                    document,
                    source: LoadSource::Cache,
                }
            }
            Ok(None) => LoadOutcome {
                document: FrameDocument::empty(),
                source: LoadSource::Empty,
            },
            Err(e) => {
                warn!(error = %e, "local cache unreadable; starting empty");
                LoadOutcome {
                    document: FrameDocument::empty(),
                    source: LoadSource::Empty,
                }
            }
        }
    }

    fn read_cache(&self) -> FrameResult<Option<FrameDocument>> {
        match self.cache.read()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
