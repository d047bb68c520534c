//! Layout stores: the durable backend behind `GET/POST /frames` and the
//! local fallback cache.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FrameResult, FrameboardError};
use crate::frame::FrameDocument;

/// Fixed key the local cache keeps the layout under.
pub const CACHE_KEY: &str = "framesState";

/// Durable home of the layout document.
#[async_trait]
pub trait FrameStore: Send + Sync {
    async fn fetch(&self) -> FrameResult<FrameDocument>;
    async fn store(&self, doc: &FrameDocument) -> FrameResult<()>;
}

/// Synchronous key-value fallback, read when the backend is unreachable.
pub trait LocalCache: Send + Sync {
    /// Raw cached document, `None` when nothing was cached yet.
    fn read(&self) -> FrameResult<Option<String>>;
    fn write(&self, raw: &str) -> FrameResult<()>;
}

/// The layout document as a JSON file on disk. Used by the gateway.
///
/// Writes go through a temp file and a rename; they are queued in arrival
/// order so the last save received is the one left on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FrameStore for JsonFileStore {
    async fn fetch(&self) -> FrameResult<FrameDocument> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn store(&self, doc: &FrameDocument) -> FrameResult<()> {
        let _guard = self.write_lock.lock().await;
        let raw = serde_json::to_string(doc)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ImageListing {
    #[serde(default)]
    pub images: Vec<String>,
}

/// Client side of the gateway: `GET/POST {base}/frames` and `GET {base}/images`.
#[derive(Debug, Clone)]
pub struct HttpFrameStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFrameStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Image URLs for the photo carousel.
    pub async fn list_images(&self) -> FrameResult<Vec<String>> {
        let resp = self.client.get(self.url("/images")).send().await?;
        if !resp.status().is_success() {
            return Err(FrameboardError::Backend(resp.status().as_u16()));
        }
        Ok(resp.json::<ImageListing>().await?.images)
    }
}

#[async_trait]
impl FrameStore for HttpFrameStore {
    async fn fetch(&self) -> FrameResult<FrameDocument> {
        let resp = self.client.get(self.url("/frames")).send().await?;
        if !resp.status().is_success() {
            return Err(FrameboardError::Backend(resp.status().as_u16()));
        }
        let raw = resp.text().await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn store(&self, doc: &FrameDocument) -> FrameResult<()> {
        let resp = self.client.post(self.url("/frames")).json(doc).send().await?;
        if !resp.status().is_success() {
            return Err(FrameboardError::Backend(resp.status().as_u16()));
        }
        Ok(())
    }
}

/// In-process backend. Can be switched offline to exercise fallback paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: tokio::sync::Mutex<Option<FrameDocument>>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: FrameDocument) -> Self {
        Self {
            doc: tokio::sync::Mutex::new(Some(doc)),
            ..Self::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn document(&self) -> Option<FrameDocument> {
        self.doc.lock().await.clone()
    }

    fn check_online(&self) -> FrameResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(FrameboardError::Backend(503));
        }
        Ok(())
    }
}

#[async_trait]
impl FrameStore for MemoryStore {
    async fn fetch(&self) -> FrameResult<FrameDocument> {
        self.check_online()?;
        Ok(self.doc.lock().await.clone().unwrap_or_default())
    }

    async fn store(&self, doc: &FrameDocument) -> FrameResult<()> {
        self.check_online()?;
        *self.doc.lock().await = Some(doc.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Local cache kept as `<dir>/framesState.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CACHE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalCache for FileCache {
    fn read(&self) -> FrameResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, raw: &str) -> FrameResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    raw: Mutex<Option<String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }
}

impl LocalCache for MemoryCache {
    fn read(&self) -> FrameResult<Option<String>> {
        Ok(self.raw.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn write(&self, raw: &str) -> FrameResult<()> {
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw.to_string());
        Ok(())
    }
}
